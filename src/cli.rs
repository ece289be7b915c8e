//  Copyright 2024. The Tari Project
//
//  Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
//  following conditions are met:
//
//  1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
//  disclaimer.
//
//  2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
//  following disclaimer in the documentation and/or other materials provided with the distribution.
//
//  3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
//  products derived from this software without specific prior written permission.
//
//  THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
//  INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
//  DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//  SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
//  SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
//  WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
//  USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use clap::{Parser, Subcommand};

use crate::error::{ConfigError, Error};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// Path to an optional TOML config file providing prover defaults
    #[clap(long, global = true)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the proving engine against a (body, user id, context) triple
    Prove {
        #[clap(long)]
        body: String,
        #[clap(long, alias = "user-id")]
        user_id: String,
        #[clap(long)]
        context: String,
        #[clap(long)]
        difficulty: Option<u32>,
        #[clap(long, alias = "time-limit")]
        time_limit_secs: Option<f64>,
        #[clap(long, alias = "init-cores", default_value = "0")]
        init_cores: String,
        #[clap(long, alias = "hash-cores", default_value = "0")]
        hash_cores: String,
        #[clap(long, alias = "large-pages", env = "WXPOWER_LARGE_PAGES")]
        large_pages: bool,
    },
    /// Verify a previously produced proof string
    Verify {
        #[clap(long)]
        proof: String,
        #[clap(long, alias = "large-pages", env = "WXPOWER_LARGE_PAGES")]
        large_pages: bool,
    },
}

/// Parses a comma-separated list of core indices, e.g. "0,1,2".
pub fn parse_core_list(raw: &str) -> Result<Vec<usize>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| Error::Config(ConfigError::BadCoreList(raw.to_string()))))
        .collect()
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::{parse_core_list, Cli, Command};

    #[test]
    fn parses_prove_subcommand() {
        let cli = Cli::try_parse_from([
            "wxpower",
            "prove",
            "--body",
            "hello",
            "--user-id",
            "u",
            "--context",
            "c",
            "--difficulty",
            "8",
            "--init-cores",
            "0,1,2",
            "--hash-cores",
            "0,1",
        ])
        .expect("should parse");

        match cli.command {
            Command::Prove { body, user_id, context, difficulty, init_cores, hash_cores, .. } => {
                assert_eq!(body, "hello");
                assert_eq!(user_id, "u");
                assert_eq!(context, "c");
                assert_eq!(difficulty, Some(8));
                assert_eq!(parse_core_list(&init_cores).unwrap(), vec![0, 1, 2]);
                assert_eq!(parse_core_list(&hash_cores).unwrap(), vec![0, 1]);
            },
            _ => panic!("expected Prove subcommand"),
        }
    }

    #[test]
    fn parses_verify_subcommand() {
        let cli = Cli::try_parse_from(["wxpower", "verify", "--proof", "x|wxPoW0|u|c"]).expect("should parse");

        match cli.command {
            Command::Verify { proof, large_pages } => {
                assert_eq!(proof, "x|wxPoW0|u|c");
                assert!(!large_pages);
            },
            _ => panic!("expected Verify subcommand"),
        }
    }

    #[test]
    fn rejects_non_numeric_core_list() {
        assert!(parse_core_list("0,x,2").is_err());
    }

    #[test]
    fn accepts_empty_core_list_as_empty_vec() {
        assert_eq!(parse_core_list("").unwrap(), Vec::<usize>::new());
    }
}
