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

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ProverConfig {
    /// Number of threads used for parallel RandomX dataset initialization
    pub num_init_threads: usize,
    /// Number of worker threads used for hashing
    pub num_hash_threads: usize,
    /// Whether to request RandomX large pages
    pub use_large_pages: bool,
    /// Default target difficulty, if the CLI doesn't override it
    pub default_difficulty: Option<u32>,
    /// Default wall-clock time limit in seconds, if the CLI doesn't override it
    pub default_time_limit_secs: Option<f64>,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            num_init_threads: num_cpus::get(),
            num_hash_threads: num_cpus::get(),
            use_large_pages: false,
            default_difficulty: None,
            default_time_limit_secs: None,
        }
    }
}

impl ProverConfig {
    pub fn load_from(cfg: &config::Config) -> Result<Self, config::ConfigError> {
        cfg.clone().try_deserialize::<ProverConfig>()
    }
}

#[cfg(test)]
mod test {
    use config::Config;

    use crate::config::ProverConfig;

    #[test]
    fn prover_configuration() {
        const CONFIG: &str = r#"
num_init_threads = 4
num_hash_threads = 8
use_large_pages = true
default_difficulty = 12
"#;
        let cfg = Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Toml))
            .build()
            .unwrap();

        let config = ProverConfig::load_from(&cfg).expect("failed to load config");
        assert_eq!(config.num_init_threads, 4);
        assert_eq!(config.num_hash_threads, 8);
        assert!(config.use_large_pages);
        assert_eq!(config.default_difficulty, Some(12));
        assert_eq!(config.default_time_limit_secs, None);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let cfg = Config::builder().build().unwrap();
        let config = ProverConfig::load_from(&cfg).expect("failed to load config");
        assert_eq!(config, ProverConfig::default());
    }

    #[test]
    fn round_trips_through_an_actual_config_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("failed to create temp file");
        write!(file, "num_init_threads = 2\nnum_hash_threads = 3\n").expect("failed to write temp config");

        let cfg = Config::builder()
            .add_source(config::File::from(file.path()))
            .build()
            .expect("failed to build config");

        let config = ProverConfig::load_from(&cfg).expect("failed to load config");
        assert_eq!(config.num_init_threads, 2);
        assert_eq!(config.num_hash_threads, 3);
        assert!(!config.use_large_pages);
    }
}
