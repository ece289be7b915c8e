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

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use wxpower::cli::{parse_core_list, Cli, Command};
use wxpower::codec::ProofContent;
use wxpower::config::ProverConfig;
use wxpower::prove_manager::{ProveManager, State};
use wxpower::stats::ProgressStats;
use wxpower::verifier::verify;

fn load_config(path: Option<&str>) -> ProverConfig {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }

    match builder.build().and_then(|cfg| ProverConfig::load_from(&cfg)) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config, falling back to defaults: {e}");
            ProverConfig::default()
        },
    }
}

fn run_prove(
    body: String,
    user_id: String,
    context: String,
    difficulty: Option<u32>,
    time_limit_secs: Option<f64>,
    init_cores: String,
    hash_cores: String,
    large_pages: bool,
    config: ProverConfig,
) -> ExitCode {
    let init_cores = match parse_core_list(&init_cores) {
        Ok(cores) if !cores.is_empty() => cores,
        _ => (0..config.num_init_threads).collect(),
    };
    let hash_cores = match parse_core_list(&hash_cores) {
        Ok(cores) if !cores.is_empty() => cores,
        _ => (0..config.num_hash_threads).collect(),
    };

    let diff = difficulty.or(config.default_difficulty);
    let time_limit = time_limit_secs
        .or(config.default_time_limit_secs)
        .map(Duration::from_secs_f64);

    let content = ProofContent::new(body, user_id, context);
    let manager = ProveManager::new(content, init_cores, hash_cores, large_pages || config.use_large_pages, diff, time_limit);
    let stats = ProgressStats::new();

    loop {
        thread::sleep(Duration::from_millis(500));
        let state = manager.get_state();

        if state.is_terminal() {
            break;
        }

        if state == State::Hashing {
            info!("{}", stats.pretty_print(&manager.get_thread_guarded_data()));
        }
    }

    let master = manager.get_master_guarded_data();

    match manager.get_state() {
        State::Finished | State::HashCancelled => {
            let best = master.best_results.into_iter().max_by_key(|r| r.diff).unwrap_or_default();

            if best.diff == 0 && best.proof.is_empty() {
                error!("No hashes were completed before the prover stopped.");
                return ExitCode::FAILURE;
            }

            println!("{}", best.proof);
            println!("difficulty: {}", best.diff);
            ExitCode::SUCCESS
        },
        State::RxFailed => {
            error!("RandomX initialization failed: {}", master.error_str);
            ExitCode::FAILURE
        },
        State::RxCancelled => {
            error!("RandomX initialization was cancelled.");
            ExitCode::FAILURE
        },
        State::RxIniting | State::Hashing => unreachable!("loop only exits on a terminal state"),
    }
}

fn run_verify(proof: String, large_pages: bool) -> ExitCode {
    let outcome = verify(&proof, large_pages);

    if !outcome.version_recognized {
        error!("Not a recognized wxPoW v0 proof.");
        return ExitCode::FAILURE;
    }

    if !outcome.error.is_empty() {
        error!("Verification failed: {}", outcome.error);
        return ExitCode::FAILURE;
    }

    let Some(result) = outcome.result else {
        error!("Verification produced no result.");
        return ExitCode::FAILURE;
    };

    println!("{}", outcome.pretty_metadata);
    println!();
    println!("hash: {}", result.hash.to_hex_string());
    println!("difficulty: {}", result.diff);
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Command::Prove { body, user_id, context, difficulty, time_limit_secs, init_cores, hash_cores, large_pages } => {
            run_prove(body, user_id, context, difficulty, time_limit_secs, init_cores, hash_cores, large_pages, config)
        },
        Command::Verify { proof, large_pages } => run_verify(proof, large_pages || config.use_large_pages),
    }
}
