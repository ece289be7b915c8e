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

//! Orchestrates one proving request: a master task that runs RandomX init, then spawns
//! hash workers, then waits for a difficulty hit, a deadline, or external cancellation.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use core_affinity::CoreId;
use log::{error, info, warn};

use crate::base64counter::Base64Counter;
use crate::bigint::Bigint256;
use crate::codec::{encode_metadata, ProofContent};
use crate::keys::hash_metadata;
use crate::randomx_manager::RandomXManager;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    RxIniting = 0,
    RxFailed = 1,
    RxCancelled = 2,
    Hashing = 3,
    HashCancelled = 4,
    Finished = 5,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::RxFailed | State::RxCancelled | State::HashCancelled | State::Finished)
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => State::RxIniting,
            1 => State::RxFailed,
            2 => State::RxCancelled,
            3 => State::Hashing,
            4 => State::HashCancelled,
            5 => State::Finished,
            _ => unreachable!("invalid state tag"),
        }
    }
}

struct StateCell(AtomicU8);

impl StateCell {
    fn new(s: State) -> Self {
        Self(AtomicU8::new(s as u8))
    }

    fn load(&self) -> State {
        State::from_u8(self.0.load(Ordering::Acquire))
    }

    fn store(&self, s: State) {
        self.0.store(s as u8, Ordering::Release);
    }
}

/// One prover's result: the full proof string, its RandomX hash, and its difficulty.
#[derive(Debug, Clone)]
pub struct HashResult {
    pub proof: String,
    pub hash: Bigint256,
    pub diff: u32,
}

impl Default for HashResult {
    fn default() -> Self {
        Self { proof: String::new(), hash: Bigint256::new(), diff: 0 }
    }
}

/// Snapshot of state guarded by the master mutex.
#[derive(Debug, Clone)]
pub struct MasterState {
    pub threads_running: u32,
    pub threads_active: bool,
    pub master_finished: bool,
    pub error_str: String,
    pub warnings: Vec<String>,
    pub rx_time: Option<Duration>,
    pub hash_start_time: Option<Instant>,
    pub hash_stop_time: Option<Instant>,
    pub best_results: Vec<HashResult>,
}

impl Default for MasterState {
    fn default() -> Self {
        Self {
            threads_running: 0,
            threads_active: false,
            master_finished: false,
            error_str: String::new(),
            warnings: Vec::new(),
            rx_time: None,
            hash_start_time: None,
            hash_stop_time: None,
            best_results: Vec::new(),
        }
    }
}

/// Snapshot of the unlocked per-worker progress atomics.
#[derive(Debug, Clone)]
pub struct ThreadStateSnapshot {
    pub best_diff: Vec<u32>,
    pub hashes: Vec<u64>,
}

struct ThreadState {
    best_diff: Vec<AtomicU32>,
    hashes: Vec<AtomicU64>,
}

struct Shared {
    content: ProofContent,
    init_cores: Vec<usize>,
    hash_cores: Vec<usize>,
    use_large_pages: bool,
    diff: Option<u32>,
    time_limit: Option<Duration>,
    running: AtomicBool,
    cancelled: AtomicBool,
    state: StateCell,
    thread_state: ThreadState,
    master: Mutex<MasterState>,
    master_cond: Condvar,
}

/// Drives one wxPoW v0 proving request from construction to a terminal state.
pub struct ProveManager {
    shared: Arc<Shared>,
    master_handle: Option<JoinHandle<()>>,
}

impl ProveManager {
    pub fn new(
        content: ProofContent,
        init_cores: Vec<usize>,
        hash_cores: Vec<usize>,
        use_large_pages: bool,
        diff: Option<u32>,
        time_limit: Option<Duration>,
    ) -> Self {
        let hash_thread_count = hash_cores.len();

        let thread_state = ThreadState {
            best_diff: (0..hash_thread_count).map(|_| AtomicU32::new(0)).collect(),
            hashes: (0..hash_thread_count).map(|_| AtomicU64::new(0)).collect(),
        };

        let master = Mutex::new(MasterState { threads_running: hash_thread_count as u32, ..Default::default() });

        let shared = Arc::new(Shared {
            content,
            init_cores,
            hash_cores,
            use_large_pages,
            diff,
            time_limit,
            running: AtomicBool::new(true),
            cancelled: AtomicBool::new(false),
            state: StateCell::new(State::RxIniting),
            thread_state,
            master,
            master_cond: Condvar::new(),
        });

        let master_shared = shared.clone();
        let master_handle = thread::spawn(move || master_task(master_shared));

        Self { shared, master_handle: Some(master_handle) }
    }

    /// Idempotent. Signals cancellation; the master and workers observe it within a
    /// bounded number of iterations and drive the state machine to a terminal state.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
        self.shared.running.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    pub fn get_master_guarded_data(&self) -> MasterState {
        self.shared.master.lock().expect("master mutex poisoned").clone()
    }

    pub fn get_thread_guarded_data(&self) -> ThreadStateSnapshot {
        let best_diff = self.shared.thread_state.best_diff.iter().map(|a| a.load(Ordering::Relaxed)).collect();
        let hashes = self.shared.thread_state.hashes.iter().map(|a| a.load(Ordering::Relaxed)).collect();

        ThreadStateSnapshot { best_diff, hashes }
    }

    pub fn get_state(&self) -> State {
        self.shared.state.load()
    }
}

impl Drop for ProveManager {
    fn drop(&mut self) {
        if let Some(handle) = self.master_handle.take() {
            let _ = handle.join();
        }
    }
}

fn master_task(shared: Arc<Shared>) {
    let metadata = encode_metadata(&shared.content);
    let key = hash_metadata(&metadata);

    let rx = RandomXManager::new_prove(
        &key,
        shared.init_cores.len(),
        shared.hash_cores.len(),
        shared.use_large_pages,
        &shared.cancelled,
    );

    let mut rx = match rx {
        Ok(rx) => rx,
        Err(e) => {
            error!("RandomX initialization failed: {e}");
            let mut guard = shared.master.lock().expect("master mutex poisoned");
            guard.error_str = e.to_string();
            guard.master_finished = true;
            shared.state.store(State::RxFailed);
            return;
        },
    };

    if rx.is_cancelled_init() {
        warn!("RandomX initialization was cancelled before hashing began");
        let mut guard = shared.master.lock().expect("master mutex poisoned");
        guard.rx_time = Some(rx.init_time);
        guard.master_finished = true;
        shared.state.store(State::RxCancelled);
        return;
    }

    let hash_thread_count = shared.hash_cores.len();
    let mut abs_deadline = None;

    {
        let mut guard = shared.master.lock().expect("master mutex poisoned");
        guard.warnings = rx.warnings.clone();
        guard.rx_time = Some(rx.init_time);
        let hash_start = Instant::now();
        guard.hash_start_time = Some(hash_start);
        guard.best_results = vec![HashResult::default(); hash_thread_count];

        if let Some(limit) = shared.time_limit {
            abs_deadline = Some(hash_start + limit);
        }

        guard.threads_active = true;
        shared.state.store(State::Hashing);
    }

    info!("RX init took {:?}; starting {} hash workers", rx.init_time, hash_thread_count);

    let handles: Vec<JoinHandle<()>> = (0..hash_thread_count)
        .map(|t| {
            let vm = rx.take_vm(t);
            let worker_shared = shared.clone();
            let core = shared.hash_cores[t];

            thread::spawn(move || {
                if !core_affinity::set_for_current(CoreId { id: core }) {
                    warn!("Failed to set affinity for hash thread {t} on core {core}");
                }

                hash_worker(t, vm, worker_shared);
            })
        })
        .collect();

    wait_for_hashing_to_finish(&shared, abs_deadline);

    let was_cancelled = shared.is_cancelled_sync();

    for handle in handles {
        let _ = handle.join();
    }

    let mut guard = shared.master.lock().expect("master mutex poisoned");
    guard.hash_stop_time = Some(Instant::now());
    guard.master_finished = true;
    shared.state.store(if was_cancelled { State::HashCancelled } else { State::Finished });
}

impl Shared {
    fn is_cancelled_sync(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

fn wait_for_hashing_to_finish(shared: &Arc<Shared>, abs_deadline: Option<Instant>) {
    let mut guard = shared.master.lock().expect("master mutex poisoned");

    loop {
        if !shared.running.load(Ordering::Acquire) || guard.threads_running == 0 {
            break;
        }

        match abs_deadline {
            Some(deadline) => {
                let now = Instant::now();

                if now >= deadline {
                    shared.running.store(false, Ordering::Release);
                    continue;
                }

                let (new_guard, timeout) =
                    shared.master_cond.wait_timeout(guard, deadline - now).expect("master mutex poisoned");
                guard = new_guard;

                if timeout.timed_out() {
                    shared.running.store(false, Ordering::Release);
                }
            },
            None => {
                guard = shared.master_cond.wait(guard).expect("master mutex poisoned");
            },
        }
    }
}

fn hash_worker(tid: usize, vm: randomx_rs::RandomXVM, shared: Arc<Shared>) {
    let mut best_result = HashResult::default();
    let mut local_hashes: u64 = 0;

    let thread_seed = Base64Counter::from_u32(tid as u32).to_string();
    let metadata = encode_metadata(&shared.content);
    let prefix = format!("{}|{}|", shared.content.body, thread_seed);
    let metadata_tail = format!("|{metadata}");

    let mut ctr_seed = Base64Counter::new();
    let min_diff = shared.diff.unwrap_or(256);

    loop {
        if (local_hashes & 0xf) as usize == (tid & 0xf) {
            if !shared.running.load(Ordering::Acquire) {
                break;
            }

            shared.thread_state.hashes[tid].store(local_hashes, Ordering::Relaxed);
        }

        let h = format!("{prefix}{}", ctr_seed.to_string());

        let hash_bytes = vm
            .calculate_hash(h.as_bytes())
            .expect("RandomX hash calculation is infallible once the VM exists");
        let this_hash = Bigint256::from_slice(&hash_bytes);
        let this_diff = this_hash.leading_zero_bits();

        if this_diff > best_result.diff {
            best_result = HashResult { proof: format!("{h}{metadata_tail}"), hash: this_hash, diff: this_diff };
            shared.thread_state.best_diff[tid].store(this_diff, Ordering::Relaxed);

            if this_diff >= min_diff {
                shared.running.store(false, Ordering::Release);
                break;
            }
        }

        ctr_seed.incr();
        local_hashes += 1;
    }

    let mut guard = shared.master.lock().expect("master mutex poisoned");
    guard.best_results[tid] = best_result;
    shared.thread_state.hashes[tid].store(local_hashes, Ordering::Relaxed);
    guard.threads_running -= 1;
    shared.master_cond.notify_one();
}

#[cfg(test)]
mod test {
    use super::{Base64Counter, State};

    #[test]
    fn terminal_states_match_spec() {
        assert!(!State::RxIniting.is_terminal());
        assert!(State::RxFailed.is_terminal());
        assert!(State::RxCancelled.is_terminal());
        assert!(!State::Hashing.is_terminal());
        assert!(State::HashCancelled.is_terminal());
        assert!(State::Finished.is_terminal());
    }

    #[test]
    fn thread_seed_is_stable_per_worker() {
        assert_eq!(Base64Counter::from_u32(0).to_string(), "A");
        assert_eq!(Base64Counter::from_u32(1).to_string(), "B");
    }
}
