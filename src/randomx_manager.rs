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

//! Owns the RandomX cache/dataset/VM lifecycle for one proving or verifying session.
//!
//! Cancellation during dataset initialization is checked at the call-boundary
//! granularity the safe `randomx-rs` wrapper allows: `RandomXDataset::new` performs its
//! own internal parallel init and does not expose a per-item callback, so this manager
//! checks `cancelled` immediately before and after that call rather than every 16 items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use randomx_rs::{RandomXCache, RandomXDataset, RandomXFlag, RandomXVM};

use crate::bigint::Bigint256;
use crate::error::RxError;

pub struct RandomXManager {
    vms: Vec<Option<RandomXVM>>,
    pub warnings: Vec<String>,
    pub init_time: Duration,
}

impl RandomXManager {
    /// Prove-mode construction: allocates a full dataset and one VM per hash worker.
    pub fn new_prove(
        key: &Bigint256,
        init_core_count: usize,
        hash_thread_count: usize,
        use_large_pages: bool,
        cancelled: &AtomicBool,
    ) -> Result<Self, RxError> {
        let tic = Instant::now();
        let mut warnings = Vec::new();

        let mut flags = RandomXFlag::get_recommended_flags() | RandomXFlag::FLAG_FULL_MEM;

        if use_large_pages {
            flags |= RandomXFlag::FLAG_LARGE_PAGES;
        }

        let cache = RandomXCache::new(flags, key.bytes()).map_err(|e| {
            let mut what = format!("{e}");
            if use_large_pages {
                what.push_str(" Try disabling large pages.");
            }
            RxError::CacheInit(what)
        })?;

        if cancelled.load(Ordering::Acquire) {
            warnings.push("RX initialization was cancelled.".to_string());
            return Ok(Self { vms: Vec::new(), warnings, init_time: tic.elapsed() });
        }

        let init_threads = init_core_count.max(1).min(u8::MAX as usize) as u8;

        let dataset = RandomXDataset::new(flags, cache, init_threads).map_err(|e| {
            let mut what = format!("{e}");
            if use_large_pages {
                what.push_str(" Try disabling large pages.");
            }
            RxError::DatasetInit(what)
        })?;

        if cancelled.load(Ordering::Acquire) {
            warnings.push("RX initialization was cancelled.".to_string());
            return Ok(Self { vms: Vec::new(), warnings, init_time: tic.elapsed() });
        }

        let mut vms = Vec::with_capacity(hash_thread_count);

        for _ in 0..hash_thread_count {
            let vm = RandomXVM::new(flags, None, Some(dataset.clone()))
                .map_err(|e| RxError::VmCreate(format!("{e}")))?;
            vms.push(Some(vm));
        }

        Ok(Self { vms, warnings, init_time: tic.elapsed() })
    }

    /// Verify-mode construction: a single cache-bound VM, no dataset.
    pub fn new_verify(key: &Bigint256, use_large_pages: bool) -> Result<Self, RxError> {
        let tic = Instant::now();

        let mut flags = RandomXFlag::get_recommended_flags();

        if use_large_pages {
            flags |= RandomXFlag::FLAG_LARGE_PAGES;
        }

        let cache = RandomXCache::new(flags, key.bytes()).map_err(|e| {
            let mut what = format!("{e}");
            if use_large_pages {
                what.push_str(" Try disabling large pages.");
            }
            RxError::CacheInit(what)
        })?;

        let vm = RandomXVM::new(flags, Some(cache), None)
            .map_err(|e| RxError::VmCreate(format!("{e}")))?;

        Ok(Self { vms: vec![Some(vm)], warnings: Vec::new(), init_time: tic.elapsed() })
    }

    /// Takes ownership of the VM assigned to worker `tid`; each worker gets exactly one.
    pub fn take_vm(&mut self, tid: usize) -> RandomXVM {
        self.vms[tid].take().expect("VM already taken for this thread id")
    }

    pub fn is_cancelled_init(&self) -> bool {
        self.vms.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicBool;

    use super::RandomXManager;
    use crate::bigint::Bigint256;

    // RandomX dataset/cache allocation is expensive (hundreds of MB) and exercises a
    // native library; these are smoke tests rather than something run on every commit.
    #[test]
    #[ignore]
    fn verify_mode_allocates_one_vm() {
        let key = Bigint256::new();
        let mgr = RandomXManager::new_verify(&key, false).expect("verify mode init");
        assert!(!mgr.is_cancelled_init());
    }

    #[test]
    #[ignore]
    fn prove_mode_respects_pre_init_cancellation() {
        let key = Bigint256::new();
        let cancelled = AtomicBool::new(true);
        let mgr = RandomXManager::new_prove(&key, 1, 1, false, &cancelled).expect("prove mode init");
        assert!(mgr.is_cancelled_init());
        assert!(mgr.warnings.iter().any(|w| w.contains("cancelled")));
    }
}
