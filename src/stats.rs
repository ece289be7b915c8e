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

use std::time::Instant;

use crate::prove_manager::ThreadStateSnapshot;

/// Samples a prove manager's unlocked atomics into a hash-rate line, the way the
/// teacher crate's stats store turns raw counters into a printable progress update.
pub struct ProgressStats {
    start: Instant,
}

impl ProgressStats {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn pretty_print(&self, snapshot: &ThreadStateSnapshot) -> String {
        let elapsed = self.start.elapsed().as_secs_f64().max(f64::EPSILON);
        let total_hashes: u64 = snapshot.hashes.iter().sum();
        let best_diff = snapshot.best_diff.iter().copied().max().unwrap_or(0);

        format!(
            "{:.2} H/s across {} threads | best difficulty so far: {}",
            total_hashes as f64 / elapsed,
            snapshot.hashes.len(),
            best_diff
        )
    }
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{ProgressStats, ThreadStateSnapshot};

    #[test]
    fn pretty_print_reports_best_difficulty() {
        let stats = ProgressStats::new();
        let snapshot = ThreadStateSnapshot { best_diff: vec![3, 7, 1], hashes: vec![10, 20, 5] };
        let line = stats.pretty_print(&snapshot);
        assert!(line.contains("best difficulty so far: 7"));
    }
}
