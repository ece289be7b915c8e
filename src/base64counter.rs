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

use std::fmt::Write;

const MAX_SIZE: usize = 64;

const MAPPING: [u8; 64] = [
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O', b'P',
    b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b'a', b'b', b'c', b'd', b'e', b'f',
    b'g', b'h', b'i', b'j', b'k', b'l', b'm', b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v',
    b'w', b'x', b'y', b'z', b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'-', b'_',
];

/// Minimal custom base-64 counter used for thread and attempt seed printing.
pub struct Base64Counter {
    buf: [u8; MAX_SIZE],
    len: u32,
}

impl Base64Counter {
    pub fn new() -> Self {
        Self { buf: [0u8; MAX_SIZE], len: 1 }
    }

    pub fn from_u64(val: u64) -> Self {
        let mut buf = [0u8; MAX_SIZE];

        for n in (0..64).step_by(6) {
            buf[n / 6] = ((val >> n) & 0x3f) as u8;
        }

        let mut len = 1;

        for n in (1..=(64 / 6)).rev() {
            if buf[n] > 0 {
                len = (n as u32) + 1;
                break;
            }
        }

        Self { buf, len }
    }

    pub fn from_u32(val: u32) -> Self {
        Self::from_u64(val as u64)
    }

    pub fn incr(&mut self) {
        let mut i = 0;

        while i < MAX_SIZE {
            self.buf[i] = self.buf[i].wrapping_add(1);

            if self.buf[i] <= 0x3f {
                break;
            }

            self.buf[i] = 0;
            i += 1;
        }

        if (i as u32) >= self.len {
            self.len = (i as u32) + 1;
        }
    }
}

impl Default for Base64Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Base64Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.len as usize {
            debug_assert!(self.buf[i] <= 0x3f);
            f.write_char(MAPPING[self.buf[i] as usize] as char)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Base64Counter;

    #[test]
    fn small_values() {
        assert_eq!(Base64Counter::from_u64(0).to_string(), "A");
        assert_eq!(Base64Counter::from_u64(1).to_string(), "B");
        assert_eq!(Base64Counter::from_u64(12).to_string(), "M");
        assert_eq!(Base64Counter::from_u64(0x37E).to_string(), "-N");
        assert_eq!(Base64Counter::from_u64(0xFFFFFFFF).to_string(), "_____D");
        assert_eq!(
            Base64Counter::from_u64(0xF9E8D7C6B5A43210).to_string(),
            "QIDp1a81onP"
        );
    }

    #[test]
    fn increment_rollover() {
        let mut c = Base64Counter::from_u64(0);
        assert_eq!(c.to_string(), "A");

        for _ in 0..63 {
            c.incr();
        }
        assert_eq!(c.to_string(), "_");

        c.incr();
        assert_eq!(c.to_string(), "AB");

        for _ in 0..63 {
            c.incr();
        }
        assert_eq!(c.to_string(), "_B");

        c.incr();
        assert_eq!(c.to_string(), "AC");

        for _ in 0..(62 * 64) {
            c.incr();
        }
        assert_eq!(c.to_string(), "__");

        c.incr();
        assert_eq!(c.to_string(), "AAB");
    }

    #[test]
    fn incr_matches_direct_construction() {
        let mut counter = Base64Counter::from_u64(0);

        for k in 1..2000u64 {
            counter.incr();
            assert_eq!(counter.to_string(), Base64Counter::from_u64(k).to_string());
        }
    }
}
