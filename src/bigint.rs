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

/// Fixed 256-bit hash holder, most-significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bigint256 {
    buf: [u8; 32],
}

impl Bigint256 {
    /// Sentinel "worst possible hash" value: all bits set.
    pub fn new() -> Self {
        Self { buf: [0xffu8; 32] }
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { buf: bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 32];
        let n = bytes.len().min(32);
        buf[..n].copy_from_slice(&bytes[..n]);
        Self { buf }
    }

    pub fn bytes(&self) -> &[u8; 32] {
        &self.buf
    }

    /// Leading-zero-bit count, MSB first across all 32 bytes. Returns 256 for an all-zero value.
    pub fn leading_zero_bits(&self) -> u32 {
        for (i, byte) in self.buf.iter().enumerate() {
            for j in 0..8u32 {
                let mask = 1u8 << (7 - j);

                if byte & mask != 0 {
                    return (i as u32) * 8 + j;
                }
            }
        }

        256
    }

    pub fn to_hex_string(&self) -> String {
        hex::encode(self.buf)
    }
}

impl Default for Bigint256 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::Bigint256;

    #[test]
    fn all_zero_has_diff_256() {
        assert_eq!(Bigint256::from_bytes([0u8; 32]).leading_zero_bits(), 256);
    }

    #[test]
    fn msb_set_has_diff_0() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x80;
        assert_eq!(Bigint256::from_bytes(bytes).leading_zero_bits(), 0);
    }

    #[test]
    fn second_bit_set_has_diff_1() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x40;
        assert_eq!(Bigint256::from_bytes(bytes).leading_zero_bits(), 1);
    }

    #[test]
    fn lsb_of_last_byte_has_diff_255() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x01;
        assert_eq!(Bigint256::from_bytes(bytes).leading_zero_bits(), 255);
    }

    #[test]
    fn every_bit_position_is_distinguished() {
        for p in 0..256u32 {
            let mut bytes = [0u8; 32];
            let byte_idx = (p / 8) as usize;
            let bit_idx = p % 8;
            bytes[byte_idx] = 1u8 << (7 - bit_idx);
            assert_eq!(Bigint256::from_bytes(bytes).leading_zero_bits(), p);
        }
    }

    #[test]
    fn hex_rendering_is_lowercase_64_chars() {
        let big = Bigint256::new();
        let hex = big.to_hex_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hex, "f".repeat(64));
    }
}
