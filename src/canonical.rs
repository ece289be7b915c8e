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

//! Body canonicalization: trims the same fixed set of Unicode whitespace codepoints the
//! prover and verifier must agree on, so a round trip through both sides is stable.

const SKIPPABLE1: [u8; 6] = [0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x20];

const SKIPPABLE2: [[u8; 2]; 2] = [[0xc2, 0x85], [0xc2, 0xa0]];

const SKIPPABLE3: [[u8; 3]; 23] = [
    [0xe1, 0x9a, 0x80],
    [0xe1, 0xa0, 0x8e],
    [0xe2, 0x80, 0x80],
    [0xe2, 0x80, 0x81],
    [0xe2, 0x80, 0x82],
    [0xe2, 0x80, 0x83],
    [0xe2, 0x80, 0x84],
    [0xe2, 0x80, 0x85],
    [0xe2, 0x80, 0x86],
    [0xe2, 0x80, 0x87],
    [0xe2, 0x80, 0x88],
    [0xe2, 0x80, 0x89],
    [0xe2, 0x80, 0x8a],
    [0xe2, 0x80, 0x8b],
    [0xe2, 0x80, 0x8c],
    [0xe2, 0x80, 0x8d],
    [0xe2, 0x80, 0xa8],
    [0xe2, 0x80, 0xa9],
    [0xe2, 0x80, 0xaf],
    [0xe2, 0x81, 0x9f],
    [0xe2, 0x81, 0xa0],
    [0xe3, 0x80, 0x80],
    [0xe3, 0xbb, 0xbf],
];

/// Number of bytes (0 if not whitespace) of the skippable codepoint starting at `pos`.
fn utf8_chars_to_skip(bytes: &[u8], pos: usize) -> usize {
    let c = bytes[pos];

    if c & 0x80 == 0 {
        if SKIPPABLE1.contains(&c) {
            return 1;
        }
    } else if c == 0xc2 && pos + 1 < bytes.len() {
        let pair = [bytes[pos], bytes[pos + 1]];

        if SKIPPABLE2.contains(&pair) {
            return 2;
        }
    } else if pos + 2 < bytes.len() {
        let triple = [bytes[pos], bytes[pos + 1], bytes[pos + 2]];

        if SKIPPABLE3.contains(&triple) {
            return 3;
        }
    }

    0
}

/// Strips leading/trailing whitespace codepoints from the fixed set above.
pub fn trim_body(body: &str) -> String {
    let bytes = body.as_bytes();
    let len = bytes.len();

    if len == 0 {
        return String::new();
    }

    let mut start = 0usize;

    while start < len {
        let skip = utf8_chars_to_skip(bytes, start);

        if skip > 0 {
            start += skip;
        } else {
            break;
        }
    }

    if start >= len {
        return String::new();
    }

    // Signed so the "crossed past the start" conditions can go negative, mirroring the
    // original s32 arithmetic instead of juggling usize underflow by hand.
    let start_i = start as i64;
    let mut end = (len - 1) as i64;
    let mut char_bytes: i64 = 0;

    while end - char_bytes >= start_i {
        let idx = (end - char_bytes) as usize;
        let this_c = bytes[idx];

        if this_c & 0xc0 == 0x80 {
            char_bytes += 1;
            continue;
        }

        let skip = utf8_chars_to_skip(bytes, idx);

        if skip > 0 {
            end -= skip as i64;
            char_bytes = 0;
        } else {
            break;
        }
    }

    let new_len = end - start_i + 1;

    if new_len <= 0 {
        return String::new();
    }

    let end_idx = end as usize;

    std::str::from_utf8(&bytes[start..=end_idx])
        .expect("trimming only cuts at whitespace codepoint boundaries")
        .to_string()
}

#[cfg(test)]
mod test {
    use super::trim_body;

    #[test]
    fn strips_ascii_whitespace_both_ends() {
        assert_eq!(
            trim_body(" \r\n\t hello\t world! \r\n\t "),
            "hello\t world!"
        );
    }

    #[test]
    fn strips_ideographic_space_both_ends() {
        let s = "\u{3000}hello\u{3000}";
        assert_eq!(trim_body(s), "hello");
    }

    #[test]
    fn interior_whitespace_survives() {
        let s = "a\u{3000}b";
        assert_eq!(trim_body(s), "a\u{3000}b");
    }

    #[test]
    fn all_whitespace_yields_empty() {
        assert_eq!(trim_body("   \t\r\n  "), "");
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(trim_body(""), "");
    }

    #[test]
    fn idempotent() {
        let samples = [" \r\n\t hello\t world! \r\n\t ", "\u{3000}hello\u{3000}", "plain", ""];

        for s in samples {
            let once = trim_body(s);
            let twice = trim_body(&once);
            assert_eq!(once, twice);
        }
    }
}
