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

use crate::canonical::trim_body;

pub const MAGIC_SEQUENCE: &str = "|wxPoW0|";

/// A parsed (body, userId, context) triple. `version` is always 0 for v0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofContent {
    pub body: String,
    pub version: u32,
    pub user_id: String,
    pub context: String,
}

impl ProofContent {
    pub fn new(body: String, user_id: String, context: String) -> Self {
        Self { body, version: 0, user_id, context }
    }
}

/// Splits a candidate proof string around the last `|wxPoW0|` occurrence.
///
/// Canonicalizes the body first. Returns `None` if the magic sequence is absent or
/// located at position 0 (an empty body is not a valid proof).
pub fn split(proof: &str) -> Option<ProofContent> {
    let msg = trim_body(proof);
    let pos = msg.rfind(MAGIC_SEQUENCE)?;

    if pos == 0 {
        return None;
    }

    let body = msg[..pos].to_string();
    let rest = &msg[pos + MAGIC_SEQUENCE.len()..];

    if rest.is_empty() {
        return None;
    }

    let mut user_id = String::new();
    let mut context = String::new();
    let mut chars = rest.chars().peekable();
    let mut just_saw_backslash = false;
    let mut consuming = true;

    while consuming {
        let Some(c) = chars.next() else { break };

        if c == '\\' {
            just_saw_backslash = true;
        } else if c == '|' && !just_saw_backslash {
            consuming = false;
        } else {
            user_id.push(c);
            just_saw_backslash = false;
        }
    }

    just_saw_backslash = false;

    for c in chars {
        if c == '\\' {
            just_saw_backslash = true;
        } else {
            context.push(c);
            just_saw_backslash = false;
        }
    }

    Some(ProofContent::new(body, user_id, context))
}

/// Renders the canonical metadata string hashed with SHA-256 to derive the RandomX key.
pub fn encode_metadata(content: &ProofContent) -> String {
    format!("wxPoW0|{}|{}", content.user_id, content.context)
}

#[cfg(test)]
mod test {
    use super::{encode_metadata, split, ProofContent};

    #[test]
    fn splits_basic_proof() {
        let content = split("Hello world!|wxPoW0||").unwrap();
        assert_eq!(content.body, "Hello world!");
        assert_eq!(content.user_id, "");
        assert_eq!(content.context, "");
    }

    #[test]
    fn splits_proof_with_user_and_context() {
        let content = split("Hello world!|wxPoW0|qwerty|uiop").unwrap();
        assert_eq!(content.body, "Hello world!");
        assert_eq!(content.user_id, "qwerty");
        assert_eq!(content.context, "uiop");
    }

    #[test]
    fn anchors_on_last_magic_sequence() {
        let content = split("|wxPoW0|Hello world!|wxPoW0|qwerty|uiop").unwrap();
        assert_eq!(content.body, "|wxPoW0|Hello world!");
        assert_eq!(content.user_id, "qwerty");
        assert_eq!(content.context, "uiop");
    }

    #[test]
    fn rejects_wrong_version_tag() {
        assert!(split("Hello world!|wxPoW1|qwerty|uiop").is_none());
    }

    #[test]
    fn rejects_missing_leading_pipe() {
        assert!(split("Hello world!wxPoW0|").is_none());
    }

    #[test]
    fn rejects_magic_sequence_at_position_zero() {
        assert!(split("|wxPoW0|qwerty|uiop").is_none());
    }

    #[test]
    fn rejects_nothing_trailing_the_magic_sequence() {
        assert!(split("Hello world!|wxPoW0|").is_none());
    }

    #[test]
    fn backslash_escapes_pipe_in_user_id() {
        let content = split("body|wxPoW0|a\\|b|c").unwrap();
        assert_eq!(content.user_id, "a|b");
        assert_eq!(content.context, "c");
    }

    #[test]
    fn encode_metadata_matches_format() {
        let content = ProofContent::new("b".to_string(), "u".to_string(), "c".to_string());
        assert_eq!(encode_metadata(&content), "wxPoW0|u|c");
    }
}
