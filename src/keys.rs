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

use sha2::{Digest, Sha256};

use crate::bigint::Bigint256;
use crate::codec::{encode_metadata, ProofContent};

/// Derives the 32-byte RandomX key K from a proof's canonical metadata string.
pub fn derive_key(content: &ProofContent) -> Bigint256 {
    let metadata = encode_metadata(content);
    hash_metadata(&metadata)
}

pub fn hash_metadata(metadata: &str) -> Bigint256 {
    let mut hasher = Sha256::new();
    hasher.update(metadata.as_bytes());
    let digest = hasher.finalize();

    Bigint256::from_slice(&digest)
}

#[cfg(test)]
mod test {
    use super::hash_metadata;

    #[test]
    fn sha256_vector_hello_world() {
        assert_eq!(
            hash_metadata("Hello world!").to_hex_string(),
            "c0535e4be2b79ffd93291305436bf889314e4a3faec05ecffcbb7df31ad9e51a"
        );
    }

    #[test]
    fn sha256_vector_304() {
        assert_eq!(
            hash_metadata("304").to_hex_string(),
            "d874e4e4a5df21173b0f83e313151f813bea4f488686efe670ae47f87c177595"
        );
    }
}
