// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use core::fmt::Debug;
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
use sha2::Sha256;
use sha3::Shake256;

/// Hash and expander used for hash-to-scalar and hash-to-curve.
///
/// The full ciphersuite ID also names the group of the signature points and is
/// built by [`crate::schemes::algorithms::Scheme::api_id`].
pub trait BbsCiphersuite: 'static + Clone + Debug + PartialEq + Eq + Send + Sync {
    /// Hash-to-curve suite suffix of the ciphersuite ID
    const HASH_ID: &'static [u8];
    /// Output length of `expand_message` when hashing to a scalar, `ceil((ceil(log2(r)) + k) / 8)`
    const EXPAND_LEN: usize = 48;
    type Expander: for<'a> ExpandMsg<'a>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Bls12381Sha256;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Bls12381Shake256;

impl BbsCiphersuite for Bls12381Sha256 {
    const HASH_ID: &'static [u8] = b"XMD:SHA-256_SSWU_RO_";
    type Expander = ExpandMsgXmd<Sha256>;
}

impl BbsCiphersuite for Bls12381Shake256 {
    const HASH_ID: &'static [u8] = b"XOF:SHAKE-256_SSWU_RO_";
    type Expander = ExpandMsgXof<Shake256>;
}
