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

//! BBS+ signatures over BLS12-381 with zero-knowledge selective disclosure.
//!
//! An issuer signs an ordered list of messages with a single constant-size signature.
//! The holder can later prove possession of that signature while revealing only a chosen
//! subset of the messages. Each proof is freshly randomized and bound to a verifier nonce,
//! so two proofs from the same signature cannot be linked.
//!
//! Two mirrored variants are supported: public key in G2 with signature points in G1,
//! or public key in G1 with signature points in G2. Each comes with a SHA-256 and a
//! SHAKE-256 ciphersuite, see [`crate::schemes::algorithms`].

/// Module for ciphersuites
pub mod ciphersuites;
/// Module for the field variants
pub mod fields;
/// Module for generators
pub mod generators;
/// Module for keys
pub mod keys;
/// Module for proofs
pub mod proof;
/// Module for signatures
pub mod signature;
