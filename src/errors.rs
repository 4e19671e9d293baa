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

use thiserror::Error;

/// Failures surfaced by key generation, signing and proving.
///
/// A signature or proof that is well formed but does not verify is never an
/// error: verification returns `Ok(false)` in that case.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),
    #[error("The message set is empty")]
    EmptyMessageSet,
    #[error("Revealed index {0} is out of range or duplicated")]
    IndexOutOfRange(usize),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Error during deserialization: {0}")]
    DeserializationError(String),
    #[error("Error during serialization: {0}")]
    SerializationError(String),
    #[error("Signature does not verify against the public key and messages")]
    SignatureMismatch,
    #[error("Error during computation of a Signature: {0}")]
    SignatureGenerationError(String),
    #[error("Error during computation of a Proof of Knowledge of a Signature: {0}")]
    ProofGenError(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Not enough Generators")]
    NotEnoughGenerators,
}
