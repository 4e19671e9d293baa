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

//! Byte oriented entry points.
//!
//! Keys, signatures and proofs cross this boundary as plain octet strings. Length and
//! framing problems, as well as keys that do not decode, are reported as
//! [`Error::MalformedInput`]; signature and proof bytes of the right shape that do not
//! decode simply fail verification.

use crate::{
    bbsplus::{
        keys::{BBSplusPublicKey, BBSplusSecretKey},
        proof::BBSplusPoKSignature,
        signature::BBSplusSignature,
    },
    errors::Error,
    keys::pair::KeyPair,
    schemes::algorithms::{BbsBls12381G1Sha256, BbsBls12381G2Sha256, Scheme},
};

pub const DEFAULT_BLS12381_PRIVATE_KEY_LENGTH: usize = 32;
/// Compressed G1 public key
pub const DEFAULT_BLS12381_G1_PUBLIC_KEY_LENGTH: usize = 48;
/// Compressed G2 public key
pub const DEFAULT_BLS12381_G2_PUBLIC_KEY_LENGTH: usize = 96;
pub const BLS12381_G1_PUBLIC_KEY_UNCOMPRESSED_LENGTH: usize = 96;
pub const BLS12381_G2_PUBLIC_KEY_UNCOMPRESSED_LENGTH: usize = 192;
pub const BLS12381_BLINDING_FACTOR_LENGTH: usize = 32;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bls12381KeyPair {
    pub secret_key: Vec<u8>,
    pub public_key: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlindedBls12381KeyPair {
    pub secret_key: Vec<u8>,
    pub public_key: Vec<u8>,
    pub blinding_factor: Vec<u8>,
}

impl<S: Scheme> From<KeyPair<S>> for Bls12381KeyPair {
    fn from(kp: KeyPair<S>) -> Self {
        Self {
            secret_key: kp.private_key().to_bytes().to_vec(),
            public_key: kp.public_key().to_bytes(),
        }
    }
}

// Key derivation does not depend on the ciphersuite, the SHA-256 schemes only pick the field.

pub fn generate_bls12381_g1_key_pair(seed: Option<&[u8]>) -> Result<Bls12381KeyPair, Error> {
    KeyPair::<BbsBls12381G1Sha256>::generate(seed).map(Bls12381KeyPair::from)
}

pub fn generate_bls12381_g2_key_pair(seed: Option<&[u8]>) -> Result<Bls12381KeyPair, Error> {
    KeyPair::<BbsBls12381G2Sha256>::generate(seed).map(Bls12381KeyPair::from)
}

pub fn generate_blinded_bls12381_g1_key_pair(seed: Option<&[u8]>) -> Result<BlindedBls12381KeyPair, Error> {
    generate_blinded::<BbsBls12381G1Sha256>(seed)
}

pub fn generate_blinded_bls12381_g2_key_pair(seed: Option<&[u8]>) -> Result<BlindedBls12381KeyPair, Error> {
    generate_blinded::<BbsBls12381G2Sha256>(seed)
}

fn generate_blinded<S: Scheme>(seed: Option<&[u8]>) -> Result<BlindedBls12381KeyPair, Error> {
    let (key_pair, blinding_factor) = KeyPair::<S>::generate_blinded(seed)?.into_parts();
    let Bls12381KeyPair { secret_key, public_key } = key_pair.into();

    Ok(BlindedBls12381KeyPair {
        secret_key,
        public_key,
        blinding_factor: blinding_factor.to_bytes().to_vec(),
    })
}

fn as_malformed(e: Error) -> Error {
    match e {
        Error::DeserializationError(reason) => Error::MalformedInput(reason),
        e => e,
    }
}

fn parse_public_key<S: Scheme>(public_key: &[u8]) -> Result<BBSplusPublicKey<S::Field>, Error> {
    BBSplusPublicKey::<S::Field>::from_bytes(public_key).map_err(as_malformed)
}

/// Signs `messages`, returning `A || e || s`.
pub fn bls_sign<S: Scheme>(secret_key: &[u8], public_key: &[u8], messages: &[Vec<u8>]) -> Result<Vec<u8>, Error> {
    let sk = BBSplusSecretKey::from_bytes(secret_key).map_err(as_malformed)?;
    let pk = parse_public_key::<S>(public_key)?;

    BBSplusSignature::<S>::sign(&sk, &pk, messages).map(|signature| signature.to_bytes())
}

pub fn bls_verify<S: Scheme>(public_key: &[u8], messages: &[Vec<u8>], signature: &[u8]) -> Result<bool, Error> {
    let pk = parse_public_key::<S>(public_key)?;
    let signature = match BBSplusSignature::<S>::from_bytes(signature) {
        Ok(signature) => signature,
        Err(Error::DeserializationError(reason)) => {
            log::debug!("signature verification failed: {}", reason);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    signature.verify(&pk, messages)
}

/// Creates a proof disclosing `messages[i]` for every `i` in `revealed`.
pub fn bls_create_proof<S: Scheme>(
    signature: &[u8],
    public_key: &[u8],
    messages: &[Vec<u8>],
    nonce: &[u8],
    revealed: &[usize],
) -> Result<Vec<u8>, Error> {
    let pk = parse_public_key::<S>(public_key)?;
    let signature = BBSplusSignature::<S>::from_bytes(signature).map_err(as_malformed)?;

    BBSplusPoKSignature::<S>::proof_gen(&signature, &pk, messages, nonce, revealed).map(|proof| proof.to_bytes())
}

/// `revealed_messages` must be in ascending order of their signing position.
pub fn bls_verify_proof<S: Scheme>(
    proof: &[u8],
    public_key: &[u8],
    revealed_messages: &[Vec<u8>],
    nonce: &[u8],
) -> Result<bool, Error> {
    let pk = parse_public_key::<S>(public_key)?;
    let proof = match BBSplusPoKSignature::<S>::from_bytes(proof) {
        Ok(proof) => proof,
        Err(Error::DeserializationError(reason)) => {
            log::debug!("proof verification failed: {}", reason);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    proof.proof_verify(&pk, revealed_messages, nonce)
}
