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

use bls12_381_plus::Scalar;
use group::Group;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{
    fields::{BbsField, PointEncoding},
    generators::Generators,
    keys::{BBSplusPublicKey, BBSplusSecretKey},
};
use crate::{
    errors::Error,
    schemes::algorithms::{PkPoint, Scheme, SigPoint},
    utils::{
        message::BBSplusMessage,
        util::{calculate_random_scalars, deserialize_hex, serialize_hex, ScalarExt},
    },
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusSignature<S: Scheme> {
    pub(crate) a: SigPoint<S>,
    pub(crate) e: Scalar,
    pub(crate) s: Scalar,
}

impl<S: Scheme> BBSplusSignature<S> {
    const POINT_LENGTH: usize = <SigPoint<S> as PointEncoding>::COMPRESSED_BYTES;

    /// `A || e || s`: 112 bytes when A is in G1, 160 bytes when A is in G2
    pub const LENGTH: usize = Self::POINT_LENGTH + 64;

    pub fn a(&self) -> SigPoint<S> {
        self.a
    }

    pub fn e(&self) -> Scalar {
        self.e
    }

    pub fn s(&self) -> Scalar {
        self.s
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::LENGTH);
        bytes.extend_from_slice(&self.a.to_compressed_bytes());
        bytes.extend_from_slice(&self.e.to_bytes_be());
        bytes.extend_from_slice(&self.s.to_bytes_be());
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != Self::LENGTH {
            return Err(Error::MalformedInput(format!(
                "signature must be {} bytes, got {}",
                Self::LENGTH,
                data.len()
            )));
        }

        let (a_bytes, scalars) = data.split_at(Self::POINT_LENGTH);
        let a = <SigPoint<S> as PointEncoding>::from_compressed_bytes(a_bytes)
            .ok_or_else(|| Error::DeserializationError("signature point A is not a valid point".to_owned()))?;
        let e = Scalar::from_bytes_be(&scalars[..32])
            .ok_or_else(|| Error::DeserializationError("signature scalar e is not canonical".to_owned()))?;
        let s = Scalar::from_bytes_be(&scalars[32..])
            .ok_or_else(|| Error::DeserializationError("signature scalar s is not canonical".to_owned()))?;

        Ok(Self { a, e, s })
    }

    /// # Description
    /// Signs an ordered, non empty list of messages.
    ///
    /// # Inputs:
    /// * `sk` (REQUIRED), the signer secret key
    /// * `pk` (REQUIRED), the public key matching `sk`, used to derive the message generators
    /// * `messages` (REQUIRED), the messages to sign
    ///
    /// # Output:
    /// a fresh [`BBSplusSignature`]; two calls on the same input return different signatures
    pub fn sign(sk: &BBSplusSecretKey, pk: &BBSplusPublicKey<S::Field>, messages: &[Vec<u8>]) -> Result<Self, Error> {
        Self::sign_with_rng(sk, pk, messages, &mut rand::thread_rng())
    }

    pub fn sign_with_rng<R: RngCore + CryptoRng>(
        sk: &BBSplusSecretKey,
        pk: &BBSplusPublicKey<S::Field>,
        messages: &[Vec<u8>],
        rng: &mut R,
    ) -> Result<Self, Error> {
        if messages.is_empty() {
            return Err(Error::EmptyMessageSet);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<S>(messages)?;
        let generators = Generators::<S>::create(pk, messages.len())?;

        core_sign::<S, R>(sk, &generators, &message_scalars, rng)
    }

    /// # Description
    /// Verifies the signature against `pk` and the full list of signed messages.
    ///
    /// # Output:
    /// `Ok(true)` for a valid signature, `Ok(false)` for any cryptographic mismatch,
    /// `Err` only for an empty or oversized message list
    pub fn verify(&self, pk: &BBSplusPublicKey<S::Field>, messages: &[Vec<u8>]) -> Result<bool, Error> {
        if messages.is_empty() {
            return Err(Error::EmptyMessageSet);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<S>(messages)?;
        let generators = Generators::<S>::create(pk, messages.len())?;

        Ok(core_verify::<S>(pk, self, &message_scalars, &generators))
    }
}

impl<S: Scheme> Serialize for BBSplusSignature<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de, S: Scheme> Deserialize<'de> for BBSplusSignature<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_hex(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// B = P1 + Q1 * s + H_1 * msg_1 + ... + H_L * msg_L
pub(crate) fn compute_b<S: Scheme>(
    generators: &Generators<S>,
    s: Scalar,
    messages: &[BBSplusMessage],
) -> Result<SigPoint<S>, Error> {
    if generators.message_generators.len() != messages.len() {
        return Err(Error::NotEnoughGenerators);
    }

    let mut B = generators.base_point + generators.q1 * s;
    for (H_i, m_i) in generators.message_generators.iter().zip(messages) {
        B += *H_i * m_i.value;
    }
    Ok(B)
}

fn core_sign<S, R>(
    sk: &BBSplusSecretKey,
    generators: &Generators<S>,
    messages: &[BBSplusMessage],
    rng: &mut R,
) -> Result<BBSplusSignature<S>, Error>
where
    S: Scheme,
    R: RngCore + CryptoRng,
{
    let random_scalars = calculate_random_scalars(rng, 2);
    let (e, s) = (random_scalars[0], random_scalars[1]);

    let B = compute_b::<S>(generators, s, messages)?;

    // A = B * (1 / (SK + e))
    let inv: Option<Scalar> = (sk.0 + e).invert().into();
    let inv = inv.ok_or_else(|| Error::SignatureGenerationError("SK + e is zero".to_owned()))?;
    let A = B * inv;

    if bool::from(A.is_identity()) {
        return Err(Error::SignatureGenerationError("A is the identity".to_owned()));
    }

    Ok(BBSplusSignature { a: A, e, s })
}

pub(crate) fn core_verify<S: Scheme>(
    pk: &BBSplusPublicKey<S::Field>,
    signature: &BBSplusSignature<S>,
    messages: &[BBSplusMessage],
    generators: &Generators<S>,
) -> bool {
    if bool::from(signature.a.is_identity()) || bool::from(pk.0.is_identity()) {
        log::debug!("signature verification failed: identity element");
        return false;
    }

    let B = match compute_b::<S>(generators, signature.s, messages) {
        Ok(B) => B,
        Err(_) => return false,
    };

    // e(A, PK + BP * e) * e(B, -BP) == 1
    let BP = <PkPoint<S> as Group>::generator();
    let A2 = pk.0 + BP * signature.e;

    let valid = <S::Field as BbsField>::pairing_product_is_identity(&[(signature.a, A2), (B, -BP)]);
    if !valid {
        log::debug!("signature verification failed: pairing check");
    }
    valid
}
