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
    keys::BBSplusPublicKey,
    signature::{compute_b, core_verify, BBSplusSignature},
};
use crate::{
    errors::Error,
    schemes::algorithms::{PkPoint, Scheme, SigPoint},
    utils::{
        message::BBSplusMessage,
        util::{
            calculate_random_scalars, deserialize_hex, get_messages, get_remaining_indexes, hash_to_scalar, i2osp,
            serialize_hex, ScalarExt,
        },
    },
};

/// Largest number of messages a proof can describe, bound by the 2 byte header.
pub const MAX_PROOF_MESSAGES: usize = u16::MAX as usize;

/// Zero-knowledge proof of knowledge of a signature, disclosing a subset of the signed messages.
///
/// The proof carries the total message count and the disclosed positions, so a verifier
/// only needs the disclosed messages (in ascending index order) and the nonce.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusPoKSignature<S: Scheme> {
    message_count: usize,
    disclosed_indexes: Vec<usize>,
    A_prime: SigPoint<S>,
    A_bar: SigPoint<S>,
    D: SigPoint<S>,
    challenge: Scalar,
    e_cap: Scalar,
    r2_cap: Scalar,
    r3_cap: Scalar,
    s_cap: Scalar,
    m_cap: Vec<Scalar>,
}

impl<S: Scheme> BBSplusPoKSignature<S> {
    const POINT_LENGTH: usize = <SigPoint<S> as PointEncoding>::COMPRESSED_BYTES;
    const SCALAR_LENGTH: usize = 32;

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Disclosed positions, ascending
    pub fn disclosed_indexes(&self) -> &[usize] {
        &self.disclosed_indexes
    }

    /// `I2OSP(L, 2) || bitmap || A' || A_bar || D || c || e^ || r2^ || r3^ || s^ || m^_1 || ... || m^_U`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bitmap = vec![0u8; bitmap_length(self.message_count)];
        for &i in &self.disclosed_indexes {
            bitmap[i / 8] |= 1 << (i % 8);
        }

        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&i2osp(self.message_count, 2));
        bytes.extend_from_slice(&bitmap);
        bytes.extend_from_slice(&self.A_prime.to_compressed_bytes());
        bytes.extend_from_slice(&self.A_bar.to_compressed_bytes());
        bytes.extend_from_slice(&self.D.to_compressed_bytes());
        bytes.extend_from_slice(&self.challenge.to_bytes_be());
        bytes.extend_from_slice(&self.e_cap.to_bytes_be());
        bytes.extend_from_slice(&self.r2_cap.to_bytes_be());
        bytes.extend_from_slice(&self.r3_cap.to_bytes_be());
        bytes.extend_from_slice(&self.s_cap.to_bytes_be());
        self.m_cap.iter().for_each(|v| bytes.extend_from_slice(&v.to_bytes_be()));
        bytes
    }

    /// Parses a proof.
    ///
    /// Framing problems (truncated data, an empty message set, a disclosed bit past the
    /// message count, trailing or missing response bytes) are [`Error::MalformedInput`].
    /// Points and scalars that do not decode are [`Error::DeserializationError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 2 {
            return Err(Error::MalformedInput("proof is missing the message count".to_owned()));
        }
        let message_count = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        if message_count == 0 {
            return Err(Error::MalformedInput("proof over an empty message set".to_owned()));
        }

        let bitmap_len = bitmap_length(message_count);
        let bitmap = bytes
            .get(2..2 + bitmap_len)
            .ok_or_else(|| Error::MalformedInput("proof is missing the disclosed bitmap".to_owned()))?;

        let mut disclosed_indexes = Vec::new();
        for (byte_index, byte) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << bit) == 0 {
                    continue;
                }
                let index = byte_index * 8 + bit;
                if index >= message_count {
                    return Err(Error::MalformedInput(format!(
                        "disclosed index {} out of a {} message set",
                        index, message_count
                    )));
                }
                disclosed_indexes.push(index);
            }
        }

        let U = message_count - disclosed_indexes.len();
        let body = &bytes[2 + bitmap_len..];
        let expected = 3 * Self::POINT_LENGTH + (5 + U) * Self::SCALAR_LENGTH;
        if body.len() != expected {
            return Err(Error::MalformedInput(format!(
                "proof body must be {} bytes, got {}",
                expected,
                body.len()
            )));
        }

        let (points, scalars) = body.split_at(3 * Self::POINT_LENGTH);
        let parse_point = |slice: &[u8]| -> Result<SigPoint<S>, Error> {
            <SigPoint<S> as PointEncoding>::from_compressed_bytes(slice)
                .ok_or_else(|| Error::DeserializationError("invalid proof point".to_owned()))
        };
        let P = Self::POINT_LENGTH;
        let A_prime = parse_point(&points[..P])?;
        let A_bar = parse_point(&points[P..2 * P])?;
        let D = parse_point(&points[2 * P..])?;

        let scalars: Vec<Scalar> = scalars
            .chunks_exact(Self::SCALAR_LENGTH)
            .map(|chunk| {
                Scalar::from_bytes_be(chunk)
                    .ok_or_else(|| Error::DeserializationError("non canonical proof scalar".to_owned()))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            message_count,
            disclosed_indexes,
            A_prime,
            A_bar,
            D,
            challenge: scalars[0],
            e_cap: scalars[1],
            r2_cap: scalars[2],
            r3_cap: scalars[3],
            s_cap: scalars[4],
            m_cap: scalars[5..].to_vec(),
        })
    }

    /// # Description
    /// Creates a proof of knowledge of `signature` over `messages`, disclosing only the
    /// messages at `disclosed_indexes` and bound to `nonce`.
    ///
    /// # Inputs:
    /// * `signature` (REQUIRED), a valid signature on `messages` under `pk`
    /// * `pk` (REQUIRED), the signer public key
    /// * `messages` (REQUIRED), every signed message, in signing order
    /// * `nonce` (REQUIRED), verifier chosen octet string, may be empty
    /// * `disclosed_indexes` (REQUIRED), distinct positions to disclose, in any order
    ///
    /// # Output:
    /// a new [`BBSplusPoKSignature`], or [`Error::SignatureMismatch`] if `signature` does not
    /// verify on `messages`
    pub fn proof_gen(
        signature: &BBSplusSignature<S>,
        pk: &BBSplusPublicKey<S::Field>,
        messages: &[Vec<u8>],
        nonce: &[u8],
        disclosed_indexes: &[usize],
    ) -> Result<Self, Error> {
        Self::proof_gen_with_rng(signature, pk, messages, nonce, disclosed_indexes, &mut rand::thread_rng())
    }

    pub fn proof_gen_with_rng<R: RngCore + CryptoRng>(
        signature: &BBSplusSignature<S>,
        pk: &BBSplusPublicKey<S::Field>,
        messages: &[Vec<u8>],
        nonce: &[u8],
        disclosed_indexes: &[usize],
        rng: &mut R,
    ) -> Result<Self, Error> {
        let L = messages.len();
        if L == 0 {
            return Err(Error::EmptyMessageSet);
        }
        if L > MAX_PROOF_MESSAGES {
            return Err(Error::MalformedInput(format!(
                "at most {} messages per proof, got {}",
                MAX_PROOF_MESSAGES, L
            )));
        }

        let disclosed_indexes = check_disclosed_indexes(L, disclosed_indexes)?;

        let message_scalars = BBSplusMessage::messages_to_scalar::<S>(messages)?;
        let generators = Generators::<S>::create(pk, L)?;

        if !core_verify::<S>(pk, signature, &message_scalars, &generators) {
            return Err(Error::SignatureMismatch);
        }

        core_proof_gen::<S, R>(
            pk,
            signature,
            &generators,
            &message_scalars,
            &disclosed_indexes,
            nonce,
            rng,
        )
    }

    /// # Description
    /// Verifies the proof against `pk`, the disclosed messages and the nonce it was bound to.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the signer public key
    /// * `disclosed_messages` (REQUIRED), the disclosed messages in ascending index order
    /// * `nonce` (REQUIRED), the nonce used at proof generation
    ///
    /// # Output:
    /// `Ok(true)` for a valid proof, `Ok(false)` otherwise (including a disclosed message count
    /// that does not match the proof)
    pub fn proof_verify(
        &self,
        pk: &BBSplusPublicKey<S::Field>,
        disclosed_messages: &[Vec<u8>],
        nonce: &[u8],
    ) -> Result<bool, Error> {
        if disclosed_messages.len() != self.disclosed_indexes.len() {
            log::debug!(
                "proof verification failed: {} disclosed messages for {} disclosed indexes",
                disclosed_messages.len(),
                self.disclosed_indexes.len()
            );
            return Ok(false);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<S>(disclosed_messages)?;
        let generators = Generators::<S>::create(pk, self.message_count)?;

        Ok(core_proof_verify::<S>(pk, self, &generators, &message_scalars, nonce))
    }
}

impl<S: Scheme> Serialize for BBSplusPoKSignature<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de, S: Scheme> Deserialize<'de> for BBSplusPoKSignature<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_hex(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

fn bitmap_length(message_count: usize) -> usize {
    message_count.div_ceil(8)
}

/// Sorted copy of `indexes`; out of range or repeated entries are [`Error::IndexOutOfRange`].
fn check_disclosed_indexes(L: usize, indexes: &[usize]) -> Result<Vec<usize>, Error> {
    let mut sorted = indexes.to_vec();
    sorted.sort_unstable();

    if let Some(&i) = sorted.iter().find(|&&i| i >= L) {
        return Err(Error::IndexOutOfRange(i));
    }
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(Error::IndexOutOfRange(w[0]));
    }
    Ok(sorted)
}

struct ProofInitResult<S: Scheme> {
    A_prime: SigPoint<S>,
    A_bar: SigPoint<S>,
    D: SigPoint<S>,
    T1: SigPoint<S>,
    T2: SigPoint<S>,
}

/// Blinded signature secrets, consumed by [`proof_finalize`]
struct ProofWitness {
    r2: Scalar,
    r3: Scalar,
    s_prime: Scalar,
}

fn core_proof_gen<S, R>(
    pk: &BBSplusPublicKey<S::Field>,
    signature: &BBSplusSignature<S>,
    generators: &Generators<S>,
    messages: &[BBSplusMessage],
    disclosed_indexes: &[usize],
    nonce: &[u8],
    rng: &mut R,
) -> Result<BBSplusPoKSignature<S>, Error>
where
    S: Scheme,
    R: RngCore + CryptoRng,
{
    let L = messages.len();
    let undisclosed_indexes = get_remaining_indexes(L, disclosed_indexes);

    let random_scalars = calculate_random_scalars(rng, 6 + undisclosed_indexes.len());

    let (init_res, witness) = proof_init::<S>(signature, generators, &random_scalars, messages, &undisclosed_indexes)?;

    let disclosed_messages = get_messages(messages, disclosed_indexes);
    let undisclosed_messages = get_messages(messages, &undisclosed_indexes);

    let challenge = proof_challenge_calculate::<S>(&init_res, pk, L, disclosed_indexes, &disclosed_messages, nonce)?;

    Ok(proof_finalize::<S>(
        init_res,
        witness,
        challenge,
        signature.e,
        &random_scalars,
        &undisclosed_messages,
        L,
        disclosed_indexes,
    ))
}

/// Randomizes the signature and commits to the blinding scalars.
///
/// `random_scalars` is `r1, r2, e~, r2~, r3~, s~, m~_1, ..., m~_U`.
fn proof_init<S: Scheme>(
    signature: &BBSplusSignature<S>,
    generators: &Generators<S>,
    random_scalars: &[Scalar],
    messages: &[BBSplusMessage],
    undisclosed_indexes: &[usize],
) -> Result<(ProofInitResult<S>, ProofWitness), Error> {
    let U = undisclosed_indexes.len();
    if random_scalars.len() != 6 + U {
        return Err(Error::ProofGenError("wrong number of random scalars".to_owned()));
    }

    let (r1, r2) = (random_scalars[0], random_scalars[1]);
    let (e_tilde, r2_tilde, r3_tilde, s_tilde) =
        (random_scalars[2], random_scalars[3], random_scalars[4], random_scalars[5]);
    let m_tilde = &random_scalars[6..];

    let B = compute_b::<S>(generators, signature.s, messages)?;
    let Q1 = generators.q1;

    let r3: Option<Scalar> = r1.invert().into();
    let r3 = r3.ok_or_else(|| Error::ProofGenError("r1 is zero".to_owned()))?;

    let A_prime = signature.a * r1;
    if bool::from(A_prime.is_identity()) {
        return Err(Error::ProofGenError("A' is the identity".to_owned()));
    }
    let A_bar = A_prime * (-signature.e) + B * r1;
    let D = B * r1 - Q1 * r2;
    let s_prime = signature.s - r2 * r3;

    let T1 = A_prime * e_tilde + Q1 * r2_tilde;
    let mut T2 = D * r3_tilde + Q1 * s_tilde;
    for (&j, m_t) in undisclosed_indexes.iter().zip(m_tilde) {
        T2 += generators.message_generators[j] * *m_t;
    }

    Ok((
        ProofInitResult {
            A_prime,
            A_bar,
            D,
            T1,
            T2,
        },
        ProofWitness { r2, r3, s_prime },
    ))
}

/// c = hash_to_scalar(A' || A_bar || D || T1 || T2 || PK || I2OSP(L, 8) || I2OSP(R, 8)
///     || (I2OSP(i, 8) || m_i)* || I2OSP(len(nonce), 8) || nonce)
fn proof_challenge_calculate<S: Scheme>(
    init_res: &ProofInitResult<S>,
    pk: &BBSplusPublicKey<S::Field>,
    L: usize,
    disclosed_indexes: &[usize],
    disclosed_messages: &[BBSplusMessage],
    nonce: &[u8],
) -> Result<Scalar, Error> {
    if disclosed_indexes.len() != disclosed_messages.len() {
        return Err(Error::ProofGenError("disclosed indexes and messages differ in length".to_owned()));
    }

    let mut c_arr: Vec<u8> = Vec::new();
    c_arr.extend_from_slice(&init_res.A_prime.to_compressed_bytes());
    c_arr.extend_from_slice(&init_res.A_bar.to_compressed_bytes());
    c_arr.extend_from_slice(&init_res.D.to_compressed_bytes());
    c_arr.extend_from_slice(&init_res.T1.to_compressed_bytes());
    c_arr.extend_from_slice(&init_res.T2.to_compressed_bytes());
    c_arr.extend_from_slice(&pk.to_bytes());
    c_arr.extend_from_slice(&i2osp(L, 8));
    c_arr.extend_from_slice(&i2osp(disclosed_indexes.len(), 8));
    for (&i, m) in disclosed_indexes.iter().zip(disclosed_messages) {
        c_arr.extend_from_slice(&i2osp(i, 8));
        c_arr.extend_from_slice(&m.value.to_bytes_be());
    }
    c_arr.extend_from_slice(&i2osp(nonce.len(), 8));
    c_arr.extend_from_slice(nonce);

    hash_to_scalar::<S::Ciphersuite>(&c_arr, &S::h2s_dst())
}

#[allow(clippy::too_many_arguments)]
fn proof_finalize<S: Scheme>(
    init_res: ProofInitResult<S>,
    witness: ProofWitness,
    challenge: Scalar,
    e: Scalar,
    random_scalars: &[Scalar],
    undisclosed_messages: &[BBSplusMessage],
    message_count: usize,
    disclosed_indexes: &[usize],
) -> BBSplusPoKSignature<S> {
    let e_cap = random_scalars[2] - challenge * e;
    let r2_cap = random_scalars[3] + challenge * witness.r2;
    let r3_cap = random_scalars[4] - challenge * witness.r3;
    let s_cap = random_scalars[5] + challenge * witness.s_prime;

    let m_cap: Vec<Scalar> = random_scalars[6..]
        .iter()
        .zip(undisclosed_messages)
        .map(|(m_tilde, m)| *m_tilde + challenge * m.value)
        .collect();

    BBSplusPoKSignature {
        message_count,
        disclosed_indexes: disclosed_indexes.to_vec(),
        A_prime: init_res.A_prime,
        A_bar: init_res.A_bar,
        D: init_res.D,
        challenge,
        e_cap,
        r2_cap,
        r3_cap,
        s_cap,
        m_cap,
    }
}

fn core_proof_verify<S: Scheme>(
    pk: &BBSplusPublicKey<S::Field>,
    proof: &BBSplusPoKSignature<S>,
    generators: &Generators<S>,
    disclosed_messages: &[BBSplusMessage],
    nonce: &[u8],
) -> bool {
    if bool::from(proof.A_prime.is_identity()) || bool::from(pk.0.is_identity()) {
        log::debug!("proof verification failed: identity element");
        return false;
    }

    let init_res = match proof_verify_init::<S>(proof, generators, disclosed_messages) {
        Ok(init_res) => init_res,
        Err(e) => {
            log::debug!("proof verification failed: {}", e);
            return false;
        }
    };

    let challenge = match proof_challenge_calculate::<S>(
        &init_res,
        pk,
        proof.message_count,
        &proof.disclosed_indexes,
        disclosed_messages,
        nonce,
    ) {
        Ok(c) => c,
        Err(e) => {
            log::debug!("proof verification failed: {}", e);
            return false;
        }
    };

    if challenge != proof.challenge {
        log::debug!("proof verification failed: challenge mismatch");
        return false;
    }

    // e(A', PK) * e(A_bar, -BP) == 1
    let BP = <PkPoint<S> as Group>::generator();
    let valid = <S::Field as BbsField>::pairing_product_is_identity(&[(proof.A_prime, pk.0), (proof.A_bar, -BP)]);
    if !valid {
        log::debug!("proof verification failed: pairing check");
    }
    valid
}

fn proof_verify_init<S: Scheme>(
    proof: &BBSplusPoKSignature<S>,
    generators: &Generators<S>,
    disclosed_messages: &[BBSplusMessage],
) -> Result<ProofInitResult<S>, Error> {
    let L = proof.message_count;
    if generators.message_generators.len() != L {
        return Err(Error::NotEnoughGenerators);
    }
    let undisclosed_indexes = get_remaining_indexes(L, &proof.disclosed_indexes);
    if undisclosed_indexes.len() != proof.m_cap.len() || proof.disclosed_indexes.len() != disclosed_messages.len() {
        return Err(Error::MalformedInput("proof does not match the message count".to_owned()));
    }

    let Q1 = generators.q1;
    let c = proof.challenge;

    let T1 = proof.A_prime * proof.e_cap + Q1 * proof.r2_cap - (proof.A_bar - proof.D) * c;

    let mut T2 = proof.D * proof.r3_cap + Q1 * proof.s_cap;
    for (&j, m_cap) in undisclosed_indexes.iter().zip(&proof.m_cap) {
        T2 += generators.message_generators[j] * *m_cap;
    }

    let mut disclosed_term = generators.base_point;
    for (&i, m) in proof.disclosed_indexes.iter().zip(disclosed_messages) {
        disclosed_term += generators.message_generators[i] * m.value;
    }
    T2 += disclosed_term * c;

    Ok(ProofInitResult {
        A_prime: proof.A_prime,
        A_bar: proof.A_bar,
        D: proof.D,
        T1,
        T2,
    })
}
