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
use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serializer};

use crate::{bbsplus::ciphersuites::BbsCiphersuite, errors::Error, utils::message::BBSplusMessage};

/// I2OSP(x, len): big-endian encoding of `x` on `len` bytes (len <= 8)
pub fn i2osp(x: usize, len: usize) -> Vec<u8> {
    let bytes = (x as u64).to_be_bytes();
    bytes[8 - len.min(8)..].to_vec()
}

pub(crate) fn expand_message<CS: BbsCiphersuite>(msg: &[u8], dst: &[u8], out: &mut [u8]) -> Result<(), Error> {
    CS::Expander::expand_message(&[msg], &[dst], out.len())
        .map_err(|_| Error::HashToScalarError)?
        .fill_bytes(out);
    Ok(())
}

/// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-05#name-hash-to-scalar
///
/// # Description
/// Hashes an arbitrary octet string to a scalar, using `expand_message` with the
/// ciphersuite expander and reducing 48 uniform bytes modulo r.
///
/// # Inputs:
/// * `msg_octets` (REQUIRED), the octet string to hash
/// * `dst` (REQUIRED), domain separation tag, at most 255 bytes
///
pub fn hash_to_scalar<CS: BbsCiphersuite>(msg_octets: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
    if dst.len() > 255 {
        return Err(Error::HashToScalarError);
    }

    let mut uniform_bytes = [0u8; 48];
    expand_message::<CS>(msg_octets, dst, &mut uniform_bytes)?;

    Ok(Scalar::from_okm(&uniform_bytes))
}

/// Draws `count` fresh scalars from `rng`. Every call must use its own draw.
pub fn calculate_random_scalars<R: RngCore + CryptoRng>(rng: &mut R, count: usize) -> Vec<Scalar> {
    (0..count)
        .map(|_| {
            let mut buf = [0u8; 48];
            rng.fill_bytes(&mut buf);
            Scalar::from_okm(&buf)
        })
        .collect()
}

pub fn get_remaining_indexes(length: usize, indexes: &[usize]) -> Vec<usize> {
    (0..length).filter(|i| !indexes.contains(i)).collect()
}

pub fn get_messages(messages: &[BBSplusMessage], indexes: &[usize]) -> Vec<BBSplusMessage> {
    indexes.iter().map(|&i| messages[i]).collect()
}

pub fn get_messages_vec(messages: &[Vec<u8>], indexes: &[usize]) -> Vec<Vec<u8>> {
    indexes.iter().filter_map(|&i| messages.get(i).cloned()).collect()
}

pub trait ScalarExt: Sized {
    fn to_bytes_be(&self) -> [u8; 32];
    fn from_bytes_be(bytes: &[u8]) -> Option<Self>;
}

impl ScalarExt for Scalar {
    fn to_bytes_be(&self) -> [u8; 32] {
        self.to_be_bytes()
    }

    /// `None` for a wrong length or a non canonical encoding (value >= r)
    fn from_bytes_be(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 32] = bytes.try_into().ok()?;
        Option::from(Scalar::from_be_bytes(&bytes))
    }
}

pub(crate) fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

pub(crate) fn deserialize_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    hex::decode(s).map_err(serde::de::Error::custom)
}
