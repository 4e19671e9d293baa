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
use ff::Field;
use group::Group;
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;

use super::fields::{BbsField, PointEncoding};
use crate::{
    errors::Error,
    keys::pair::{BlindedKeyPair, KeyPair},
    schemes::algorithms::Scheme,
    utils::util::{deserialize_hex, i2osp, serialize_hex, ScalarExt},
};

/// Minimum length of the key material (seed), in bytes
pub const IKM_LEN: usize = 32;

const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";
const BLINDING_FACTOR_SALT: &[u8] = b"BLS-SIG-BLINDING-FACTOR-SALT-";
/// Length of the HKDF output reduced modulo r
const OKM_LEN: usize = 48;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusPublicKey<F: BbsField>(pub(crate) F::PkGroup);

impl<F: BbsField> BBSplusPublicKey<F> {
    /// Length of the default (compressed) encoding
    pub const LENGTH: usize = <F::PkGroup as PointEncoding>::COMPRESSED_BYTES;
    pub const UNCOMPRESSED_LENGTH: usize = <F::PkGroup as PointEncoding>::UNCOMPRESSED_BYTES;

    /// Compressed point encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }

    pub fn to_bytes_uncompressed(&self) -> Vec<u8> {
        self.0.to_uncompressed_bytes()
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Accepts both the compressed and the uncompressed encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let point = if bytes.len() == Self::LENGTH {
            F::PkGroup::from_compressed_bytes(bytes)
        } else if bytes.len() == Self::UNCOMPRESSED_LENGTH {
            F::PkGroup::from_uncompressed_bytes(bytes)
        } else {
            return Err(Error::MalformedInput(format!(
                "public key must be {} or {} bytes, got {}",
                Self::LENGTH,
                Self::UNCOMPRESSED_LENGTH,
                bytes.len()
            )));
        };

        let point = point.ok_or_else(|| Error::DeserializationError("invalid public key point".to_owned()))?;
        if bool::from(point.is_identity()) {
            return Err(Error::DeserializationError("public key is the identity".to_owned()));
        }
        Ok(Self(point))
    }
}

impl<F: BbsField> Serialize for BBSplusPublicKey<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de, F: BbsField> Deserialize<'de> for BBSplusPublicKey<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_hex(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusSecretKey(pub(crate) Scalar);

impl BBSplusSecretKey {
    pub const LENGTH: usize = 32;

    //in BE order
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::LENGTH {
            return Err(Error::MalformedInput(format!(
                "secret key must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }
        let s = Scalar::from_bytes_be(bytes)
            .ok_or_else(|| Error::DeserializationError("secret key is not a canonical scalar".to_owned()))?;
        if bool::from(s.is_zero()) {
            return Err(Error::DeserializationError("secret key is zero".to_owned()));
        }
        Ok(Self(s))
    }

    /// PK = SK * BP, with BP the generator of the public key group of `F`.
    pub fn public_key<F: BbsField>(&self) -> BBSplusPublicKey<F> {
        BBSplusPublicKey(sk_to_pk::<F>(self.0))
    }
}

impl Serialize for BBSplusSecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for BBSplusSecretKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_hex(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Auxiliary secret returned next to a key pair for the caller's blind issuance protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlindingFactor(pub(crate) Scalar);

impl BlindingFactor {
    pub const LENGTH: usize = 32;

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::LENGTH {
            return Err(Error::MalformedInput(format!(
                "blinding factor must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }
        Scalar::from_bytes_be(bytes)
            .map(Self)
            .ok_or_else(|| Error::DeserializationError("blinding factor is not a canonical scalar".to_owned()))
    }
}

impl Serialize for BlindingFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_hex(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for BlindingFactor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_hex(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl<S: Scheme> KeyPair<S> {
    /// Generates a key pair. With a seed of at least [`IKM_LEN`] bytes the result is
    /// deterministic; without one, fresh key material is drawn from the thread RNG.
    pub fn generate(seed: Option<&[u8]>) -> Result<Self, Error> {
        Self::generate_with_rng(seed, &mut rand::thread_rng())
    }

    pub fn generate_with_rng<R: RngCore + CryptoRng>(seed: Option<&[u8]>, rng: &mut R) -> Result<Self, Error> {
        let sk = match seed {
            Some(seed) => key_gen(seed)?,
            None => {
                let mut key_material = [0u8; IKM_LEN];
                rng.fill_bytes(&mut key_material);
                key_gen(&key_material)?
            }
        };

        let pk = sk_to_pk::<S::Field>(sk);
        log::debug!("generated key pair, public key {}", hex::encode(pk.to_compressed_bytes()));

        Ok(Self {
            public: BBSplusPublicKey(pk),
            private: BBSplusSecretKey(sk),
        })
    }

    /// Same key pair as [`KeyPair::generate`] plus an independent blinding factor.
    /// The public key does not depend on the blinding factor.
    pub fn generate_blinded(seed: Option<&[u8]>) -> Result<BlindedKeyPair<S>, Error> {
        Self::generate_blinded_with_rng(seed, &mut rand::thread_rng())
    }

    pub fn generate_blinded_with_rng<R: RngCore + CryptoRng>(
        seed: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<BlindedKeyPair<S>, Error> {
        let key_pair = Self::generate_with_rng(seed, rng)?;

        let blinding_factor = match seed {
            Some(seed) => derive_scalar(seed, BLINDING_FACTOR_SALT)?,
            None => {
                let mut material = [0u8; IKM_LEN];
                rng.fill_bytes(&mut material);
                derive_scalar(&material, BLINDING_FACTOR_SALT)?
            }
        };

        Ok(BlindedKeyPair {
            key_pair,
            blinding_factor: BlindingFactor(blinding_factor),
        })
    }
}

/// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-02#section-2.3 -> SK = KeyGen(IKM)
///
/// # Description
/// Derives a secret key deterministically from the key material, independently of the
/// ciphersuite and of the field variant:
/// `SK = OS2IP(HKDF-Expand(HKDF-Extract(salt, IKM || I2OSP(0, 1)), I2OSP(L, 2), L)) mod r`, with L = 48.
///
/// # Inputs:
/// * `key_material` (REQUIRED), a secret octet string of at least 32 bytes
///
pub(crate) fn key_gen(key_material: &[u8]) -> Result<Scalar, Error> {
    derive_scalar(key_material, KEYGEN_SALT)
}

fn derive_scalar(key_material: &[u8], salt: &[u8]) -> Result<Scalar, Error> {
    if key_material.len() < IKM_LEN {
        return Err(Error::InvalidSeed(format!(
            "length(key_material) < {}, got {}",
            IKM_LEN,
            key_material.len()
        )));
    }

    let ikm = [key_material, &[0u8]].concat();
    let mut okm = [0u8; OKM_LEN];
    Hkdf::<Sha256>::new(Some(salt), &ikm)
        .expand(&i2osp(OKM_LEN, 2), &mut okm)
        .map_err(|_| Error::InvalidSeed("HKDF expansion failed".to_owned()))?;

    let sk = Scalar::from_okm(&okm);
    if bool::from(sk.is_zero()) {
        return Err(Error::InvalidSeed("derived scalar is zero".to_owned()));
    }
    Ok(sk)
}

/// PK = SK * BP
pub(crate) fn sk_to_pk<F: BbsField>(sk: Scalar) -> F::PkGroup {
    F::PkGroup::generator() * sk
}
