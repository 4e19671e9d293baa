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

use crate::bbsplus::keys::{BBSplusPublicKey, BBSplusSecretKey, BlindingFactor};
use crate::schemes::algorithms::Scheme;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct KeyPair<S: Scheme> {
    pub(crate) public: BBSplusPublicKey<S::Field>,
    pub(crate) private: BBSplusSecretKey,
}

impl<S> KeyPair<S>
where
    S: Scheme,
{
    pub fn public_key(&self) -> &BBSplusPublicKey<S::Field> {
        &self.public
    }

    pub fn private_key(&self) -> &BBSplusSecretKey {
        &self.private
    }

    /// Returns the couple `(sk, pk)`.
    pub fn into_parts(self) -> (BBSplusSecretKey, BBSplusPublicKey<S::Field>) {
        (self.private, self.public)
    }
}

/// A key pair together with the blinding factor for an external blind issuance protocol.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct BlindedKeyPair<S: Scheme> {
    pub(crate) key_pair: KeyPair<S>,
    pub(crate) blinding_factor: BlindingFactor,
}

impl<S> BlindedKeyPair<S>
where
    S: Scheme,
{
    pub fn key_pair(&self) -> &KeyPair<S> {
        &self.key_pair
    }

    pub fn public_key(&self) -> &BBSplusPublicKey<S::Field> {
        self.key_pair.public_key()
    }

    pub fn private_key(&self) -> &BBSplusSecretKey {
        self.key_pair.private_key()
    }

    pub fn blinding_factor(&self) -> &BlindingFactor {
        &self.blinding_factor
    }

    /// Returns `(key_pair, blinding_factor)`.
    pub fn into_parts(self) -> (KeyPair<S>, BlindingFactor) {
        (self.key_pair, self.blinding_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::algorithms::BbsBls12381G1Shake256;

    #[test]
    fn key_pair_json_uses_hex_strings() {
        let kp = KeyPair::<BbsBls12381G1Shake256>::generate_blinded(Some(&[5u8; 32])).unwrap();
        let json = serde_json::to_value(&kp).unwrap();

        assert_eq!(json["key_pair"]["private"], serde_json::json!(kp.private_key().encode()));
        assert_eq!(json["key_pair"]["public"], serde_json::json!(kp.public_key().encode()));
        assert_eq!(json["blinding_factor"], serde_json::json!(kp.blinding_factor().encode()));

        let back: BlindedKeyPair<BbsBls12381G1Shake256> = serde_json::from_value(json).unwrap();
        assert_eq!(back, kp);
    }
}
