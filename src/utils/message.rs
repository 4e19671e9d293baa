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

use crate::{errors::Error, schemes::algorithms::Scheme, utils::util::hash_to_scalar};

/// Largest message, in bytes, accepted by sign, verify and proof operations.
pub const MAX_MESSAGE_LENGTH: usize = 1 << 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BBSplusMessage {
    pub value: Scalar,
}

impl BBSplusMessage {
    /// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-05#name-mapmessagetoscalarashash
    ///
    /// # Description
    /// Maps an octet string to a scalar. When `dst` is not supplied the
    /// scheme's `api_id || "MAP_MSG_TO_SCALAR_AS_HASH_"` is used.
    ///
    /// # Inputs:
    /// * `data` (REQUIRED), the message, at most [`MAX_MESSAGE_LENGTH`] bytes
    /// * `dst` (OPTIONAL), domain separation tag
    ///
    pub fn map_message_to_scalar_as_hash<S: Scheme>(data: &[u8], dst: Option<&[u8]>) -> Result<Self, Error> {
        if data.len() > MAX_MESSAGE_LENGTH {
            return Err(Error::SerializationError(format!(
                "message of {} bytes exceeds the maximum of {} bytes",
                data.len(),
                MAX_MESSAGE_LENGTH
            )));
        }

        let default_dst = S::map_msg_dst();
        let dst = dst.unwrap_or(default_dst.as_slice());

        let scalar = hash_to_scalar::<S::Ciphersuite>(data, dst)?;
        Ok(Self { value: scalar })
    }

    /// Maps every message with the scheme's default DST, preserving order.
    pub fn messages_to_scalar<S: Scheme>(messages: &[Vec<u8>]) -> Result<Vec<Self>, Error> {
        let dst = S::map_msg_dst();
        messages
            .iter()
            .map(|m| Self::map_message_to_scalar_as_hash::<S>(m, Some(dst.as_slice())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::algorithms::{BbsBls12381G1Sha256, BbsBls12381G2Sha256, BbsBls12381G2Shake256};

    #[test]
    fn mapping_is_deterministic_and_scheme_bound() {
        let m = b"Rachata".to_vec();
        let a = BBSplusMessage::map_message_to_scalar_as_hash::<BbsBls12381G2Sha256>(&m, None).unwrap();
        let b = BBSplusMessage::map_message_to_scalar_as_hash::<BbsBls12381G2Sha256>(&m, None).unwrap();
        let c = BBSplusMessage::map_message_to_scalar_as_hash::<BbsBls12381G1Sha256>(&m, None).unwrap();
        let d = BBSplusMessage::map_message_to_scalar_as_hash::<BbsBls12381G2Shake256>(&m, None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn empty_message_is_a_valid_message() {
        let scalars = BBSplusMessage::messages_to_scalar::<BbsBls12381G2Sha256>(&[vec![], b"x".to_vec()]).unwrap();
        assert_eq!(scalars.len(), 2);
        assert_ne!(scalars[0], scalars[1]);
    }

    #[test]
    fn oversized_message_is_rejected() {
        let messages = vec![b"ok".to_vec(), vec![0u8; MAX_MESSAGE_LENGTH + 1]];
        let result = BBSplusMessage::messages_to_scalar::<BbsBls12381G2Sha256>(&messages);
        assert!(matches!(result, Err(Error::SerializationError(_))));
    }
}
