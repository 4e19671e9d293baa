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

use group::Group;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::ciphersuites::BbsCiphersuite;
use super::fields::PointEncoding;
use crate::bbsplus::keys::BBSplusPublicKey;
use crate::errors::Error;
use crate::schemes::algorithms::{Scheme, SigPoint};
use crate::utils::util::{expand_message, i2osp};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Generators<S: Scheme> {
    /// P1
    pub base_point: SigPoint<S>,
    pub q1: SigPoint<S>,
    pub message_generators: Vec<SigPoint<S>>,
}

impl<S: Scheme> Serialize for Generators<S> {
    fn serialize<Se>(&self, serializer: Se) -> Result<Se::Ok, Se::Error>
    where
        Se: Serializer,
    {
        let result: Vec<String> = self
            .message_generators
            .iter()
            .map(|item| hex::encode(item.to_compressed_bytes()))
            .collect();

        let mut state = serializer.serialize_struct("Generators", 3)?;
        state.serialize_field("P1", &hex::encode(self.base_point.to_compressed_bytes()))?;
        state.serialize_field("Q1", &hex::encode(self.q1.to_compressed_bytes()))?;
        state.serialize_field("MsgGenerators", &result)?;
        state.end()
    }
}

impl<S: Scheme> Generators<S> {
    /// # Description
    /// Derives the two auxiliary generators and `count` message generators bound to `pk`.
    /// The result depends only on `pk`, `count` and the ciphersuite ID.
    ///
    /// # Inputs:
    /// * `pk` (REQUIRED), the signer public key
    /// * `count` (REQUIRED), number of message generators, at least 1
    ///
    /// # Output:
    /// [`Generators`] or [`Error::EmptyMessageSet`] when `count` is 0
    pub fn create(pk: &BBSplusPublicKey<S::Field>, count: usize) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::EmptyMessageSet);
        }

        let aux = create_generators::<S>(&S::generator_seed(), 2)?;
        let message_generators = create_generators::<S>(&pk.to_bytes(), count)?;

        let [base_point, q1]: [SigPoint<S>; 2] = aux.try_into().map_err(|_| Error::NotEnoughGenerators)?;

        Ok(Self {
            base_point,
            q1,
            message_generators,
        })
    }
}

/// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-05#name-generators-calculation
///
/// # Description
/// Deterministically derives `count` distinct, non-identity points of the signature group from `seed`.
///
/// # Inputs:
/// * `seed` (REQUIRED), octet string the generators are bound to
/// * `count` (REQUIRED), number of generators to create
///
/// # Output:
/// a vector of `count` points
pub(crate) fn create_generators<S: Scheme>(seed: &[u8], count: usize) -> Result<Vec<SigPoint<S>>, Error> {
    let expand_len = <S::Ciphersuite as BbsCiphersuite>::EXPAND_LEN;
    let seed_dst = S::generator_seed_dst();
    let generator_dst = S::generator_dst();

    let mut v = vec![0u8; expand_len];
    expand_message::<S::Ciphersuite>(seed, &seed_dst, &mut v)?;

    let mut generators: Vec<SigPoint<S>> = Vec::with_capacity(count);
    let mut n = 1usize;
    while generators.len() < count {
        let buffer = [v.as_slice(), &i2osp(n, 8)].concat();
        expand_message::<S::Ciphersuite>(&buffer, &seed_dst, &mut v)?;
        n += 1;

        let candidate = <SigPoint<S> as PointEncoding>::hash_to_curve::<<S::Ciphersuite as BbsCiphersuite>::Expander>(
            &v,
            &generator_dst,
        );
        if bool::from(candidate.is_identity()) || generators.contains(&candidate) {
            continue;
        }
        generators.push(candidate);
    }

    log::trace!("derived {} generators in {} rounds", count, n - 1);
    Ok(generators)
}
