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

use core::fmt::Debug;
use core::marker::PhantomData;

use crate::bbsplus::{
    ciphersuites::{BbsCiphersuite, Bls12381Sha256, Bls12381Shake256},
    fields::{BbsField, G1Field, G2Field},
};

/// A BBS+ instantiation: a field variant together with a ciphersuite.
///
/// Every domain separation tag is derived from [`Scheme::api_id`], so two
/// schemes never share generators or challenges.
pub trait Scheme: 'static + Sized + Clone + Debug + PartialEq + Eq + Send + Sync {
    type Field: BbsField;
    type Ciphersuite: BbsCiphersuite;

    /// `BBS_BLS12381G{1,2}_{XMD:SHA-256,XOF:SHAKE-256}_SSWU_RO_`
    fn api_id() -> Vec<u8> {
        [
            &b"BBS_"[..],
            <Self::Field as BbsField>::GROUP_ID,
            &b"_"[..],
            <Self::Ciphersuite as BbsCiphersuite>::HASH_ID,
        ]
        .concat()
    }

    fn map_msg_dst() -> Vec<u8> {
        [Self::api_id().as_slice(), b"MAP_MSG_TO_SCALAR_AS_HASH_"].concat()
    }

    fn h2s_dst() -> Vec<u8> {
        [Self::api_id().as_slice(), b"H2S_"].concat()
    }

    fn generator_seed() -> Vec<u8> {
        [Self::api_id().as_slice(), b"MESSAGE_GENERATOR_SEED"].concat()
    }

    fn generator_seed_dst() -> Vec<u8> {
        [Self::api_id().as_slice(), b"SIG_GENERATOR_SEED_"].concat()
    }

    fn generator_dst() -> Vec<u8> {
        [Self::api_id().as_slice(), b"SIG_GENERATOR_DST_"].concat()
    }
}

/// Group of the signature and proof points of `S`
pub type SigPoint<S> = <<S as Scheme>::Field as BbsField>::SigGroup;
/// Group of the public key of `S`
pub type PkPoint<S> = <<S as Scheme>::Field as BbsField>::PkGroup;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BBSplus<F: BbsField, CS: BbsCiphersuite> {
    _field: PhantomData<F>,
    _ciphersuite: PhantomData<CS>,
}

impl<F: BbsField, CS: BbsCiphersuite> Scheme for BBSplus<F, CS> {
    type Field = F;
    type Ciphersuite = CS;
}

/// Public key in G1, SHA-256 ciphersuite
pub type BbsBls12381G1Sha256 = BBSplus<G1Field, Bls12381Sha256>;
/// Public key in G1, SHAKE-256 ciphersuite
pub type BbsBls12381G1Shake256 = BBSplus<G1Field, Bls12381Shake256>;
/// Public key in G2, SHA-256 ciphersuite
pub type BbsBls12381G2Sha256 = BBSplus<G2Field, Bls12381Sha256>;
/// Public key in G2, SHAKE-256 ciphersuite
pub type BbsBls12381G2Shake256 = BBSplus<G2Field, Bls12381Shake256>;
