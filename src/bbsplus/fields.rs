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

//! Field variants of the scheme.
//!
//! BBS+ can be instantiated with the public key in G2 (signature elements in G1)
//! or mirrored, with the public key in G1 (signature elements in G2). The choice
//! is fixed at compile time through [`BbsField`].

use bls12_381_plus::{multi_miller_loop, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar};
use core::fmt::Debug;
use elliptic_curve::hash2curve::ExpandMsg;
use group::{Curve, Group};

/// Encoding and hash-to-curve for one of the two source groups of BLS12-381.
pub trait PointEncoding: Group<Scalar = Scalar> {
    const COMPRESSED_BYTES: usize;
    const UNCOMPRESSED_BYTES: usize;

    fn to_compressed_bytes(&self) -> Vec<u8>;
    fn to_uncompressed_bytes(&self) -> Vec<u8>;

    /// `None` if the length is wrong or the bytes are not a point of the prime order subgroup.
    fn from_compressed_bytes(bytes: &[u8]) -> Option<Self>;
    fn from_uncompressed_bytes(bytes: &[u8]) -> Option<Self>;

    /// Hash to curve (SSWU, random oracle variant) with the expander `X`.
    fn hash_to_curve<X>(msg: &[u8], dst: &[u8]) -> Self
    where
        X: for<'a> ExpandMsg<'a>;
}

impl PointEncoding for G1Projective {
    const COMPRESSED_BYTES: usize = 48;
    const UNCOMPRESSED_BYTES: usize = 96;

    fn to_compressed_bytes(&self) -> Vec<u8> {
        self.to_affine().to_compressed().to_vec()
    }

    fn to_uncompressed_bytes(&self) -> Vec<u8> {
        self.to_affine().to_uncompressed().to_vec()
    }

    fn from_compressed_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 48] = bytes.try_into().ok()?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes)).map(G1Projective::from)
    }

    fn from_uncompressed_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 96] = bytes.try_into().ok()?;
        Option::<G1Affine>::from(G1Affine::from_uncompressed(&bytes)).map(G1Projective::from)
    }

    fn hash_to_curve<X>(msg: &[u8], dst: &[u8]) -> Self
    where
        X: for<'a> ExpandMsg<'a>,
    {
        G1Projective::hash::<X>(msg, dst)
    }
}

impl PointEncoding for G2Projective {
    const COMPRESSED_BYTES: usize = 96;
    const UNCOMPRESSED_BYTES: usize = 192;

    fn to_compressed_bytes(&self) -> Vec<u8> {
        self.to_affine().to_compressed().to_vec()
    }

    fn to_uncompressed_bytes(&self) -> Vec<u8> {
        self.to_affine().to_uncompressed().to_vec()
    }

    fn from_compressed_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 96] = bytes.try_into().ok()?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&bytes)).map(G2Projective::from)
    }

    fn from_uncompressed_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 192] = bytes.try_into().ok()?;
        Option::<G2Affine>::from(G2Affine::from_uncompressed(&bytes)).map(G2Projective::from)
    }

    fn hash_to_curve<X>(msg: &[u8], dst: &[u8]) -> Self
    where
        X: for<'a> ExpandMsg<'a>,
    {
        G2Projective::hash::<X>(msg, dst)
    }
}

/// Selects the group holding the public key and the group holding signature and proof points.
pub trait BbsField: 'static + Clone + Debug + PartialEq + Eq + Send + Sync {
    /// Curve and group of the signature points, used in the ciphersuite ID.
    const GROUP_ID: &'static [u8];
    type PkGroup: PointEncoding;
    type SigGroup: PointEncoding;

    /// Checks `prod e(sig_i, pk_i) == 1_GT`, placing the G1 element first whatever the variant.
    fn pairing_product_is_identity(terms: &[(Self::SigGroup, Self::PkGroup)]) -> bool;
}

/// Public key in G1, signature points in G2.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct G1Field;

/// Public key in G2, signature points in G1.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct G2Field;

impl BbsField for G1Field {
    const GROUP_ID: &'static [u8] = b"BLS12381G2";
    type PkGroup = G1Projective;
    type SigGroup = G2Projective;

    fn pairing_product_is_identity(terms: &[(G2Projective, G1Projective)]) -> bool {
        let terms: Vec<(G1Projective, G2Projective)> = terms.iter().map(|&(sig, pk)| (pk, sig)).collect();
        pairing_check(&terms)
    }
}

impl BbsField for G2Field {
    const GROUP_ID: &'static [u8] = b"BLS12381G1";
    type PkGroup = G2Projective;
    type SigGroup = G1Projective;

    fn pairing_product_is_identity(terms: &[(G1Projective, G2Projective)]) -> bool {
        pairing_check(terms)
    }
}

fn pairing_check(terms: &[(G1Projective, G2Projective)]) -> bool {
    let prepared: Vec<(G1Affine, G2Prepared)> = terms
        .iter()
        .map(|(p, q)| (p.to_affine(), G2Prepared::from(q.to_affine())))
        .collect();
    let refs: Vec<(&G1Affine, &G2Prepared)> = prepared.iter().map(|(p, q)| (p, q)).collect();

    multi_miller_loop(&refs).final_exponentiation() == Gt::IDENTITY
}
