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

#![allow(non_snake_case)]

#[cfg(test)]
mod bbsplus_tests {

    use std::fs;

    use bbsplus_sd::{
        bbsplus::{keys::BBSplusPublicKey, proof::BBSplusPoKSignature, signature::BBSplusSignature},
        bls12381::{
            bls_create_proof, bls_sign, bls_verify, bls_verify_proof, generate_blinded_bls12381_g1_key_pair,
            generate_blinded_bls12381_g2_key_pair, generate_bls12381_g1_key_pair, generate_bls12381_g2_key_pair,
            Bls12381KeyPair, BLS12381_BLINDING_FACTOR_LENGTH, DEFAULT_BLS12381_PRIVATE_KEY_LENGTH,
        },
        errors::Error,
        keys::pair::KeyPair,
        schemes::algorithms::{
            BbsBls12381G1Sha256, BbsBls12381G1Shake256, BbsBls12381G2Sha256, BbsBls12381G2Shake256, Scheme,
        },
        utils::util::get_messages_vec,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn attributes() -> Vec<Vec<u8>> {
        vec![
            b"Rachata".to_vec(),
            b"Tosirisuk".to_vec(),
            b"29".to_vec(),
            b"Attribute 4".to_vec(),
        ]
    }

    //KEYPAIR - G1

    #[test]
    fn keypair_g1() {
        key_pair_gen("./fixture_data/bls12-381-g1/keyPair.json", generate_bls12381_g1_key_pair);
    }

    #[test]
    fn blinded_keypair_g1() {
        blinded_key_pair_gen::<BbsBls12381G1Sha256>("./fixture_data/bls12-381-g1/keyPair.json");
    }

    //KEYPAIR - G2

    #[test]
    fn keypair_g2() {
        key_pair_gen("./fixture_data/bls12-381-g2/keyPair.json", generate_bls12381_g2_key_pair);
    }

    #[test]
    fn blinded_keypair_g2() {
        blinded_key_pair_gen::<BbsBls12381G2Sha256>("./fixture_data/bls12-381-g2/keyPair.json");
    }

    #[test]
    fn unseeded_key_pairs_are_random() {
        init();
        let generators: [fn(Option<&[u8]>) -> Result<Bls12381KeyPair, Error>; 2] =
            [generate_bls12381_g1_key_pair, generate_bls12381_g2_key_pair];
        for generate in generators {
            let kp1 = generate(None).unwrap();
            let kp2 = generate(None).unwrap();
            assert_ne!(kp1.secret_key, kp2.secret_key);
            assert_ne!(kp1.public_key, kp2.public_key);
        }

        let b1 = generate_blinded_bls12381_g1_key_pair(None).unwrap();
        let b2 = generate_blinded_bls12381_g1_key_pair(None).unwrap();
        assert_ne!(b1.blinding_factor, b2.blinding_factor);
        assert_eq!(b1.blinding_factor.len(), BLS12381_BLINDING_FACTOR_LENGTH);

        let b3 = generate_blinded_bls12381_g2_key_pair(None).unwrap();
        let b4 = generate_blinded_bls12381_g2_key_pair(None).unwrap();
        assert_ne!(b3.secret_key, b4.secret_key);
        assert_ne!(b3.blinding_factor, b4.blinding_factor);
        assert_eq!(b3.public_key.len(), 96);
    }

    #[test]
    fn short_seed_is_invalid() {
        init();
        assert!(matches!(generate_bls12381_g2_key_pair(Some(&[7u8; 16])), Err(Error::InvalidSeed(_))));
        assert!(matches!(generate_blinded_bls12381_g1_key_pair(Some(&[])), Err(Error::InvalidSeed(_))));
    }

    //SIGN / PROOF - END TO END

    #[test]
    fn selective_disclosure_g2_sha256() {
        selective_disclosure::<BbsBls12381G2Sha256>();
    }

    #[test]
    fn selective_disclosure_g2_shake256() {
        selective_disclosure::<BbsBls12381G2Shake256>();
    }

    #[test]
    fn selective_disclosure_g1_sha256() {
        selective_disclosure::<BbsBls12381G1Sha256>();
    }

    #[test]
    fn selective_disclosure_g1_shake256() {
        selective_disclosure::<BbsBls12381G1Shake256>();
    }

    #[test]
    fn every_disclosed_subset_verifies() {
        init();
        let kp = KeyPair::<BbsBls12381G2Sha256>::generate(None).unwrap();
        let messages = attributes();
        let signature =
            BBSplusSignature::<BbsBls12381G2Sha256>::sign(kp.private_key(), kp.public_key(), &messages).unwrap();
        let nonce = b"subset nonce";
        let mut rng = ChaCha20Rng::from_seed([42u8; 32]);

        for mask in 0u32..(1 << messages.len()) {
            let disclosed: Vec<usize> = (0..messages.len()).filter(|i| mask & (1 << i) != 0).collect();
            let proof =
                BBSplusPoKSignature::proof_gen_with_rng(&signature, kp.public_key(), &messages, nonce, &disclosed, &mut rng)
                    .unwrap();
            let disclosed_messages = get_messages_vec(&messages, &disclosed);

            let result = proof.proof_verify(kp.public_key(), &disclosed_messages, nonce).unwrap();
            assert!(result, "disclosed subset {:?} failed", disclosed);
        }
    }

    #[test]
    fn proof_bytes_tampering_is_rejected() {
        init();
        let kp = generate_bls12381_g2_key_pair(None).unwrap();
        let messages = attributes();
        let nonce = b"nonce";
        let signature = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &kp.public_key, &messages).unwrap();
        let proof = bls_create_proof::<BbsBls12381G2Sha256>(&signature, &kp.public_key, &messages, nonce, &[0, 1]).unwrap();

        // flip one bit in each scalar response (header 2 + bitmap 1 + 3 points of 48)
        let responses_start = 2 + 1 + 3 * 48;
        for offset in (responses_start..proof.len()).step_by(32) {
            let mut tampered = proof.clone();
            tampered[offset + 31] ^= 0x01;
            let result = bls_verify_proof::<BbsBls12381G2Sha256>(&tampered, &kp.public_key, &messages[..2], nonce);
            assert_eq!(result, Ok(false), "tampered response at {} accepted", offset);
        }

        // disclosing a different position changes the challenge input
        let mut moved = proof.clone();
        moved[2] = 0b0000_0101;
        let result = bls_verify_proof::<BbsBls12381G2Sha256>(&moved, &kp.public_key, &messages[..2], nonce);
        assert_eq!(result, Ok(false));
    }

    #[test]
    fn signature_bit_flips_are_rejected() {
        init();
        let kp = generate_bls12381_g2_key_pair(None).unwrap();
        let messages = attributes();
        let signature = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &kp.public_key, &messages).unwrap();
        assert_eq!(signature.len(), 112);

        // A (48) || e (32) || s (32)
        for offset in 0..signature.len() {
            for bit in [0u8, 7u8] {
                let mut tampered = signature.clone();
                tampered[offset] ^= 1 << bit;
                let result = bls_verify::<BbsBls12381G2Sha256>(&kp.public_key, &messages, &tampered);
                assert_eq!(result, Ok(false), "bit {} of byte {} accepted", bit, offset);
            }
        }
    }

    #[test]
    fn proof_point_bit_flips_are_rejected() {
        init();
        let kp = generate_bls12381_g2_key_pair(None).unwrap();
        let messages = attributes();
        let nonce = b"nonce";
        let signature = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &kp.public_key, &messages).unwrap();
        let proof = bls_create_proof::<BbsBls12381G2Sha256>(&signature, &kp.public_key, &messages, nonce, &[0, 1]).unwrap();

        // A' || A_bar || D after the 2 byte count and 1 byte bitmap
        let points = 3..3 + 3 * 48;
        for offset in points {
            for bit in [0u8, 7u8] {
                let mut tampered = proof.clone();
                tampered[offset] ^= 1 << bit;
                let result = bls_verify_proof::<BbsBls12381G2Sha256>(&tampered, &kp.public_key, &messages[..2], nonce);
                assert_eq!(result, Ok(false), "bit {} of byte {} accepted", bit, offset);
            }
        }
    }

    #[test]
    fn undecodable_public_key_is_malformed() {
        init();
        let kp = generate_bls12381_g2_key_pair(None).unwrap();
        let messages = attributes();
        let signature = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &kp.public_key, &messages).unwrap();

        // compression flag cleared on a compressed length key
        let mut bad_key = kp.public_key.clone();
        bad_key[0] &= 0x7f;
        let result = bls_verify::<BbsBls12381G2Sha256>(&bad_key, &messages, &signature);
        assert!(matches!(result, Err(Error::MalformedInput(_))));

        let result = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &bad_key, &messages);
        assert!(matches!(result, Err(Error::MalformedInput(_))));

        let proof = bls_create_proof::<BbsBls12381G2Sha256>(&signature, &kp.public_key, &messages, b"", &[0]).unwrap();
        let result = bls_verify_proof::<BbsBls12381G2Sha256>(&proof, &bad_key, &messages[..1], b"");
        assert!(matches!(result, Err(Error::MalformedInput(_))));

        let zero_secret = bls_sign::<BbsBls12381G2Sha256>(&[0u8; 32], &kp.public_key, &messages);
        assert!(matches!(zero_secret, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn signature_byte_lengths() {
        init();
        let messages = attributes();

        let g2 = generate_bls12381_g2_key_pair(None).unwrap();
        let signature = bls_sign::<BbsBls12381G2Sha256>(&g2.secret_key, &g2.public_key, &messages).unwrap();
        assert_eq!(signature.len(), 112);

        let g1 = generate_bls12381_g1_key_pair(None).unwrap();
        let signature = bls_sign::<BbsBls12381G1Sha256>(&g1.secret_key, &g1.public_key, &messages).unwrap();
        assert_eq!(signature.len(), 160);
        assert!(bls_verify::<BbsBls12381G1Sha256>(&g1.public_key, &messages, &signature).unwrap());

        // a G1 key is not a valid G2 key
        let wrong_field = bls_verify::<BbsBls12381G2Sha256>(&g1.public_key, &messages, &signature);
        assert!(matches!(wrong_field, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn empty_message_set_is_rejected() {
        init();
        let kp = generate_bls12381_g2_key_pair(None).unwrap();
        let result = bls_sign::<BbsBls12381G2Sha256>(&kp.secret_key, &kp.public_key, &[]);
        assert_eq!(result, Err(Error::EmptyMessageSet));
    }

    pub(crate) fn key_pair_gen(filename: &str, generate: fn(Option<&[u8]>) -> Result<Bls12381KeyPair, Error>) {
        init();
        eprintln!("Key Pair");
        let data = fs::read_to_string(filename).expect("Unable to read file");
        let data_json: serde_json::Value = serde_json::from_str(&data).expect("Unable to parse");
        eprintln!("{}", data_json["caseName"]);

        let IKM = data_json["keyMaterial"].as_str().unwrap();
        let SK_expected = data_json["keyPair"]["secretKey"].as_str().unwrap();
        let PK_expected = data_json["keyPair"]["publicKey"].as_str().unwrap();

        let keypair = generate(Some(&hex::decode(IKM).unwrap())).unwrap();
        assert_eq!(keypair.secret_key.len(), DEFAULT_BLS12381_PRIVATE_KEY_LENGTH);

        let sk = hex::encode(&keypair.secret_key);
        let pk = hex::encode(&keypair.public_key);

        if sk != SK_expected {
            eprintln!("      Expected key:  {}", SK_expected);
            eprintln!("      Generated key: {}", sk);
        }
        if pk != PK_expected {
            eprintln!("      Expected key:  {}", PK_expected);
            eprintln!("      Generated key: {}", pk);
        }
        assert!(sk == SK_expected && pk == PK_expected, "Failed");

        let again = generate(Some(&hex::decode(IKM).unwrap())).unwrap();
        assert_eq!(again, keypair);
    }

    pub(crate) fn blinded_key_pair_gen<S: Scheme>(filename: &str) {
        init();
        let data = fs::read_to_string(filename).expect("Unable to read file");
        let data_json: serde_json::Value = serde_json::from_str(&data).expect("Unable to parse");

        let IKM = hex::decode(data_json["keyMaterial"].as_str().unwrap()).unwrap();
        let SK_expected = data_json["keyPair"]["secretKey"].as_str().unwrap();
        let PK_expected = data_json["keyPair"]["publicKey"].as_str().unwrap();

        let blinded = KeyPair::<S>::generate_blinded(Some(&IKM)).unwrap();
        assert_eq!(blinded.private_key().encode(), SK_expected);
        assert_eq!(blinded.public_key().encode(), PK_expected);
        assert_eq!(blinded.blinding_factor().to_bytes().len(), BLS12381_BLINDING_FACTOR_LENGTH);

        let again = KeyPair::<S>::generate_blinded(Some(&IKM)).unwrap();
        assert_eq!(again.blinding_factor(), blinded.blinding_factor());

        let pk = BBSplusPublicKey::<S::Field>::from_bytes(&hex::decode(PK_expected).unwrap()).unwrap();
        assert_eq!(&pk, blinded.public_key());
    }

    pub(crate) fn selective_disclosure<S: Scheme>() {
        init();
        let kp = KeyPair::<S>::generate(None).unwrap();
        let pk_bytes = kp.public_key().to_bytes();
        let sk_bytes = kp.private_key().to_bytes();
        let messages = attributes();

        let signature = bls_sign::<S>(&sk_bytes, &pk_bytes, &messages).unwrap();
        assert!(bls_verify::<S>(&pk_bytes, &messages, &signature).unwrap());

        let mut tampered = messages.clone();
        tampered[2] = b"30".to_vec();
        assert!(!bls_verify::<S>(&pk_bytes, &tampered, &signature).unwrap());

        let nonce = b"nonce";
        let proof = bls_create_proof::<S>(&signature, &pk_bytes, &messages, nonce, &[0, 1]).unwrap();

        assert!(bls_verify_proof::<S>(&proof, &pk_bytes, &messages[..2], nonce).unwrap());
        assert!(!bls_verify_proof::<S>(&proof, &pk_bytes, &messages[..2], b"wrong").unwrap());
        assert!(!bls_verify_proof::<S>(&proof, &pk_bytes, &[messages[0].clone(), b"Tosi".to_vec()], nonce).unwrap());
        assert!(!bls_verify_proof::<S>(&proof, &pk_bytes, &messages[..1], nonce).unwrap());

        let other = KeyPair::<S>::generate(None).unwrap();
        assert!(!bls_verify_proof::<S>(&proof, &other.public_key().to_bytes(), &messages[..2], nonce).unwrap());

        let second = bls_create_proof::<S>(&signature, &pk_bytes, &messages, nonce, &[0, 1]).unwrap();
        assert_ne!(proof, second);
        assert_eq!(proof.len(), second.len());

        let forged = bls_create_proof::<S>(&signature, &pk_bytes, &tampered, nonce, &[0, 1]);
        assert_eq!(forged, Err(Error::SignatureMismatch));

        let out_of_range = bls_create_proof::<S>(&signature, &pk_bytes, &messages, nonce, &[4]);
        assert_eq!(out_of_range, Err(Error::IndexOutOfRange(4)));
    }
}
