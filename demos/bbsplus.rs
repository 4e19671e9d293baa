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

mod bbsplus_example {
    use rand::RngCore;
    use bbsplus_sd::{
        bbsplus::{proof::BBSplusPoKSignature, signature::BBSplusSignature},
        errors::Error,
        keys::pair::KeyPair,
        schemes::algorithms::Scheme,
        utils::util::get_messages_vec,
    };

    pub(crate) fn bbsplus_main<S: Scheme>() -> Result<(), Error> {
        const ATTRIBUTES: [&str; 4] = ["Rachata", "Tosirisuk", "29", "Attribute 4"];

        log::info!("Messages: {:?}", ATTRIBUTES);

        //Issuer
        log::info!("Keypair Generation");
        let issuer_keypair = KeyPair::<S>::generate(None)?;

        let issuer_sk = issuer_keypair.private_key();
        let issuer_pk = issuer_keypair.public_key();
        log::info!("PK: {}", issuer_pk.encode());

        let messages: Vec<Vec<u8>> = ATTRIBUTES.iter().map(|m| m.as_bytes().to_vec()).collect();
        log::info!("Signature Computation...");
        let signature = BBSplusSignature::<S>::sign(issuer_sk, issuer_pk, &messages)?;
        log::info!("Signature: {}", hex::encode(signature.to_bytes()));

        //Holder
        let valid = signature.verify(issuer_pk, &messages)?;
        assert!(valid, "Signature verification FAILED!");
        log::info!("Signature is VALID");

        //Holder receive nonce from Verifier
        let mut nonce_verifier = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce_verifier);
        log::info!("Nonce: {}", hex::encode(nonce_verifier));

        let disclosed_indexes = [0usize, 1usize];

        //Holder generates SPoK
        log::info!("Proof of Knowledge of the Signature Generation...");
        let proof =
            BBSplusPoKSignature::<S>::proof_gen(&signature, issuer_pk, &messages, &nonce_verifier, &disclosed_indexes)?;
        log::info!("Proof: {}", hex::encode(proof.to_bytes()));

        //Verifier verifies SPok
        let disclosed_messages = get_messages_vec(&messages, &disclosed_indexes);

        log::info!("Proof of Knowledge of the Signature verification...");
        let proof_result = proof.proof_verify(issuer_pk, &disclosed_messages, &nonce_verifier)?;
        assert!(proof_result, "Proof of Knowledge of the Signature Verification Failed!");
        log::info!("Proof of Knowledge of the Signature is VALID!");

        Ok(())
    }
}

fn main() {
    use crate::bbsplus_example::bbsplus_main;
    use bbsplus_sd::schemes::algorithms::{
        BbsBls12381G1Sha256, BbsBls12381G1Shake256, BbsBls12381G2Sha256, BbsBls12381G2Shake256,
    };
    use std::env;

    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        println!(
            "Usage: {} <scheme>
                Schemes:
                    - BLS12-381-G1-SHA-256
                    - BLS12-381-G1-SHAKE-256
                    - BLS12-381-G2-SHA-256
                    - BLS12-381-G2-SHAKE-256",
            args[0]
        );
        return;
    }

    let scheme = &args[1];
    log::info!("Scheme: {}", scheme);

    let result = match scheme.as_str() {
        "BLS12-381-G1-SHA-256" => bbsplus_main::<BbsBls12381G1Sha256>(),
        "BLS12-381-G1-SHAKE-256" => bbsplus_main::<BbsBls12381G1Shake256>(),
        "BLS12-381-G2-SHA-256" => bbsplus_main::<BbsBls12381G2Sha256>(),
        "BLS12-381-G2-SHAKE-256" => bbsplus_main::<BbsBls12381G2Shake256>(),
        _ => {
            println!("Unknown scheme: {}", scheme);
            return;
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
    }
}
