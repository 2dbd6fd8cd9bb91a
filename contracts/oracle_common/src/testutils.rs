//! Off-chain signer helpers for tests. Signs with real secp256k1 keys so
//! the contracts exercise the same recovery path as production.
extern crate std;

use libsecp256k1::{Message, PublicKey, SecretKey};
use soroban_sdk::{Bytes, BytesN, Env};

use crate::signature::address_of;

pub struct TestSigner {
    secret: SecretKey,
    pub address: BytesN<20>,
}

impl TestSigner {
    /// Deterministic key from a non-zero seed byte.
    pub fn from_seed(env: &Env, seed: u8) -> Self {
        let secret = SecretKey::parse(&[seed; 32]).expect("seed must be non-zero");
        let public = PublicKey::from_secret_key(&secret).serialize();
        let address = address_of(env, &BytesN::from_array(env, &public));
        TestSigner { secret, address }
    }

    /// `r ‖ s ‖ v` over `keccak256(message)`, with `v` in the 27/28 form.
    pub fn sign(&self, env: &Env, message: &Bytes) -> BytesN<65> {
        let digest: BytesN<32> = env.crypto().keccak256(message).into();
        let (signature, recovery_id) =
            libsecp256k1::sign(&Message::parse(&digest.to_array()), &self.secret);

        let mut raw = [0u8; 65];
        raw[..64].copy_from_slice(&signature.serialize());
        raw[64] = recovery_id.serialize() + 27;
        BytesN::from_array(env, &raw)
    }
}
