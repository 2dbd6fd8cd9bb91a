use libsecp256k1::curve::{Affine, Field};
use soroban_sdk::{crypto::Hash, Bytes, BytesN, Env};

use crate::constants::{SECP256K1_HALF_ORDER, SECP256K1_ORDER};
use crate::types::OracleError;

/// Recovers the 20-byte signer address behind a 65-byte `r ‖ s ‖ v`
/// signature over `digest`.
///
/// Malformed blobs (unknown `v`, zero or out-of-range `r`/`s`, high `s`,
/// an `r` that is not the x-coordinate of a curve point) are rejected with
/// `InvalidSignature` before reaching the host. A well-formed signature
/// that still recovers to the point at infinity traps in the host.
pub fn recover_signer(
    env: &Env,
    digest: &Hash<32>,
    signature: &BytesN<65>,
) -> Result<BytesN<20>, OracleError> {
    let raw = signature.to_array();

    let recovery_id = match raw[64] {
        0 | 1 => raw[64] as u32,
        27 | 28 => (raw[64] - 27) as u32,
        _ => return Err(OracleError::InvalidSignature),
    };

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&raw[..32]);
    s.copy_from_slice(&raw[32..64]);
    if r == [0u8; 32] || r >= SECP256K1_ORDER || s == [0u8; 32] || s > SECP256K1_HALF_ORDER {
        return Err(OracleError::InvalidSignature);
    }
    if !is_curve_x(&r) {
        return Err(OracleError::InvalidSignature);
    }

    let mut compact = [0u8; 64];
    compact.copy_from_slice(&raw[..64]);
    let public_key = env.crypto().secp256k1_recover(
        digest,
        &BytesN::from_array(env, &compact),
        recovery_id,
    );

    Ok(address_of(env, &public_key))
}

// Whether some point on secp256k1 has `x` as its x-coordinate.
fn is_curve_x(x: &[u8; 32]) -> bool {
    let mut field = Field::default();
    if !field.set_b32(x) {
        return false;
    }
    Affine::default().set_xquad(&field)
}

/// Ethereum address of an uncompressed SEC1 public key: the low 20 bytes
/// of `keccak256(x ‖ y)`.
pub fn address_of(env: &Env, public_key: &BytesN<65>) -> BytesN<20> {
    let raw = public_key.to_array();
    let hash: BytesN<32> = env
        .crypto()
        .keccak256(&Bytes::from_slice(env, &raw[1..]))
        .into();
    let hash = hash.to_array();

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    BytesN::from_array(env, &address)
}
