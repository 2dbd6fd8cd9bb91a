//! Packed message layouts that off-chain signers hash and sign.
//!
//! Every layout follows `abi.encodePacked` so signatures produced by
//! standard Ethereum tooling verify unchanged.

use soroban_sdk::{crypto::Hash, Bytes, BytesN, Env, String};

use crate::constants::MAX_PAIR_NAME_LEN;
use crate::types::OracleError;

/// `uint256`: 32-byte big-endian.
pub fn push_uint256(bytes: &mut Bytes, value: u64) {
    bytes.extend_from_array(&[0u8; 24]);
    bytes.extend_from_array(&value.to_be_bytes());
}

/// `int192`: 24-byte big-endian two's complement of an `i128`.
pub fn push_int192(bytes: &mut Bytes, value: i128) {
    let fill = if value < 0 { 0xff } else { 0x00 };
    bytes.extend_from_array(&[fill; 8]);
    bytes.extend_from_array(&value.to_be_bytes());
}

pub fn push_uint64(bytes: &mut Bytes, value: u64) {
    bytes.extend_from_array(&value.to_be_bytes());
}

pub fn push_bool(bytes: &mut Bytes, value: bool) {
    bytes.push_back(value as u8);
}

/// Raw UTF-8 bytes of a string, bounded by `MAX_PAIR_NAME_LEN`.
pub fn push_string(bytes: &mut Bytes, value: &String) -> Result<(), OracleError> {
    let len = value.len() as usize;
    if len > MAX_PAIR_NAME_LEN {
        return Err(OracleError::PairNameTooLong);
    }
    let mut buf = [0u8; MAX_PAIR_NAME_LEN];
    value.copy_into_slice(&mut buf[..len]);
    bytes.extend_from_slice(&buf[..len]);
    Ok(())
}

/// `hash(bytes32 id, uint256 round, int192 answer, uint64 timestamp)`
pub fn transmit_message(
    env: &Env,
    id: &BytesN<32>,
    round: u64,
    answer: i128,
    timestamp: u64,
) -> Bytes {
    let mut bytes = Bytes::new(env);
    bytes.extend_from_array(&id.to_array());
    push_uint256(&mut bytes, round);
    push_int192(&mut bytes, answer);
    push_uint64(&mut bytes, timestamp);
    bytes
}

/// `hash(bytes32 id, uint256 round, address target, bool add)`
pub fn modify_signers_message(
    env: &Env,
    id: &BytesN<32>,
    round: u64,
    target: &BytesN<20>,
    add: bool,
) -> Bytes {
    let mut bytes = Bytes::new(env);
    bytes.extend_from_array(&id.to_array());
    push_uint256(&mut bytes, round);
    bytes.extend_from_array(&target.to_array());
    push_bool(&mut bytes, add);
    bytes
}

/// `hash(bytes32 id, uint256 round, bool isTransmitIntent)`
pub fn cancel_message(env: &Env, id: &BytesN<32>, round: u64, is_transmit: bool) -> Bytes {
    let mut bytes = Bytes::new(env);
    bytes.extend_from_array(&id.to_array());
    push_uint256(&mut bytes, round);
    push_bool(&mut bytes, is_transmit);
    bytes
}

/// Legacy single-shot layout without round fencing:
/// `hash(string pricePair, uint8 decimals, int192 answer)`
pub fn legacy_transmit_message(
    env: &Env,
    pair_name: &String,
    decimals: u32,
    answer: i128,
) -> Result<Bytes, OracleError> {
    let mut bytes = Bytes::new(env);
    push_string(&mut bytes, pair_name)?;
    bytes.push_back(decimals as u8);
    push_int192(&mut bytes, answer);
    Ok(bytes)
}

pub fn digest(env: &Env, message: &Bytes) -> Hash<32> {
    env.crypto().keccak256(message)
}
