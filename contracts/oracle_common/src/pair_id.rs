use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, String};

use crate::constants::MAX_DECIMALS;
use crate::message::push_string;
use crate::types::{OracleError, PairIdMode};

const PREFIX: &[u8; 6] = b"Price-";
const SEPARATOR: &[u8; 1] = b"-";

/// Derives the PricePairId for `pair_name`/`decimals`.
///
/// `provider` is hashed in only under `PairIdMode::PerProvider`, as the XDR
/// encoding of the address.
pub fn derive(
    env: &Env,
    mode: PairIdMode,
    pair_name: &String,
    decimals: u32,
    provider: &Address,
) -> Result<BytesN<32>, OracleError> {
    let mut preimage = name_preimage(env, pair_name, decimals)?;

    if mode == PairIdMode::PerProvider {
        preimage.extend_from_array(SEPARATOR);
        preimage.append(&provider.clone().to_xdr(env));
    }

    Ok(env.crypto().keccak256(&preimage).into())
}

/// Plain-mode id, for single-pair contracts that have no provider.
pub fn derive_plain(env: &Env, pair_name: &String, decimals: u32) -> Result<BytesN<32>, OracleError> {
    let preimage = name_preimage(env, pair_name, decimals)?;
    Ok(env.crypto().keccak256(&preimage).into())
}

// "Price-" ‖ name ‖ "-" ‖ uint8 decimals
fn name_preimage(env: &Env, pair_name: &String, decimals: u32) -> Result<Bytes, OracleError> {
    if decimals > MAX_DECIMALS {
        return Err(OracleError::InvalidDecimals);
    }

    let mut preimage = Bytes::new(env);
    preimage.extend_from_array(PREFIX);
    push_string(&mut preimage, pair_name)?;
    preimage.extend_from_array(SEPARATOR);
    preimage.push_back(decimals as u8);
    Ok(preimage)
}
