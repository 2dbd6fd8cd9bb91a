use soroban_sdk::{BytesN, Env, Map, Vec};

use crate::constants::MIN_SIGNERS;
use crate::types::OracleError;

/// Membership map from a list, collapsing repeats.
pub fn from_list(env: &Env, signers: &Vec<BytesN<20>>) -> Map<BytesN<20>, bool> {
    let mut set: Map<BytesN<20>, bool> = Map::new(env);
    for signer in signers.iter() {
        set.set(signer, true);
    }
    set
}

/// Returns the signer set with `target` added or removed. `enforce_floor`
/// keeps the set at `MIN_SIGNERS` or more; admin paths skip it.
pub fn apply_change(
    signers: &Map<BytesN<20>, bool>,
    target: &BytesN<20>,
    add: bool,
    enforce_floor: bool,
) -> Result<Map<BytesN<20>, bool>, OracleError> {
    let mut updated = signers.clone();

    if add {
        if updated.contains_key(target.clone()) {
            return Err(OracleError::SignerAlreadyExists);
        }
        updated.set(target.clone(), true);
    } else {
        if !updated.contains_key(target.clone()) {
            return Err(OracleError::SignerNotFound);
        }
        if enforce_floor && updated.len() - 1 < MIN_SIGNERS {
            return Err(OracleError::NeedMoreSigners);
        }
        updated.remove(target.clone());
    }

    Ok(updated)
}
