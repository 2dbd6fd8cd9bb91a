use oracle_common::OracleError;
use soroban_sdk::{Address, BytesN, Env};

use crate::storage::Storage;

/// Capabilities guarded by `require_role`.
pub enum Role {
    /// Factory administrator: configuration, pause switch.
    Admin,
    /// Owner of one deployed pair: direct signer management.
    PairOwner(BytesN<32>),
}

/// Authenticates `caller` and checks it holds `role`.
pub fn require_role(env: &Env, caller: &Address, role: &Role) -> Result<(), OracleError> {
    caller.require_auth();

    let holder = match role {
        Role::Admin => Storage::get_config(env)?.admin,
        Role::PairOwner(id) => Storage::require_instance(env, id)?.owner,
    };

    if holder != *caller {
        return Err(OracleError::Unauthorized);
    }
    Ok(())
}
