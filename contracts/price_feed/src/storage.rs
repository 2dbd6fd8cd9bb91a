use crate::types::{DataKey, FeedConfig, Role};
use oracle_common::constants::{INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};
use oracle_common::{OracleError, OracleValue};
use soroban_sdk::{Address, BytesN, Env, Map};

// Single-pair state is small enough to live in instance storage.

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &FeedConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<FeedConfig, OracleError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(OracleError::NotInitialized)
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Role(role, account.clone()))
        .unwrap_or(false)
}

pub fn set_role(env: &Env, role: Role, account: &Address, granted: bool) {
    let key = DataKey::Role(role, account.clone());
    if granted {
        env.storage().instance().set(&key, &true);
    } else {
        env.storage().instance().remove(&key);
    }
}

pub fn get_signers(env: &Env) -> Map<BytesN<20>, bool> {
    env.storage()
        .instance()
        .get(&DataKey::Signers)
        .unwrap_or(Map::new(env))
}

pub fn set_signers(env: &Env, signers: &Map<BytesN<20>, bool>) {
    env.storage().instance().set(&DataKey::Signers, signers);
}

pub fn get_value(env: &Env) -> OracleValue {
    env.storage()
        .instance()
        .get(&DataKey::Value)
        .unwrap_or(OracleValue::not_found())
}

pub fn set_value(env: &Env, value: &OracleValue) {
    env.storage().instance().set(&DataKey::Value, value);
}

pub fn get_round(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::Round).unwrap_or(0)
}

pub fn set_round(env: &Env, round: u64) {
    env.storage().instance().set(&DataKey::Round, &round);
}

pub fn get_modification_round(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ModificationRound)
        .unwrap_or(0)
}

pub fn set_modification_round(env: &Env, round: u64) {
    env.storage().instance().set(&DataKey::ModificationRound, &round);
}
