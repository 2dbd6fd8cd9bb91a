use crate::types::{Config, DataKey, OracleInstance};
use oracle_common::constants::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use oracle_common::{Intent, OracleError, OracleValue};
use soroban_sdk::{BytesN, Env, Map};

pub struct Storage;

impl Storage {
    pub fn extend_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn has_config(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn set_config(env: &Env, config: &Config) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn get_config(env: &Env) -> Result<Config, OracleError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(OracleError::NotInitialized)
    }

    pub fn pair_count(env: &Env) -> u32 {
        env.storage().instance().get(&DataKey::PairCount).unwrap_or(0)
    }

    /// Reserves the next arena slot for `id`.
    pub fn claim_slot(env: &Env, id: &BytesN<32>) -> u32 {
        let slot = Self::pair_count(env) + 1;
        env.storage().instance().set(&DataKey::PairCount, &slot);

        let key = DataKey::Slot(slot);
        env.storage().persistent().set(&key, id);
        Self::extend(env, &key);
        slot
    }

    pub fn get_slot(env: &Env, slot: u32) -> Option<BytesN<32>> {
        env.storage().persistent().get(&DataKey::Slot(slot))
    }

    pub fn has_instance(env: &Env, id: &BytesN<32>) -> bool {
        env.storage().persistent().has(&DataKey::Pair(id.clone()))
    }

    pub fn get_instance(env: &Env, id: &BytesN<32>) -> Option<OracleInstance> {
        env.storage().persistent().get(&DataKey::Pair(id.clone()))
    }

    pub fn require_instance(env: &Env, id: &BytesN<32>) -> Result<OracleInstance, OracleError> {
        Self::get_instance(env, id).ok_or(OracleError::ProviderDoesNotExist)
    }

    pub fn set_instance(env: &Env, id: &BytesN<32>, instance: &OracleInstance) {
        let key = DataKey::Pair(id.clone());
        env.storage().persistent().set(&key, instance);
        Self::extend(env, &key);
    }

    pub fn get_signers(env: &Env, id: &BytesN<32>) -> Map<BytesN<20>, bool> {
        env.storage()
            .persistent()
            .get(&DataKey::Signers(id.clone()))
            .unwrap_or(Map::new(env))
    }

    pub fn set_signers(env: &Env, id: &BytesN<32>, signers: &Map<BytesN<20>, bool>) {
        let key = DataKey::Signers(id.clone());
        env.storage().persistent().set(&key, signers);
        Self::extend(env, &key);
    }

    /// Latest value for `id`, or the 404 value when nothing was accepted.
    pub fn get_value(env: &Env, id: &BytesN<32>) -> OracleValue {
        env.storage()
            .persistent()
            .get(&DataKey::Value(id.clone()))
            .unwrap_or(OracleValue::not_found())
    }

    pub fn set_value(env: &Env, id: &BytesN<32>, value: &OracleValue) {
        let key = DataKey::Value(id.clone());
        env.storage().persistent().set(&key, value);
        Self::extend(env, &key);
    }

    pub fn is_cancelled(
        env: &Env,
        id: &BytesN<32>,
        signer: &BytesN<20>,
        round: u64,
        intent: Intent,
    ) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Cancelled(id.clone(), signer.clone(), round, intent))
    }

    pub fn set_cancelled(env: &Env, id: &BytesN<32>, signer: &BytesN<20>, round: u64, intent: Intent) {
        let key = DataKey::Cancelled(id.clone(), signer.clone(), round, intent);
        env.storage().persistent().set(&key, &true);
        Self::extend(env, &key);
    }

    pub fn clear_cancelled(env: &Env, id: &BytesN<32>, signer: &BytesN<20>, round: u64, intent: Intent) {
        env.storage()
            .persistent()
            .remove(&DataKey::Cancelled(id.clone(), signer.clone(), round, intent));
    }

    fn extend(env: &Env, key: &DataKey) {
        env.storage()
            .persistent()
            .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
}
