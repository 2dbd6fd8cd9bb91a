#![no_std]
//! Single-pair price feed. Validators holding `Role::Validator` push
//! answers directly; the signer set can also push a legacy signed answer
//! and change its own membership, both requiring every current signer.

use oracle_common::constants::MIN_SIGNERS;
use oracle_common::{message, pair_id, signature, signer_set};
use oracle_common::{FeedStatus, OracleError, OracleValue};
use soroban_sdk::{
    contract, contractimpl, contractmeta, crypto::Hash, log, Address, BytesN, Env, Map, String,
    Vec,
};

mod storage;
pub mod types;

use crate::storage::*;
use crate::types::{FeedConfig, FeedEvent, Role};

contractmeta!(
    key = "Description",
    val = "Role-gated single-pair price feed"
);

#[contract]
pub struct PriceFeed;

#[contractimpl]
impl PriceFeed {
    pub fn initialize(
        env: Env,
        admin: Address,
        pair_name: String,
        decimals: u32,
        signers: Vec<BytesN<20>>,
    ) -> Result<(), OracleError> {
        if has_config(&env) {
            return Err(OracleError::AlreadyInitialized);
        }
        admin.require_auth();

        let pair_id = pair_id::derive_plain(&env, &pair_name, decimals)?;
        let signers = signer_set::from_list(&env, &signers);
        if signers.len() < MIN_SIGNERS {
            return Err(OracleError::TooFewSigners);
        }

        set_config(
            &env,
            &FeedConfig {
                pair_name,
                decimals,
                pair_id,
            },
        );
        set_signers(&env, &signers);
        set_role(&env, Role::DefaultAdmin, &admin, true);
        extend_instance(&env);

        Ok(())
    }

    pub fn grant_role(env: Env, admin: Address, role: Role, account: Address) -> Result<(), OracleError> {
        Self::require_role(&env, &admin, Role::DefaultAdmin)?;
        set_role(&env, role, &account, true);
        env.events().publish((FeedEvent::RoleGranted, role), account);
        Ok(())
    }

    pub fn revoke_role(env: Env, admin: Address, role: Role, account: Address) -> Result<(), OracleError> {
        Self::require_role(&env, &admin, Role::DefaultAdmin)?;
        set_role(&env, role, &account, false);
        env.events().publish((FeedEvent::RoleRevoked, role), account);
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        has_role(&env, role, &account)
    }

    /// Single-answer transmit by a validator, stamped with ledger time.
    pub fn transmit(env: Env, validator: Address, answer: i128) -> Result<OracleValue, OracleError> {
        get_config(&env)?;
        Self::require_role(&env, &validator, Role::Validator)?;
        Ok(Self::publish(&env, answer))
    }

    /// Legacy signed transmit over `(pair name, decimals, answer)`. Carries
    /// no round, so a signed answer can be replayed; every current signer
    /// must sign.
    pub fn transmit_signed(
        env: Env,
        answer: i128,
        signatures: Vec<BytesN<65>>,
    ) -> Result<OracleValue, OracleError> {
        let config = get_config(&env)?;
        let msg = message::legacy_transmit_message(&env, &config.pair_name, config.decimals, answer)?;
        Self::require_all_signers(&env, &message::digest(&env, &msg), &signatures)?;
        Ok(Self::publish(&env, answer))
    }

    /// Adds or removes `target`; every current signer must sign
    /// `(pair id, next modification round, target, add)`.
    pub fn modify_signers(
        env: Env,
        signatures: Vec<BytesN<65>>,
        target: BytesN<20>,
        add: bool,
    ) -> Result<(), OracleError> {
        let config = get_config(&env)?;
        let round = get_modification_round(&env) + 1;
        let msg = message::modify_signers_message(&env, &config.pair_id, round, &target, add);

        let signers = Self::require_all_signers(&env, &message::digest(&env, &msg), &signatures)?;
        let updated = signer_set::apply_change(&signers, &target, add, true)?;

        set_signers(&env, &updated);
        set_modification_round(&env, round);
        extend_instance(&env);

        env.events()
            .publish((FeedEvent::SignersModified, round), (target, add));
        Ok(())
    }

    pub fn value_for(env: Env) -> OracleValue {
        get_value(&env)
    }

    pub fn latest_round(env: Env) -> u64 {
        get_round(&env)
    }

    pub fn latest_signer_modification_round(env: Env) -> u64 {
        get_modification_round(&env)
    }

    pub fn signers(env: Env) -> Vec<BytesN<20>> {
        get_signers(&env).keys()
    }

    pub fn pair_id(env: Env) -> Result<BytesN<32>, OracleError> {
        Ok(get_config(&env)?.pair_id)
    }

    pub fn get_config(env: Env) -> Result<FeedConfig, OracleError> {
        get_config(&env)
    }

    fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), OracleError> {
        caller.require_auth();
        if !has_role(env, role, caller) {
            return Err(OracleError::Unauthorized);
        }
        Ok(())
    }

    // Every current signer exactly once; returns the set that signed.
    fn require_all_signers(
        env: &Env,
        digest: &Hash<32>,
        signatures: &Vec<BytesN<65>>,
    ) -> Result<Map<BytesN<20>, bool>, OracleError> {
        let signers = get_signers(env);
        if signatures.len() < signers.len() || signatures.len() < MIN_SIGNERS {
            return Err(OracleError::TooFewSigners);
        }

        let mut seen: Map<BytesN<20>, bool> = Map::new(env);
        for sig in signatures.iter() {
            let signer = signature::recover_signer(env, digest, &sig)?;
            if !signers.contains_key(signer.clone()) {
                return Err(OracleError::SignerNotValidator);
            }
            if seen.contains_key(signer.clone()) {
                return Err(OracleError::DuplicateOrCancelledSignature);
            }
            seen.set(signer, true);
        }

        Ok(signers)
    }

    fn publish(env: &Env, answer: i128) -> OracleValue {
        let round = get_round(env) + 1;
        let value = OracleValue {
            price: answer,
            timestamp: env.ledger().timestamp(),
            status: FeedStatus::Ok,
        };
        set_value(env, &value);
        set_round(env, round);
        extend_instance(env);

        log!(env, "feed updated", round, answer);
        env.events()
            .publish((FeedEvent::Transmitted, round), answer);
        value
    }
}

mod test;
