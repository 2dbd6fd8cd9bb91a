#![no_std]
use oracle_common::constants::MIN_SIGNERS;
use oracle_common::{pair_id, signer_set, Intent, OracleError, OracleValue, PairIdMode};
use soroban_sdk::{
    contract, contractimpl, contractmeta, log, Address, BytesN, Env, Map, String, Vec,
};

mod access;
mod instance;
mod storage;
pub mod types;

use access::{require_role, Role};
use storage::Storage;
use types::{Config, OracleEvent, OracleInstance};

contractmeta!(
    key = "Description",
    val = "Peer-to-peer multi-signature price oracle factory"
);

#[contract]
pub struct P2POracle;

#[contractimpl]
impl P2POracle {
    pub fn initialize(
        env: Env,
        admin: Address,
        id_mode: PairIdMode,
        max_future_skew: u64,
    ) -> Result<(), OracleError> {
        if Storage::has_config(&env) {
            return Err(OracleError::AlreadyInitialized);
        }
        admin.require_auth();

        let config = Config {
            admin,
            id_mode,
            max_future_skew,
            paused: false,
        };
        Storage::set_config(&env, &config);
        Storage::extend_instance(&env);

        Ok(())
    }

    /// Creates the oracle for `pair_name`/`decimals`, owned by `creator`.
    pub fn deploy_oracle(
        env: Env,
        creator: Address,
        pair_name: String,
        decimals: u32,
        initial_signers: Vec<BytesN<20>>,
    ) -> Result<BytesN<32>, OracleError> {
        let config = Storage::get_config(&env)?;
        creator.require_auth();

        let id = pair_id::derive(&env, config.id_mode, &pair_name, decimals, &creator)?;
        if Storage::has_instance(&env, &id) {
            return Err(OracleError::AlreadyDeployed);
        }

        let signers = signer_set::from_list(&env, &initial_signers);
        Self::register(&env, &id, creator, pair_name, decimals, &signers)?;
        Storage::extend_instance(&env);

        Ok(id)
    }

    pub fn transmit(
        env: Env,
        signatures: Vec<BytesN<65>>,
        id: BytesN<32>,
        answers: Vec<i128>,
        timestamps: Vec<u64>,
    ) -> Result<OracleValue, OracleError> {
        let config = Storage::get_config(&env)?;
        Storage::extend_instance(&env);
        instance::transmit(&env, &config, &signatures, &id, &answers, &timestamps)
    }

    /// Transmits for `provider`'s own pair, addressed by name. Under
    /// per-provider ids the first transmit deploys the pair, owned by
    /// `provider` and signed for by the batch's signers.
    pub fn transmit_as_provider(
        env: Env,
        provider: Address,
        pair_name: String,
        decimals: u32,
        signatures: Vec<BytesN<65>>,
        answers: Vec<i128>,
        timestamps: Vec<u64>,
    ) -> Result<OracleValue, OracleError> {
        let config = Storage::get_config(&env)?;
        if config.paused {
            return Err(OracleError::Paused);
        }

        let id = pair_id::derive(&env, config.id_mode, &pair_name, decimals, &provider)?;
        if !Storage::has_instance(&env, &id) && config.id_mode == PairIdMode::PerProvider {
            provider.require_auth();
            let signers = instance::batch_signers(&env, &signatures, &id, &answers, &timestamps)?;
            Self::register(&env, &id, provider, pair_name, decimals, &signers)?;
        }
        Storage::extend_instance(&env);

        instance::transmit(&env, &config, &signatures, &id, &answers, &timestamps)
    }

    /// Transmits for several pairs in one invocation. Any failing pair
    /// rejects the whole batch. Returns the number of pairs updated.
    pub fn transmit_batch(
        env: Env,
        signatures: Vec<Vec<BytesN<65>>>,
        ids: Vec<BytesN<32>>,
        answers: Vec<Vec<i128>>,
        timestamps: Vec<Vec<u64>>,
    ) -> Result<u32, OracleError> {
        let config = Storage::get_config(&env)?;

        if ids.len() != signatures.len()
            || ids.len() != answers.len()
            || ids.len() != timestamps.len()
        {
            return Err(OracleError::ArrayLengthMismatch);
        }

        for i in 0..ids.len() {
            instance::transmit(
                &env,
                &config,
                &signatures.get_unchecked(i),
                &ids.get_unchecked(i),
                &answers.get_unchecked(i),
                &timestamps.get_unchecked(i),
            )?;
        }
        Storage::extend_instance(&env);

        Ok(ids.len())
    }

    pub fn modify_signers(
        env: Env,
        signatures: Vec<BytesN<65>>,
        id: BytesN<32>,
        target: BytesN<20>,
        add: bool,
    ) -> Result<(), OracleError> {
        let config = Storage::get_config(&env)?;
        Storage::extend_instance(&env);
        instance::modify_signers(&env, &config, &signatures, &id, &target, add)
    }

    /// `signature` is the signer's signature over the cancel message for
    /// the pair's next round of the chosen intent.
    pub fn cancel_signature(
        env: Env,
        id: BytesN<32>,
        is_transmit: bool,
        signature: BytesN<65>,
    ) -> Result<BytesN<20>, OracleError> {
        Storage::get_config(&env)?;
        instance::cancel_signature(&env, &id, Intent::from_flag(is_transmit), &signature)
    }

    // ───────────── Pair owner ─────────────

    pub fn add_signer(
        env: Env,
        owner: Address,
        id: BytesN<32>,
        signer: BytesN<20>,
    ) -> Result<(), OracleError> {
        require_role(&env, &owner, &Role::PairOwner(id.clone()))?;

        let signers = Storage::get_signers(&env, &id);
        let updated = signer_set::apply_change(&signers, &signer, true, false)?;
        Storage::set_signers(&env, &id, &updated);

        env.events()
            .publish((OracleEvent::SignerAdded, id), signer);
        Ok(())
    }

    pub fn revoke_signer(
        env: Env,
        owner: Address,
        id: BytesN<32>,
        signer: BytesN<20>,
    ) -> Result<(), OracleError> {
        require_role(&env, &owner, &Role::PairOwner(id.clone()))?;

        let signers = Storage::get_signers(&env, &id);
        let updated = signer_set::apply_change(&signers, &signer, false, false)?;
        Storage::set_signers(&env, &id, &updated);
        instance::clear_pending_cancellations(&env, &id, &signer)?;

        env.events()
            .publish((OracleEvent::SignerRevoked, id), signer);
        Ok(())
    }

    pub fn transfer_owner(
        env: Env,
        owner: Address,
        id: BytesN<32>,
        new_owner: Address,
    ) -> Result<(), OracleError> {
        require_role(&env, &owner, &Role::PairOwner(id.clone()))?;
        new_owner.require_auth();

        let mut instance = Storage::require_instance(&env, &id)?;
        instance.owner = new_owner.clone();
        Storage::set_instance(&env, &id, &instance);

        env.events()
            .publish((OracleEvent::OwnerTransferred, id), (owner, new_owner));
        Ok(())
    }

    // ───────────── Factory admin ─────────────

    pub fn transfer_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), OracleError> {
        require_role(&env, &admin, &Role::Admin)?;
        new_admin.require_auth();

        let mut config = Storage::get_config(&env)?;
        config.admin = new_admin.clone();
        Storage::set_config(&env, &config);

        env.events()
            .publish((OracleEvent::AdminTransferred,), (admin, new_admin));
        Ok(())
    }

    pub fn set_max_future_skew(env: Env, admin: Address, max_future_skew: u64) -> Result<(), OracleError> {
        require_role(&env, &admin, &Role::Admin)?;

        let mut config = Storage::get_config(&env)?;
        config.max_future_skew = max_future_skew;
        Storage::set_config(&env, &config);

        env.events()
            .publish((OracleEvent::ConfigUpdated,), max_future_skew);
        Ok(())
    }

    pub fn pause(env: Env, admin: Address) -> Result<(), OracleError> {
        Self::set_paused(&env, &admin, true)
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), OracleError> {
        Self::set_paused(&env, &admin, false)
    }

    // ───────────── Views ─────────────

    /// Latest aggregated value, `(0, 0, 404)` for unknown or silent pairs.
    pub fn value_for(env: Env, id: BytesN<32>) -> OracleValue {
        Storage::get_value(&env, &id)
    }

    /// Latest value, provided it is at most `max_age` seconds old.
    pub fn fresh_value_for(env: Env, id: BytesN<32>, max_age: u64) -> Result<OracleValue, OracleError> {
        let value = Storage::get_value(&env, &id);
        if !value.is_live() {
            return Err(OracleError::ProviderDoesNotExist);
        }
        if env.ledger().timestamp().saturating_sub(value.timestamp) > max_age {
            return Err(OracleError::StalePrice);
        }
        Ok(value)
    }

    pub fn latest_round_of_price_pair(env: Env, id: BytesN<32>) -> u64 {
        Storage::get_instance(&env, &id).map_or(0, |instance| instance.latest_round)
    }

    pub fn latest_signer_modification_round(env: Env, id: BytesN<32>) -> u64 {
        Storage::get_instance(&env, &id).map_or(0, |instance| instance.latest_modification_round)
    }

    /// Arena slot of the pair's instance; `0` when none was deployed.
    pub fn address_of_price_pair(env: Env, id: BytesN<32>) -> u32 {
        Storage::get_instance(&env, &id).map_or(0, |instance| instance.slot)
    }

    pub fn id_for(
        env: Env,
        pair_name: String,
        decimals: u32,
        creator: Address,
    ) -> Result<BytesN<32>, OracleError> {
        let config = Storage::get_config(&env)?;
        pair_id::derive(&env, config.id_mode, &pair_name, decimals, &creator)
    }

    pub fn get_instance(env: Env, id: BytesN<32>) -> Option<OracleInstance> {
        Storage::get_instance(&env, &id)
    }

    pub fn pair_at(env: Env, slot: u32) -> Option<BytesN<32>> {
        Storage::get_slot(&env, slot)
    }

    pub fn pair_count(env: Env) -> u32 {
        Storage::pair_count(&env)
    }

    pub fn signers_of(env: Env, id: BytesN<32>) -> Vec<BytesN<20>> {
        Storage::get_signers(&env, &id).keys()
    }

    pub fn is_signer(env: Env, id: BytesN<32>, signer: BytesN<20>) -> bool {
        Storage::get_signers(&env, &id).contains_key(signer)
    }

    /// Whether `signer` has cancelled its signature for the pair's next
    /// round of the chosen intent.
    pub fn is_cancelled(env: Env, id: BytesN<32>, signer: BytesN<20>, is_transmit: bool) -> bool {
        let intent = Intent::from_flag(is_transmit);
        match Storage::get_instance(&env, &id) {
            Some(instance) => {
                Storage::is_cancelled(&env, &id, &signer, instance.next_round(intent), intent)
            }
            None => false,
        }
    }

    pub fn get_config(env: Env) -> Result<Config, OracleError> {
        Storage::get_config(&env)
    }

    fn register(
        env: &Env,
        id: &BytesN<32>,
        owner: Address,
        pair_name: String,
        decimals: u32,
        signers: &Map<BytesN<20>, bool>,
    ) -> Result<u32, OracleError> {
        if signers.len() < MIN_SIGNERS {
            return Err(OracleError::TooFewSigners);
        }

        let slot = Storage::claim_slot(env, id);
        let instance = OracleInstance {
            slot,
            pair_name,
            decimals,
            owner,
            latest_round: 0,
            latest_modification_round: 0,
            created_at: env.ledger().timestamp(),
        };
        Storage::set_instance(env, id, &instance);
        Storage::set_signers(env, id, signers);

        log!(env, "price feed created", id.clone(), slot);
        env.events()
            .publish((OracleEvent::PriceFeedCreated, id.clone()), slot);

        Ok(slot)
    }

    fn set_paused(env: &Env, admin: &Address, paused: bool) -> Result<(), OracleError> {
        require_role(env, admin, &Role::Admin)?;

        let mut config = Storage::get_config(env)?;
        config.paused = paused;
        Storage::set_config(env, &config);

        log!(env, "paused", paused);
        env.events()
            .publish((OracleEvent::ConfigUpdated,), paused);
        Ok(())
    }
}
