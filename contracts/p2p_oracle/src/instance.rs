//! Per-pair state machine: signed transmits, quorum signer changes and
//! signature cancellation. Callers persist nothing on `Err`; the host
//! discards the invocation's writes.

use oracle_common::constants::MIN_SIGNERS;
use oracle_common::{median, message, signature, signer_set};
use oracle_common::{FeedStatus, Intent, OracleError, OracleValue};
use soroban_sdk::{log, BytesN, Env, Map, Vec};

use crate::storage::Storage;
use crate::types::{Config, OracleEvent};

/// Accepts one signed batch of observations for the pair's next round
/// and publishes their median.
pub fn transmit(
    env: &Env,
    config: &Config,
    signatures: &Vec<BytesN<65>>,
    id: &BytesN<32>,
    answers: &Vec<i128>,
    timestamps: &Vec<u64>,
) -> Result<OracleValue, OracleError> {
    if config.paused {
        return Err(OracleError::Paused);
    }

    let mut instance = Storage::require_instance(env, id)?;

    if signatures.len() != answers.len() || answers.len() != timestamps.len() {
        return Err(OracleError::ArrayLengthMismatch);
    }
    if signatures.len() < MIN_SIGNERS {
        return Err(OracleError::TooFewSigners);
    }
    median::ensure_sorted(answers)?;

    let round = instance.next_round(Intent::Transmit);
    let previous = Storage::get_value(env, id);
    let horizon = env.ledger().timestamp().saturating_add(config.max_future_skew);
    let signers = Storage::get_signers(env, id);
    let mut seen: Map<BytesN<20>, bool> = Map::new(env);
    let mut latest_timestamp = previous.timestamp;

    for i in 0..signatures.len() {
        let answer = answers.get_unchecked(i);
        let timestamp = timestamps.get_unchecked(i);

        if timestamp < previous.timestamp {
            return Err(OracleError::StaleTimestamp);
        }
        if timestamp > horizon {
            return Err(OracleError::FutureTimestamp);
        }

        let digest = message::digest(
            env,
            &message::transmit_message(env, id, round, answer, timestamp),
        );
        let signer = signature::recover_signer(env, &digest, &signatures.get_unchecked(i))?;
        admit_signer(env, id, &signers, &mut seen, &signer, round, Intent::Transmit)?;

        if timestamp > latest_timestamp {
            latest_timestamp = timestamp;
        }
    }

    let price = median::of_sorted(answers).ok_or(OracleError::TooFewSigners)?;
    let value = OracleValue {
        price,
        timestamp: latest_timestamp,
        status: FeedStatus::Ok,
    };

    instance.latest_round = round;
    Storage::set_instance(env, id, &instance);
    Storage::set_value(env, id, &value);
    clear_cancellations(env, id, &signers, round, Intent::Transmit);

    log!(env, "transmitted", id.clone(), round, price);
    env.events()
        .publish((OracleEvent::Transmitted, id.clone()), (round, price, latest_timestamp));

    Ok(value)
}

/// Signer set recovered from a pair's first transmit batch, before the
/// pair exists. Every signature must be well formed and distinct.
pub fn batch_signers(
    env: &Env,
    signatures: &Vec<BytesN<65>>,
    id: &BytesN<32>,
    answers: &Vec<i128>,
    timestamps: &Vec<u64>,
) -> Result<Map<BytesN<20>, bool>, OracleError> {
    if signatures.len() != answers.len() || answers.len() != timestamps.len() {
        return Err(OracleError::ArrayLengthMismatch);
    }

    let mut signers: Map<BytesN<20>, bool> = Map::new(env);
    for i in 0..signatures.len() {
        let digest = message::digest(
            env,
            &message::transmit_message(env, id, 1, answers.get_unchecked(i), timestamps.get_unchecked(i)),
        );
        let signer = signature::recover_signer(env, &digest, &signatures.get_unchecked(i))?;
        if signers.contains_key(signer.clone()) {
            return Err(OracleError::DuplicateOrCancelledSignature);
        }
        signers.set(signer, true);
    }

    Ok(signers)
}

/// Adds or removes `target` once a quorum of current signers has signed
/// the change for the pair's next modification round.
pub fn modify_signers(
    env: &Env,
    config: &Config,
    signatures: &Vec<BytesN<65>>,
    id: &BytesN<32>,
    target: &BytesN<20>,
    add: bool,
) -> Result<(), OracleError> {
    if config.paused {
        return Err(OracleError::Paused);
    }

    let mut instance = Storage::require_instance(env, id)?;

    if signatures.len() < MIN_SIGNERS {
        return Err(OracleError::TooFewSigners);
    }

    let round = instance.next_round(Intent::ModifySigners);
    let signers = Storage::get_signers(env, id);
    let digest = message::digest(
        env,
        &message::modify_signers_message(env, id, round, target, add),
    );
    let mut seen: Map<BytesN<20>, bool> = Map::new(env);

    for sig in signatures.iter() {
        let signer = signature::recover_signer(env, &digest, &sig)?;
        admit_signer(env, id, &signers, &mut seen, &signer, round, Intent::ModifySigners)?;
    }

    let updated = signer_set::apply_change(&signers, target, add, true)?;

    instance.latest_modification_round = round;
    Storage::set_instance(env, id, &instance);
    Storage::set_signers(env, id, &updated);
    clear_cancellations(env, id, &signers, round, Intent::ModifySigners);

    log!(env, "signers modified", id.clone(), round, add);
    env.events().publish(
        (OracleEvent::SignersModified, id.clone()),
        (round, target.clone(), add),
    );

    Ok(())
}

/// Flags the signer's pending signature for the next round of `intent`.
/// The signer proves identity by signing the cancel message.
pub fn cancel_signature(
    env: &Env,
    id: &BytesN<32>,
    intent: Intent,
    proof: &BytesN<65>,
) -> Result<BytesN<20>, OracleError> {
    let instance = Storage::require_instance(env, id)?;
    let round = instance.next_round(intent);

    let digest = message::digest(
        env,
        &message::cancel_message(env, id, round, intent.is_transmit()),
    );
    let signer = signature::recover_signer(env, &digest, proof)?;

    if !Storage::get_signers(env, id).contains_key(signer.clone()) {
        return Err(OracleError::SignerNotValidator);
    }

    if !Storage::is_cancelled(env, id, &signer, round, intent) {
        Storage::set_cancelled(env, id, &signer, round, intent);
        env.events().publish(
            (OracleEvent::SignatureCancelled, id.clone()),
            (signer.clone(), round, intent.is_transmit()),
        );
    }

    Ok(signer)
}

// Membership, in-batch duplicates and cancellation, in that order.
fn admit_signer(
    env: &Env,
    id: &BytesN<32>,
    signers: &Map<BytesN<20>, bool>,
    seen: &mut Map<BytesN<20>, bool>,
    signer: &BytesN<20>,
    round: u64,
    intent: Intent,
) -> Result<(), OracleError> {
    if !signers.contains_key(signer.clone()) {
        return Err(OracleError::SignerNotValidator);
    }
    if seen.contains_key(signer.clone()) || Storage::is_cancelled(env, id, signer, round, intent) {
        return Err(OracleError::DuplicateOrCancelledSignature);
    }
    seen.set(signer.clone(), true);
    Ok(())
}

fn clear_cancellations(
    env: &Env,
    id: &BytesN<32>,
    signers: &Map<BytesN<20>, bool>,
    round: u64,
    intent: Intent,
) {
    for signer in signers.keys().iter() {
        Storage::clear_cancelled(env, id, &signer, round, intent);
    }
}

/// Drops `signer`'s flags for the pair's next round of both intents.
pub fn clear_pending_cancellations(
    env: &Env,
    id: &BytesN<32>,
    signer: &BytesN<20>,
) -> Result<(), OracleError> {
    let instance = Storage::require_instance(env, id)?;
    for intent in [Intent::Transmit, Intent::ModifySigners] {
        Storage::clear_cancelled(env, id, signer, instance.next_round(intent), intent);
    }
    Ok(())
}
