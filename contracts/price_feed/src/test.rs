#![cfg(test)]
extern crate std;

use super::*;
use oracle_common::testutils::TestSigner;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    Address, BytesN, Env, String, Vec,
};

struct Fixture<'a> {
    client: PriceFeedClient<'a>,
    admin: Address,
    p1: TestSigner,
    p2: TestSigner,
}

fn setup(env: &Env) -> Fixture<'_> {
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.timestamp = 1000;
    });

    let contract_id = env.register_contract(None, PriceFeed);
    let client = PriceFeedClient::new(env, &contract_id);
    let admin = Address::generate(env);
    let p1 = TestSigner::from_seed(env, 1);
    let p2 = TestSigner::from_seed(env, 2);

    client.initialize(
        &admin,
        &String::from_str(env, "ETH/USD"),
        &3,
        &Vec::from_array(env, [p1.address.clone(), p2.address.clone()]),
    );

    Fixture { client, admin, p1, p2 }
}

fn sign_legacy(env: &Env, answer: i128, signers: &[&TestSigner]) -> Vec<BytesN<65>> {
    let msg = message::legacy_transmit_message(env, &String::from_str(env, "ETH/USD"), 3, answer)
        .unwrap();
    let mut signatures = Vec::new(env);
    for signer in signers {
        signatures.push_back(signer.sign(env, &msg));
    }
    signatures
}

fn sign_modify(
    env: &Env,
    id: &BytesN<32>,
    round: u64,
    target: &BytesN<20>,
    add: bool,
    signers: &[&TestSigner],
) -> Vec<BytesN<65>> {
    let msg = message::modify_signers_message(env, id, round, target, add);
    let mut signatures = Vec::new(env);
    for signer in signers {
        signatures.push_back(signer.sign(env, &msg));
    }
    signatures
}

#[test]
fn test_initialize() {
    let env = Env::default();
    let f = setup(&env);

    assert!(f.client.has_role(&Role::DefaultAdmin, &f.admin));
    assert!(!f.client.has_role(&Role::Validator, &f.admin));
    assert_eq!(f.client.value_for(), OracleValue::not_found());
    assert_eq!(f.client.signers().len(), 2);
    assert_eq!(
        f.client.pair_id(),
        pair_id::derive_plain(&env, &String::from_str(&env, "ETH/USD"), 3).unwrap()
    );

    let res = f.client.try_initialize(
        &f.admin,
        &String::from_str(&env, "ETH/USD"),
        &3,
        &Vec::from_array(&env, [f.p1.address.clone(), f.p2.address.clone()]),
    );
    assert_eq!(res, Err(Ok(OracleError::AlreadyInitialized)));
}

#[test]
fn test_initialize_needs_two_signers() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register_contract(None, PriceFeed);
    let client = PriceFeedClient::new(&env, &contract_id);
    let p1 = TestSigner::from_seed(&env, 1);

    let res = client.try_initialize(
        &Address::generate(&env),
        &String::from_str(&env, "ETH/USD"),
        &3,
        &Vec::from_array(&env, [p1.address.clone()]),
    );
    assert_eq!(res, Err(Ok(OracleError::TooFewSigners)));
}

#[test]
fn test_validator_transmit() {
    let env = Env::default();
    let f = setup(&env);
    let validator = Address::generate(&env);

    let res = f.client.try_transmit(&validator, &3000);
    assert_eq!(res, Err(Ok(OracleError::Unauthorized)));

    f.client.grant_role(&f.admin, &Role::Validator, &validator);
    let value = f.client.transmit(&validator, &3000);
    assert_eq!(value.price, 3000);
    assert_eq!(value.timestamp, 1000);
    assert_eq!(value.status, FeedStatus::Ok);
    assert_eq!(f.client.latest_round(), 1);

    f.client.revoke_role(&f.admin, &Role::Validator, &validator);
    let res = f.client.try_transmit(&validator, &3100);
    assert_eq!(res, Err(Ok(OracleError::Unauthorized)));
    assert_eq!(f.client.value_for().price, 3000);
}

#[test]
fn test_only_admin_manages_roles() {
    let env = Env::default();
    let f = setup(&env);
    let stranger = Address::generate(&env);

    let res = f.client.try_grant_role(&stranger, &Role::Validator, &stranger);
    assert_eq!(res, Err(Ok(OracleError::Unauthorized)));

    // Validators cannot hand out roles either.
    f.client.grant_role(&f.admin, &Role::Validator, &stranger);
    let res = f.client.try_grant_role(&stranger, &Role::DefaultAdmin, &stranger);
    assert_eq!(res, Err(Ok(OracleError::Unauthorized)));
}

#[test]
fn test_transmit_signed_by_all_signers() {
    let env = Env::default();
    let f = setup(&env);

    let signatures = sign_legacy(&env, 3000, &[&f.p2, &f.p1]);
    let value = f.client.transmit_signed(&3000, &signatures);
    assert_eq!(value.price, 3000);
    assert_eq!(f.client.latest_round(), 1);

    // No round fencing: the same signatures apply again.
    f.client.transmit_signed(&3000, &signatures);
    assert_eq!(f.client.latest_round(), 2);
}

#[test]
fn test_transmit_signed_rejections() {
    let env = Env::default();
    let f = setup(&env);
    let outsider = TestSigner::from_seed(&env, 9);

    let res = f.client.try_transmit_signed(&3000, &sign_legacy(&env, 3000, &[&f.p1]));
    assert_eq!(res, Err(Ok(OracleError::TooFewSigners)));

    let res = f.client.try_transmit_signed(&3000, &sign_legacy(&env, 3000, &[&f.p1, &outsider]));
    assert_eq!(res, Err(Ok(OracleError::SignerNotValidator)));

    let res = f.client.try_transmit_signed(&3000, &sign_legacy(&env, 3000, &[&f.p1, &f.p1]));
    assert_eq!(res, Err(Ok(OracleError::DuplicateOrCancelledSignature)));

    // Signed for another answer.
    let res = f.client.try_transmit_signed(&3001, &sign_legacy(&env, 3000, &[&f.p1, &f.p2]));
    assert_eq!(res, Err(Ok(OracleError::SignerNotValidator)));

    assert_eq!(f.client.value_for(), OracleValue::not_found());
}

#[test]
fn test_modify_signers_needs_everyone() {
    let env = Env::default();
    let f = setup(&env);
    let p3 = TestSigner::from_seed(&env, 3);
    let id = f.client.pair_id();

    let signatures = sign_modify(&env, &id, 1, &p3.address, true, &[&f.p1, &f.p2]);
    f.client.modify_signers(&signatures, &p3.address, &true);
    assert_eq!(f.client.signers().len(), 3);
    assert_eq!(f.client.latest_signer_modification_round(), 1);

    // Two of three is no longer enough.
    let signatures = sign_modify(&env, &id, 2, &f.p1.address, false, &[&f.p2, &p3]);
    let res = f.client.try_modify_signers(&signatures, &f.p1.address, &false);
    assert_eq!(res, Err(Ok(OracleError::TooFewSigners)));

    let signatures = sign_modify(&env, &id, 2, &f.p1.address, false, &[&f.p1, &f.p2, &p3]);
    f.client.modify_signers(&signatures, &f.p1.address, &false);
    assert_eq!(f.client.signers().len(), 2);

    // Legacy transmits now need the new set.
    let value = f.client.transmit_signed(&4000, &sign_legacy(&env, 4000, &[&f.p2, &p3]));
    assert_eq!(value.price, 4000);
}

#[test]
fn test_modify_signers_floor_and_fencing() {
    let env = Env::default();
    let f = setup(&env);
    let p3 = TestSigner::from_seed(&env, 3);
    let id = f.client.pair_id();

    let signatures = sign_modify(&env, &id, 1, &f.p1.address, false, &[&f.p1, &f.p2]);
    let res = f.client.try_modify_signers(&signatures, &f.p1.address, &false);
    assert_eq!(res, Err(Ok(OracleError::NeedMoreSigners)));

    let stale = sign_modify(&env, &id, 1, &p3.address, true, &[&f.p1, &f.p2]);
    f.client.modify_signers(&stale, &p3.address, &true);

    let again = sign_modify(&env, &id, 1, &p3.address, false, &[&f.p1, &f.p2, &p3]);
    let res = f.client.try_modify_signers(&again, &p3.address, &false);
    assert_eq!(res, Err(Ok(OracleError::SignerNotValidator)));
}
