extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants::assert_escrow_matches_slots;
use crate::{Error, ScholarshipManager, ScholarshipManagerClient};

const WEEK: u64 = 7 * 86_400;

fn setup(minted: i128) -> (Env, ScholarshipManagerClient<'static>, Address, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ScholarshipManager, ());
    let client = ScholarshipManagerClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(Address::generate(&env));
    if minted > 0 {
        token::StellarAssetClient::new(&env, &sac.address()).mint(&admin, &minted);
    }
    client.init(&admin, &sac.address());
    let token = token::Client::new(&env, &sac.address());
    (env, client, admin, token)
}

fn create(
    env: &Env,
    client: &ScholarshipManagerClient,
    admin: &Address,
    amount: i128,
    slots: u32,
) -> u64 {
    client
        .create_scholarship(
            admin,
            &String::from_str(env, "Escrow test"),
            &String::from_str(env, ""),
            &amount,
            &slots,
            &(env.ledger().timestamp() + WEEK),
        )
        .id
}

/// Submit, verify, approve; returns the application index.
fn approved_applicant(
    env: &Env,
    client: &ScholarshipManagerClient,
    admin: &Address,
    id: u64,
) -> (Address, u32) {
    let applicant = Address::generate(env);
    let index = client
        .submit_application(
            &applicant,
            &id,
            &String::from_str(env, "SV"),
            &String::from_str(env, "ipfs://doc"),
        )
        .index;
    client.verify_application(admin, &id, &index, &true);
    client.approve_application(admin, &id, &index);
    (applicant, index)
}

#[test]
fn test_creation_escrows_full_amount() {
    let (env, client, admin, token) = setup(1_000);
    let id = create(&env, &client, &admin, 150, 4);

    assert_eq!(token.balance(&admin), 400);
    assert_eq!(token.balance(&client.address), 600);
    assert_eq!(client.escrow_balance(&id), 600);
    assert_escrow_matches_slots(&client.get_scholarship(&id), client.escrow_balance(&id));
}

#[test]
fn test_insufficient_funds_leaves_no_record() {
    let (env, client, admin, token) = setup(100);

    assert_eq!(
        client.try_create_scholarship(
            &admin,
            &String::from_str(&env, "Too big"),
            &String::from_str(&env, ""),
            &60,
            &2,
            &(env.ledger().timestamp() + WEEK),
        ),
        Err(Ok(Error::InsufficientFunds))
    );

    assert_eq!(client.scholarship_count(), 0);
    assert_eq!(client.list_scholarships().len(), 0);
    assert_eq!(
        client.try_escrow_balance(&0),
        Err(Ok(Error::ScholarshipNotFound))
    );
    assert_eq!(token.balance(&admin), 100);

    // The id is not burned by the failed attempt.
    let id = create(&env, &client, &admin, 50, 2);
    assert_eq!(id, 0);
}

#[test]
fn test_zero_amount_scholarship_needs_no_funds() {
    let (env, client, admin, token) = setup(0);
    let id = create(&env, &client, &admin, 0, 2);
    let (applicant, index) = approved_applicant(&env, &client, &admin, id);

    client.pay_application(&admin, &id, &index);
    assert_eq!(token.balance(&applicant), 0);
    assert_eq!(client.get_scholarship(&id).filled_slots, 1);

    env.ledger().set_timestamp(env.ledger().timestamp() + WEEK);
    assert_eq!(client.withdraw_remainder(&admin, &id), 0);
}

#[test]
fn test_escrows_are_isolated_per_scholarship() {
    let (env, client, admin, token) = setup(1_000);
    let first = create(&env, &client, &admin, 100, 1);
    let second = create(&env, &client, &admin, 200, 2);

    let (applicant, index) = approved_applicant(&env, &client, &admin, first);
    client.pay_application(&admin, &first, &index);

    assert_eq!(token.balance(&applicant), 100);
    assert_eq!(client.escrow_balance(&first), 0);
    assert_eq!(client.escrow_balance(&second), 400);
    assert_eq!(token.balance(&client.address), 400);
}

#[test]
fn test_withdraw_before_deadline_fails() {
    let (env, client, admin, _) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 2);

    assert_eq!(
        client.try_withdraw_remainder(&admin, &id),
        Err(Ok(Error::DeadlineNotReached))
    );
    assert_eq!(client.escrow_balance(&id), 200);
}

#[test]
fn test_withdraw_opens_exactly_at_deadline() {
    let (env, client, admin, token) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 2);
    env.ledger().set_timestamp(client.get_scholarship(&id).deadline);

    assert_eq!(client.withdraw_remainder(&admin, &id), 200);
    assert_eq!(token.balance(&admin), 1_000);
}

#[test]
fn test_withdraw_requires_admin() {
    let (env, client, admin, _) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 2);
    env.ledger().set_timestamp(env.ledger().timestamp() + WEEK);

    let outsider = Address::generate(&env);
    assert_eq!(
        client.try_withdraw_remainder(&outsider, &id),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        client.try_withdraw_remainder(&admin, &42),
        Err(Ok(Error::ScholarshipNotFound))
    );
}

#[test]
fn test_withdraw_after_all_slots_paid_returns_zero() {
    let (env, client, admin, token) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 1);
    let (_, index) = approved_applicant(&env, &client, &admin, id);
    client.pay_application(&admin, &id, &index);

    env.ledger().set_timestamp(env.ledger().timestamp() + WEEK);
    let before = token.balance(&admin);
    assert_eq!(client.withdraw_remainder(&admin, &id), 0);
    assert_eq!(token.balance(&admin), before);
    assert!(!client.get_scholarship(&id).reclaimed);
}

#[test]
fn test_pay_after_withdraw_fails_without_side_effects() {
    let (env, client, admin, token) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 2);
    let (applicant, index) = approved_applicant(&env, &client, &admin, id);

    env.ledger().set_timestamp(env.ledger().timestamp() + WEEK);
    assert_eq!(client.withdraw_remainder(&admin, &id), 200);

    assert_eq!(
        client.try_pay_application(&admin, &id, &index),
        Err(Ok(Error::InsufficientReserve))
    );
    let scholarship = client.get_scholarship(&id);
    assert_eq!(scholarship.filled_slots, 0);
    assert_eq!(token.balance(&applicant), 0);
    assert_eq!(
        client.get_application(&id, &index).status,
        crate::ApplicationStatus::Approved
    );
    assert_escrow_matches_slots(&scholarship, client.escrow_balance(&id));
}

#[test]
fn test_approve_after_withdraw_fails_with_slots_exhausted() {
    let (env, client, admin, _) = setup(1_000);
    let id = create(&env, &client, &admin, 100, 2);
    let applicant = Address::generate(&env);
    let index = client
        .submit_application(
            &applicant,
            &id,
            &String::from_str(&env, "SV"),
            &String::from_str(&env, "ipfs://doc"),
        )
        .index;
    client.verify_application(&admin, &id, &index, &true);

    env.ledger().set_timestamp(env.ledger().timestamp() + WEEK);
    assert_eq!(client.withdraw_remainder(&admin, &id), 200);

    assert_eq!(
        client.try_approve_application(&admin, &id, &index),
        Err(Ok(Error::SlotsExhausted))
    );
    assert_eq!(
        client.get_application(&id, &index).status,
        crate::ApplicationStatus::Verified
    );
}

#[test]
fn test_escrow_tracks_unpaid_slots_throughout() {
    let (env, client, admin, _) = setup(1_000);
    let id = create(&env, &client, &admin, 75, 3);

    for _ in 0..3 {
        let (_, index) = approved_applicant(&env, &client, &admin, id);
        client.pay_application(&admin, &id, &index);
        assert_escrow_matches_slots(&client.get_scholarship(&id), client.escrow_balance(&id));
    }
    assert_eq!(client.escrow_balance(&id), 0);
}
