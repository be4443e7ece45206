extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    ApplicationPaid, ApplicationReviewed, ApplicationSubmitted, RemainderWithdrawn,
    ScholarshipCreated,
};
use crate::{ApplicationStatus, ScholarshipManager, ScholarshipManagerClient};

fn setup() -> (Env, ScholarshipManagerClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ScholarshipManager, ());
    let client = ScholarshipManagerClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(Address::generate(&env));
    token::StellarAssetClient::new(&env, &sac.address()).mint(&admin, &1_000_000i128);
    client.init(&admin, &sac.address());
    (env, client, admin)
}

fn create_scholarship(env: &Env, client: &ScholarshipManagerClient, admin: &Address) -> u64 {
    client
        .create_scholarship(
            admin,
            &String::from_str(env, "Events"),
            &String::from_str(env, ""),
            &500,
            &2,
            &(env.ledger().timestamp() + 86_400),
        )
        .id
}

fn submit(env: &Env, client: &ScholarshipManagerClient, id: u64) -> (Address, u32) {
    let applicant = Address::generate(env);
    let index = client
        .submit_application(
            &applicant,
            &id,
            &String::from_str(env, "SV"),
            &String::from_str(env, "ipfs://doc"),
        )
        .index;
    (applicant, index)
}

#[test]
fn test_scholarship_created_event() {
    let (env, client, admin) = setup();
    let deadline = env.ledger().timestamp() + 86_400;
    let scholarship = client.create_scholarship(
        &admin,
        &String::from_str(&env, "Events"),
        &String::from_str(&env, ""),
        &500,
        &2,
        &deadline,
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        scholarship.id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ScholarshipCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ScholarshipCreated {
            scholarship_id: scholarship.id,
            creator: admin.clone(),
            amount_per_slot: 500,
            total_slots: 2,
            deadline,
        }
    );
}

#[test]
fn test_application_submitted_event() {
    let (env, client, admin) = setup();
    let id = create_scholarship(&env, &client, &admin);
    let (applicant, index) = submit(&env, &client, id);

    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("applied").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ApplicationSubmitted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ApplicationSubmitted {
            scholarship_id: id,
            index,
            applicant,
        }
    );
}

#[test]
fn test_review_events_follow_status() {
    let (env, client, admin) = setup();
    let school = Address::generate(&env);
    client.add_verifier(&admin, &school);
    let id = create_scholarship(&env, &client, &admin);
    let (_, accepted) = submit(&env, &client, id);
    let (_, rejected) = submit(&env, &client, id);

    let cases = [
        (accepted, true, symbol_short!("verified"), ApplicationStatus::Verified),
        (rejected, false, symbol_short!("rejected"), ApplicationStatus::Rejected),
    ];
    for (index, accept, topic, status) in cases {
        client.verify_application(&school, &id, &index, &accept);

        let last_event = env.events().all().last().expect("No events found");
        assert_eq!(
            last_event.1,
            vec![&env, topic.into_val(&env), id.into_val(&env)]
        );
        let event_data: ApplicationReviewed = last_event.2.try_into_val(&env).unwrap();
        assert_eq!(
            event_data,
            ApplicationReviewed {
                scholarship_id: id,
                index,
                reviewer: school.clone(),
                status,
            }
        );
    }

    client.approve_application(&admin, &id, &accepted);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("approved").into_val(&env), id.into_val(&env)]
    );
    let event_data: ApplicationReviewed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.reviewer, admin);
    assert_eq!(event_data.status, ApplicationStatus::Approved);
}

#[test]
fn test_application_paid_event() {
    let (env, client, admin) = setup();
    let id = create_scholarship(&env, &client, &admin);
    let (applicant, index) = submit(&env, &client, id);
    client.verify_application(&admin, &id, &index, &true);
    client.approve_application(&admin, &id, &index);
    client.pay_application(&admin, &id, &index);

    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("paid").into_val(&env), id.into_val(&env)]
    );
    let event_data: ApplicationPaid = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ApplicationPaid {
            scholarship_id: id,
            index,
            applicant,
            amount: 500,
        }
    );
}

#[test]
fn test_remainder_withdrawn_event() {
    let (env, client, admin) = setup();
    let id = create_scholarship(&env, &client, &admin);
    env.ledger().set_timestamp(env.ledger().timestamp() + 86_400);
    client.withdraw_remainder(&admin, &id);

    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("withdrawn").into_val(&env), id.into_val(&env)]
    );
    let event_data: RemainderWithdrawn = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RemainderWithdrawn {
            scholarship_id: id,
            recipient: admin.clone(),
            amount: 1_000,
        }
    );
}

#[test]
fn test_verifier_events() {
    let (env, client, admin) = setup();
    let school = Address::generate(&env);

    client.add_verifier(&admin, &school);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("vfy_add").into_val(&env), school.into_val(&env)]
    );
    let caller: Address = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(caller, admin);

    client.remove_verifier(&admin, &school);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("vfy_del").into_val(&env), school.into_val(&env)]
    );
}
