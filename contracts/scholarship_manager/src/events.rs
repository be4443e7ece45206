//! Event types and topic constants for the scholarship contract.
//!
//! Every state change publishes exactly one event whose first topic is a
//! short symbol and whose second topic identifies the subject (scholarship
//! id or verifier address). The off-chain indexer keys on these symbols.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::types::ApplicationStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipCreated {
    pub scholarship_id: u64,
    pub creator: Address,
    pub amount_per_slot: i128,
    pub total_slots: u32,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationSubmitted {
    pub scholarship_id: u64,
    pub index: u32,
    pub applicant: Address,
}

/// Emitted for verify, reject and approve.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationReviewed {
    pub scholarship_id: u64,
    pub index: u32,
    pub reviewer: Address,
    pub status: ApplicationStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationPaid {
    pub scholarship_id: u64,
    pub index: u32,
    pub applicant: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemainderWithdrawn {
    pub scholarship_id: u64,
    pub recipient: Address,
    pub amount: i128,
}

pub fn publish_scholarship_created(env: &Env, event: ScholarshipCreated) {
    env.events()
        .publish((symbol_short!("created"), event.scholarship_id), event);
}

pub fn publish_application_submitted(env: &Env, event: ApplicationSubmitted) {
    env.events()
        .publish((symbol_short!("applied"), event.scholarship_id), event);
}

/// The topic follows the status the application moved to.
pub fn publish_application_reviewed(env: &Env, event: ApplicationReviewed) {
    let topic = match event.status {
        ApplicationStatus::Verified => symbol_short!("verified"),
        ApplicationStatus::Rejected => symbol_short!("rejected"),
        _ => symbol_short!("approved"),
    };
    env.events().publish((topic, event.scholarship_id), event);
}

pub fn publish_application_paid(env: &Env, event: ApplicationPaid) {
    env.events()
        .publish((symbol_short!("paid"), event.scholarship_id), event);
}

pub fn publish_remainder_withdrawn(env: &Env, event: RemainderWithdrawn) {
    env.events()
        .publish((symbol_short!("withdrawn"), event.scholarship_id), event);
}

pub fn publish_verifier_changed(env: &Env, topic: Symbol, verifier: &Address, caller: &Address) {
    env.events()
        .publish((topic, verifier.clone()), caller.clone());
}
