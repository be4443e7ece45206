//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! scholarship ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                | Type           | Description                          |
//! |--------------------|----------------|--------------------------------------|
//! | `Admin`            | `Address`      | The single administrator             |
//! | `Token`            | `Address`      | Token used for every value transfer  |
//! | `ScholarshipCount` | `u64`          | Auto-increment scholarship counter   |
//! | `Verifiers`        | `Vec<Address>` | Whitelisted reviewers, insert order  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type                | Description                    |
//! |--------------------------|---------------------|--------------------------------|
//! | `SchConfig(id)`          | `ScholarshipConfig` | Immutable scholarship terms    |
//! | `SchState(id)`           | `ScholarshipState`  | Slot and application counters  |
//! | `Escrow(id)`             | `EscrowAccount`     | Funds held for the scholarship |
//! | `Application(id, idx)`   | `Application`       | One submitted application      |
//! | `Applicant(id, address)` | `u32`               | Index of that applicant's entry|
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Application, EscrowAccount, Scholarship, ScholarshipConfig, ScholarshipState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Administrator address (Instance).
    Admin,
    /// Value-transfer token address (Instance).
    Token,
    /// Global auto-increment counter for scholarship IDs (Instance).
    ScholarshipCount,
    /// Ordered verifier whitelist (Instance).
    Verifiers,
    /// Immutable scholarship terms keyed by ID (Persistent).
    SchConfig(u64),
    /// Mutable scholarship counters keyed by ID (Persistent).
    SchState(u64),
    /// Escrowed funds keyed by scholarship ID (Persistent).
    Escrow(u64),
    /// Application keyed by (scholarship ID, index) (Persistent).
    Application(u64, u32),
    /// Reverse lookup from applicant to application index (Persistent).
    Applicant(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_scholarship_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ScholarshipCount)
        .unwrap_or(0)
}

/// Reads, increments, and stores the scholarship counter.
/// Returns the ID to use for the *current* scholarship (pre-increment value).
pub fn get_and_increment_scholarship_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = get_scholarship_count(env);
    env.storage()
        .instance()
        .set(&DataKey::ScholarshipCount, &(current + 1));
    current
}

pub fn get_verifiers(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Verifiers)
        .unwrap_or(Vec::new(env))
}

pub fn set_verifiers(env: &Env, verifiers: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Verifiers, verifiers);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

/// Save both the immutable config and initial state for a new scholarship.
pub fn save_scholarship(env: &Env, scholarship: &Scholarship) {
    let config_key = DataKey::SchConfig(scholarship.id);
    let state_key = DataKey::SchState(scholarship.id);

    let config = ScholarshipConfig {
        id: scholarship.id,
        creator: scholarship.creator.clone(),
        title: scholarship.title.clone(),
        description: scholarship.description.clone(),
        amount_per_slot: scholarship.amount_per_slot,
        total_slots: scholarship.total_slots,
        deadline: scholarship.deadline,
    };

    let state = ScholarshipState {
        filled_slots: scholarship.filled_slots,
        total_applications: scholarship.total_applications,
        reclaimed: scholarship.reclaimed,
    };

    env.storage().persistent().set(&config_key, &config);
    env.storage().persistent().set(&state_key, &state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Scholarship` by combining config and state.
pub fn load_scholarship(env: &Env, id: u64) -> Option<Scholarship> {
    let config = load_scholarship_config(env, id)?;
    let state = load_scholarship_state(env, id)?;
    Some(Scholarship {
        id: config.id,
        creator: config.creator,
        title: config.title,
        description: config.description,
        amount_per_slot: config.amount_per_slot,
        total_slots: config.total_slots,
        filled_slots: state.filled_slots,
        deadline: config.deadline,
        total_applications: state.total_applications,
        reclaimed: state.reclaimed,
    })
}

pub fn load_scholarship_config(env: &Env, id: u64) -> Option<ScholarshipConfig> {
    load_persistent(env, &DataKey::SchConfig(id))
}

pub fn load_scholarship_state(env: &Env, id: u64) -> Option<ScholarshipState> {
    load_persistent(env, &DataKey::SchState(id))
}

/// Save only the mutable scholarship counters.
pub fn save_scholarship_state(env: &Env, id: u64, state: &ScholarshipState) {
    let key = DataKey::SchState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn load_escrow(env: &Env, id: u64) -> Option<EscrowAccount> {
    load_persistent(env, &DataKey::Escrow(id))
}

pub fn save_escrow(env: &Env, id: u64, account: &EscrowAccount) {
    let key = DataKey::Escrow(id);
    env.storage().persistent().set(&key, account);
    bump_persistent(env, &key);
}

pub fn load_application(env: &Env, scholarship_id: u64, index: u32) -> Option<Application> {
    load_persistent(env, &DataKey::Application(scholarship_id, index))
}

pub fn save_application(env: &Env, application: &Application) {
    let key = DataKey::Application(application.scholarship_id, application.index);
    env.storage().persistent().set(&key, application);
    bump_persistent(env, &key);
}

pub fn has_applied(env: &Env, scholarship_id: u64, applicant: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Applicant(scholarship_id, applicant.clone()))
}

pub fn set_applicant_index(env: &Env, scholarship_id: u64, applicant: &Address, index: u32) {
    let key = DataKey::Applicant(scholarship_id, applicant.clone());
    env.storage().persistent().set(&key, &index);
    bump_persistent(env, &key);
}
