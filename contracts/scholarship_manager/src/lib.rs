//! # Scholarship Manager Contract
//!
//! Escrow-backed scholarship programme on Soroban. An administrator funds a
//! fixed number of slots up front, candidates apply, whitelisted schools
//! (verifiers) vouch for them, the administrator approves and pays, and any
//! reserve left after the deadline goes back to the creator.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | [`ScholarshipManager::init`]                                |
//! | Role admin   | `add_verifier`, `remove_verifier`                           |
//! | Funding      | [`ScholarshipManager::create_scholarship`]                  |
//! | Applying     | [`ScholarshipManager::submit_application`]                  |
//! | Review       | `verify_application`, `approve_application`                 |
//! | Payout       | [`ScholarshipManager::pay_application`]                     |
//! | Wind-down    | [`ScholarshipManager::withdraw_remainder`]                  |
//! | Queries      | `get_scholarship`, `list_scholarships`, `list_applications`, `list_verifiers`, ... |
//!
//! ## Architecture
//!
//! Authorization lives in [`rbac`], token custody in [`escrow`], scholarship
//! records in [`registry`] and the application state machine in [`ledger`].
//! This file only exposes entry points.
//!
//! Every entry point runs as one Soroban transaction: an `Err` or a trap
//! rolls back all storage writes and token transfers made during the call.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod escrow;
mod events;
mod ledger;
pub mod rbac;
mod registry;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_escrow;
#[cfg(test)]
mod test_events;

pub use events::{
    ApplicationPaid, ApplicationReviewed, ApplicationSubmitted, RemainderWithdrawn,
    ScholarshipCreated,
};
pub use types::{Application, ApplicationStatus, EscrowAccount, Scholarship};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized         = 1,
    AlreadyInitialized     = 2,
    Unauthorized           = 3,
    InvalidIdentity        = 4,
    ScholarshipNotFound    = 5,
    ApplicationNotFound    = 6,
    InvalidAmount          = 7,
    InvalidSlotCount       = 8,
    DeadlinePassed         = 9,
    DeadlineNotReached     = 10,
    SlotsExhausted         = 11,
    InvalidStateTransition = 12,
    InsufficientFunds      = 13,
    InsufficientReserve    = 14,
    AlreadyApplied         = 15,
}

#[contract]
pub struct ScholarshipManager;

#[contractimpl]
impl ScholarshipManager {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Set the administrator and the token every scholarship is paid in.
    ///
    /// Must be called exactly once after deployment.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        admin.require_auth();
        rbac::init_admin(&env, &admin)?;
        storage::set_token(&env, &token);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        rbac::admin(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env).ok_or(Error::NotInitialized)
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Whitelist a school. Idempotent.
    pub fn add_verifier(env: Env, caller: Address, verifier: Address) -> Result<(), Error> {
        rbac::add_verifier(&env, &caller, &verifier)
    }

    /// Remove a school from the whitelist. Idempotent.
    pub fn remove_verifier(env: Env, caller: Address, verifier: Address) -> Result<(), Error> {
        rbac::remove_verifier(&env, &caller, &verifier)
    }

    /// Verifiers in the order they were added.
    pub fn list_verifiers(env: Env) -> Vec<Address> {
        rbac::list_verifiers(&env)
    }

    pub fn is_verifier(env: Env, address: Address) -> bool {
        rbac::is_verifier(&env, &address)
    }

    pub fn is_administrator(env: Env, address: Address) -> bool {
        rbac::is_admin(&env, &address)
    }

    // ─────────────────────────────────────────────────────────
    // Scholarships
    // ─────────────────────────────────────────────────────────

    /// Create a scholarship and escrow `amount_per_slot * total_slots` from
    /// `creator`, who must be the administrator.
    pub fn create_scholarship(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        amount_per_slot: i128,
        total_slots: u32,
        deadline: u64,
    ) -> Result<Scholarship, Error> {
        registry::create(
            &env,
            creator,
            title,
            description,
            amount_per_slot,
            total_slots,
            deadline,
        )
    }

    pub fn get_scholarship(env: Env, id: u64) -> Result<Scholarship, Error> {
        registry::get(&env, id)
    }

    /// All scholarships, newest first.
    pub fn list_scholarships(env: Env) -> Vec<Scholarship> {
        registry::list(&env)
    }

    /// Number of scholarships ever created; also the next id.
    pub fn scholarship_count(env: Env) -> u64 {
        storage::get_scholarship_count(&env)
    }

    /// Tokens still held in escrow for scholarship `id`.
    pub fn escrow_balance(env: Env, id: u64) -> Result<i128, Error> {
        escrow::reserve_of(&env, id)
    }

    /// After the deadline, send the unpaid reserve back to the creator.
    ///
    /// Returns the amount sent. Repeated calls return 0.
    pub fn withdraw_remainder(env: Env, caller: Address, id: u64) -> Result<i128, Error> {
        registry::withdraw_remainder(&env, caller, id)
    }

    // ─────────────────────────────────────────────────────────
    // Applications
    // ─────────────────────────────────────────────────────────

    /// Apply to scholarship `scholarship_id`. One application per applicant.
    ///
    /// `evidence` is an opaque reference to off-chain documents.
    pub fn submit_application(
        env: Env,
        applicant: Address,
        scholarship_id: u64,
        candidate_id: String,
        evidence: String,
    ) -> Result<Application, Error> {
        ledger::submit(&env, applicant, scholarship_id, candidate_id, evidence)
    }

    /// Accept (`Verified`) or reject (`Rejected`) a submitted application.
    ///
    /// `caller` must be a verifier or the administrator.
    pub fn verify_application(
        env: Env,
        caller: Address,
        scholarship_id: u64,
        index: u32,
        accept: bool,
    ) -> Result<Application, Error> {
        ledger::verify(&env, caller, scholarship_id, index, accept)
    }

    /// Approve a verified application while slots remain.
    pub fn approve_application(
        env: Env,
        caller: Address,
        scholarship_id: u64,
        index: u32,
    ) -> Result<Application, Error> {
        ledger::approve(&env, caller, scholarship_id, index)
    }

    /// Pay an approved application from escrow and consume one slot.
    pub fn pay_application(
        env: Env,
        caller: Address,
        scholarship_id: u64,
        index: u32,
    ) -> Result<Application, Error> {
        ledger::pay(&env, caller, scholarship_id, index)
    }

    pub fn get_application(env: Env, scholarship_id: u64, index: u32) -> Result<Application, Error> {
        ledger::get(&env, scholarship_id, index)
    }

    /// Applications to `scholarship_id` in submission order.
    pub fn list_applications(env: Env, scholarship_id: u64) -> Result<Vec<Application>, Error> {
        ledger::list(&env, scholarship_id)
    }
}
