//! # Types
//!
//! Shared data structures used across all modules of the scholarship ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Scholarship` is internally stored as two separate ledger entries:
//!
//! - [`ScholarshipConfig`] — written once at creation; never mutated.
//! - [`ScholarshipState`] — written on every submission, payment and withdrawal.
//!
//! The public API exposes the reconstructed [`Scholarship`] struct.
//!
//! ### Application status as a Finite-State Machine
//!
//! [`ApplicationStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Submitted ──► Verified ──► Approved ──► Paid
//!     └──► Rejected
//! ```
//!
//! `Paid` and `Rejected` are terminal. Transitions are validated by
//! [`ApplicationStatus::can_transition_to`] inside the ledger module.

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of an application.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApplicationStatus {
    /// Placeholder ordinal; never assigned by the contract.
    Created,
    /// Waiting for a verifier.
    Submitted,
    /// Accepted by a verifier; waiting for the administrator.
    Verified,
    /// Approved by the administrator; waiting for payment.
    Approved,
    /// Funds released to the applicant.
    Paid,
    /// Turned down during verification.
    Rejected,
}

impl ApplicationStatus {
    /// `true` for states no operation can leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }

    /// The only edges of the lifecycle graph.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Verified)
                | (Self::Submitted, Self::Rejected)
                | (Self::Verified, Self::Approved)
                | (Self::Approved, Self::Paid)
        )
    }
}

/// Immutable scholarship terms, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipConfig {
    pub id: u64,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub amount_per_slot: i128,
    pub total_slots: u32,
    pub deadline: u64,
}

/// Mutable scholarship counters.
///
/// Kept small so that submissions and payments only rewrite a few bytes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScholarshipState {
    pub filled_slots: u32,
    pub total_applications: u32,
    pub reclaimed: bool,
}

/// Full on-chain representation of a scholarship.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ScholarshipConfig` + `ScholarshipState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scholarship {
    /// Unique identifier (auto-incremented from 0).
    pub id: u64,
    /// Administrator that funded the scholarship; receives any remainder.
    pub creator: Address,
    pub title: String,
    pub description: String,
    /// Token amount paid to each successful applicant.
    pub amount_per_slot: i128,
    /// Number of awards funded at creation.
    pub total_slots: u32,
    /// Number of awards already paid out.
    pub filled_slots: u32,
    /// Ledger timestamp after which submissions close and the remainder
    /// may be withdrawn.
    pub deadline: u64,
    /// Applications ever submitted; also the next application index.
    pub total_applications: u32,
    /// Set once the unused escrow has been returned to the creator.
    pub reclaimed: bool,
}

/// A candidate's application to one scholarship.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Application {
    pub scholarship_id: u64,
    /// 0-based position in the scholarship's submission order.
    pub index: u32,
    pub applicant: Address,
    /// Candidate identifier as given by the applicant (e.g. student number).
    pub candidate_id: String,
    /// Opaque pointer to off-chain evidence. Never interpreted.
    pub evidence: String,
    /// Ledger timestamp of submission.
    pub submitted_at: u64,
    pub status: ApplicationStatus,
}

/// Funds held for a single scholarship.
///
/// The scholarship id doubles as the reservation id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowAccount {
    /// Value still held for this scholarship.
    pub balance: i128,
    /// Set by the first reclaim; later reclaims transfer nothing.
    pub reclaimed: bool,
}
