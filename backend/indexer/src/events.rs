//! Event types emitted by the scholarship manager contract, as seen by the
//! indexer.
//!
//! These mirror `contracts/scholarship_manager/src/events.rs`: the first
//! topic is a short symbol naming the change, the second is the scholarship
//! id (or the verifier address for role changes).

use serde::{Deserialize, Serialize};

/// All recognised event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `created` — scholarship funded and registered.
    ScholarshipCreated,
    /// `applied` — candidate submitted an application.
    ApplicationSubmitted,
    /// `verified` — verifier accepted an application.
    ApplicationVerified,
    /// `rejected` — verifier turned an application down.
    ApplicationRejected,
    /// `approved` — administrator approved a verified application.
    ApplicationApproved,
    /// `paid` — escrow released one slot to the applicant.
    ApplicationPaid,
    /// `withdrawn` — unused reserve returned to the creator.
    RemainderWithdrawn,
    /// `vfy_add` — school whitelisted.
    VerifierAdded,
    /// `vfy_del` — school removed from the whitelist.
    VerifierRemoved,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ScholarshipCreated,
            "applied" => Self::ApplicationSubmitted,
            "verified" => Self::ApplicationVerified,
            "rejected" => Self::ApplicationRejected,
            "approved" => Self::ApplicationApproved,
            "paid" => Self::ApplicationPaid,
            "withdrawn" => Self::RemainderWithdrawn,
            "vfy_add" => Self::VerifierAdded,
            "vfy_del" => Self::VerifierRemoved,
            _ => Self::Unknown,
        }
    }

    /// Inverse of [`EventKind::as_str`], used by the database layer.
    pub fn from_str_name(name: &str) -> Self {
        match name {
            "scholarship_created" => Self::ScholarshipCreated,
            "application_submitted" => Self::ApplicationSubmitted,
            "application_verified" => Self::ApplicationVerified,
            "application_rejected" => Self::ApplicationRejected,
            "application_approved" => Self::ApplicationApproved,
            "application_paid" => Self::ApplicationPaid,
            "remainder_withdrawn" => Self::RemainderWithdrawn,
            "verifier_added" => Self::VerifierAdded,
            "verifier_removed" => Self::VerifierRemoved,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScholarshipCreated => "scholarship_created",
            Self::ApplicationSubmitted => "application_submitted",
            Self::ApplicationVerified => "application_verified",
            Self::ApplicationRejected => "application_rejected",
            Self::ApplicationApproved => "application_approved",
            Self::ApplicationPaid => "application_paid",
            Self::RemainderWithdrawn => "remainder_withdrawn",
            Self::VerifierAdded => "verifier_added",
            Self::VerifierRemoved => "verifier_removed",
            Self::Unknown => "unknown",
        }
    }

    /// Application status an event leaves its application in, if any.
    pub fn application_status(&self) -> Option<&'static str> {
        match self {
            Self::ApplicationSubmitted => Some("submitted"),
            Self::ApplicationVerified => Some("verified"),
            Self::ApplicationRejected => Some("rejected"),
            Self::ApplicationApproved => Some("approved"),
            Self::ApplicationPaid => Some("paid"),
            _ => None,
        }
    }

    /// Whether the second topic is a scholarship id (as opposed to an address).
    pub fn keyed_by_scholarship(&self) -> bool {
        !matches!(
            self,
            Self::VerifierAdded | Self::VerifierRemoved | Self::Unknown
        )
    }
}

/// A decoded contract event, ready to be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarshipEvent {
    pub event_type: String,
    pub scholarship_id: Option<String>,
    pub application_index: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

impl ScholarshipEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from_str_name(&self.event_type)
    }
}

/// An event row as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub scholarship_id: Option<String>,
    pub application_index: Option<i64>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Projection row: the latest status seen for one application.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub scholarship_id: String,
    pub application_index: i64,
    pub applicant: Option<String>,
    pub status: String,
    pub updated_ledger: i64,
}
