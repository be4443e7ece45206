//! # Application ledger
//!
//! Owns every scholarship's ordered applications and drives them through
//! the status machine in [`crate::types::ApplicationStatus`]. Each transition
//! checks its preconditions in a fixed order (role, existence, status,
//! capacity) and writes nothing until all of them hold.

use soroban_sdk::{Address, Env, String, Vec};

use crate::escrow;
use crate::events::{self, ApplicationPaid, ApplicationReviewed, ApplicationSubmitted};
use crate::rbac;
use crate::storage;
use crate::types::{Application, ApplicationStatus};
use crate::Error;

fn load(env: &Env, scholarship_id: u64, index: u32) -> Result<Application, Error> {
    if storage::load_scholarship_config(env, scholarship_id).is_none() {
        return Err(Error::ScholarshipNotFound);
    }
    storage::load_application(env, scholarship_id, index).ok_or(Error::ApplicationNotFound)
}

fn advance(application: &mut Application, next: ApplicationStatus) -> Result<(), Error> {
    if !application.status.can_transition_to(next) {
        return Err(Error::InvalidStateTransition);
    }
    application.status = next;
    Ok(())
}

/// Open a new application. Slots are not checked here: capacity only
/// becomes binding at approval and payment.
pub fn submit(
    env: &Env,
    applicant: Address,
    scholarship_id: u64,
    candidate_id: String,
    evidence: String,
) -> Result<Application, Error> {
    applicant.require_auth();

    let config =
        storage::load_scholarship_config(env, scholarship_id).ok_or(Error::ScholarshipNotFound)?;
    let mut state =
        storage::load_scholarship_state(env, scholarship_id).ok_or(Error::ScholarshipNotFound)?;

    let now = env.ledger().timestamp();
    if now >= config.deadline {
        return Err(Error::DeadlinePassed);
    }
    if storage::has_applied(env, scholarship_id, &applicant) {
        return Err(Error::AlreadyApplied);
    }

    let application = Application {
        scholarship_id,
        index: state.total_applications,
        applicant: applicant.clone(),
        candidate_id,
        evidence,
        submitted_at: now,
        status: ApplicationStatus::Submitted,
    };
    state.total_applications += 1;

    storage::save_application(env, &application);
    storage::set_applicant_index(env, scholarship_id, &applicant, application.index);
    storage::save_scholarship_state(env, scholarship_id, &state);

    events::publish_application_submitted(
        env,
        ApplicationSubmitted {
            scholarship_id,
            index: application.index,
            applicant,
        },
    );

    Ok(application)
}

/// First-line review by a verifier (or the administrator).
pub fn verify(
    env: &Env,
    reviewer: Address,
    scholarship_id: u64,
    index: u32,
    accept: bool,
) -> Result<Application, Error> {
    reviewer.require_auth();
    rbac::require_reviewer(env, &reviewer)?;

    let mut application = load(env, scholarship_id, index)?;
    let next = if accept {
        ApplicationStatus::Verified
    } else {
        ApplicationStatus::Rejected
    };
    advance(&mut application, next)?;
    storage::save_application(env, &application);

    events::publish_application_reviewed(
        env,
        ApplicationReviewed {
            scholarship_id,
            index,
            reviewer,
            status: next,
        },
    );

    Ok(application)
}

pub fn approve(
    env: &Env,
    caller: Address,
    scholarship_id: u64,
    index: u32,
) -> Result<Application, Error> {
    caller.require_auth();
    rbac::require_admin(env, &caller)?;

    let mut application = load(env, scholarship_id, index)?;
    advance(&mut application, ApplicationStatus::Approved)?;

    let scholarship = crate::registry::get(env, scholarship_id)?;
    // A withdrawn reserve can no longer fund any slot.
    if scholarship.reclaimed || scholarship.filled_slots >= scholarship.total_slots {
        return Err(Error::SlotsExhausted);
    }

    storage::save_application(env, &application);

    events::publish_application_reviewed(
        env,
        ApplicationReviewed {
            scholarship_id,
            index,
            reviewer: caller,
            status: ApplicationStatus::Approved,
        },
    );

    Ok(application)
}

/// Release one slot's worth of escrow to the applicant.
///
/// Capacity is re-checked in the same invocation that consumes the slot,
/// so two payments racing for the last slot cannot both commit.
pub fn pay(env: &Env, caller: Address, scholarship_id: u64, index: u32) -> Result<Application, Error> {
    caller.require_auth();
    rbac::require_admin(env, &caller)?;

    let mut application = load(env, scholarship_id, index)?;
    advance(&mut application, ApplicationStatus::Paid)?;

    let config =
        storage::load_scholarship_config(env, scholarship_id).ok_or(Error::ScholarshipNotFound)?;
    let mut state =
        storage::load_scholarship_state(env, scholarship_id).ok_or(Error::ScholarshipNotFound)?;
    if state.filled_slots >= config.total_slots {
        return Err(Error::SlotsExhausted);
    }

    escrow::release(env, scholarship_id, config.amount_per_slot, &application.applicant)?;

    state.filled_slots += 1;
    storage::save_scholarship_state(env, scholarship_id, &state);
    storage::save_application(env, &application);

    events::publish_application_paid(
        env,
        ApplicationPaid {
            scholarship_id,
            index,
            applicant: application.applicant.clone(),
            amount: config.amount_per_slot,
        },
    );

    Ok(application)
}

pub fn get(env: &Env, scholarship_id: u64, index: u32) -> Result<Application, Error> {
    load(env, scholarship_id, index)
}

/// Applications of one scholarship in submission order.
pub fn list(env: &Env, scholarship_id: u64) -> Result<Vec<Application>, Error> {
    let state =
        storage::load_scholarship_state(env, scholarship_id).ok_or(Error::ScholarshipNotFound)?;
    let mut out = Vec::new(env);
    for index in 0..state.total_applications {
        if let Some(application) = storage::load_application(env, scholarship_id, index) {
            out.push_back(application);
        }
    }
    Ok(out)
}
