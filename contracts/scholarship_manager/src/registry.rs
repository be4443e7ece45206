//! # Scholarship registry
//!
//! Creation, lookup and remainder withdrawal for scholarships. Creation and
//! the escrow reservation happen in one invocation: the reserve is taken
//! before the record is written, and a failed transfer aborts both.

use soroban_sdk::{Address, Env, String, Vec};

use crate::escrow;
use crate::events::{self, RemainderWithdrawn, ScholarshipCreated};
use crate::rbac;
use crate::storage;
use crate::types::Scholarship;
use crate::Error;

pub fn create(
    env: &Env,
    creator: Address,
    title: String,
    description: String,
    amount_per_slot: i128,
    total_slots: u32,
    deadline: u64,
) -> Result<Scholarship, Error> {
    creator.require_auth();
    rbac::require_admin(env, &creator)?;

    if amount_per_slot < 0 {
        return Err(Error::InvalidAmount);
    }
    if total_slots == 0 {
        return Err(Error::InvalidSlotCount);
    }
    if deadline <= env.ledger().timestamp() {
        return Err(Error::DeadlinePassed);
    }
    let total = amount_per_slot
        .checked_mul(total_slots as i128)
        .ok_or(Error::InvalidAmount)?;

    let id = storage::get_scholarship_count(env);
    escrow::reserve(env, id, &creator, total)?;
    storage::get_and_increment_scholarship_id(env);

    let scholarship = Scholarship {
        id,
        creator: creator.clone(),
        title,
        description,
        amount_per_slot,
        total_slots,
        filled_slots: 0,
        deadline,
        total_applications: 0,
        reclaimed: false,
    };
    storage::save_scholarship(env, &scholarship);

    events::publish_scholarship_created(
        env,
        ScholarshipCreated {
            scholarship_id: id,
            creator,
            amount_per_slot,
            total_slots,
            deadline,
        },
    );

    Ok(scholarship)
}

pub fn get(env: &Env, id: u64) -> Result<Scholarship, Error> {
    storage::load_scholarship(env, id).ok_or(Error::ScholarshipNotFound)
}

/// All scholarships, newest first.
pub fn list(env: &Env) -> Vec<Scholarship> {
    let mut out = Vec::new(env);
    let mut id = storage::get_scholarship_count(env);
    while id > 0 {
        id -= 1;
        if let Some(scholarship) = storage::load_scholarship(env, id) {
            out.push_back(scholarship);
        }
    }
    out
}

/// Return the unspent reserve of scholarship `id` to its creator.
///
/// Returns the amount transferred; 0 when every slot was paid or the
/// remainder was already withdrawn.
pub fn withdraw_remainder(env: &Env, caller: Address, id: u64) -> Result<i128, Error> {
    caller.require_auth();
    rbac::require_admin(env, &caller)?;

    let config = storage::load_scholarship_config(env, id).ok_or(Error::ScholarshipNotFound)?;
    let mut state = storage::load_scholarship_state(env, id).ok_or(Error::ScholarshipNotFound)?;

    if caller != config.creator {
        return Err(Error::Unauthorized);
    }
    if env.ledger().timestamp() < config.deadline {
        return Err(Error::DeadlineNotReached);
    }
    if state.reclaimed || state.filled_slots >= config.total_slots {
        return Ok(0);
    }

    let amount = escrow::reclaim(env, id, &config.creator)?;
    state.reclaimed = true;
    storage::save_scholarship_state(env, id, &state);

    events::publish_remainder_withdrawn(
        env,
        RemainderWithdrawn {
            scholarship_id: id,
            recipient: config.creator,
            amount,
        },
    );

    Ok(amount)
}
