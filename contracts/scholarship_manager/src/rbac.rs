//! # Access control
//!
//! Two roles exist:
//!
//! | Role          | Holder                             | May                                          |
//! |---------------|------------------------------------|----------------------------------------------|
//! | Administrator | exactly one address, set by `init` | create, approve, pay, withdraw, manage roles |
//! | Verifier      | any number of whitelisted schools  | verify or reject submitted applications      |
//!
//! The administrator may also verify. Membership is re-read from storage on
//! every call; nothing here trusts a role claimed by the caller.

use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::events;
use crate::storage;
use crate::Error;

/// Record the administrator. Fails if one is already set.
pub fn init_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    if storage::has_admin(env) {
        return Err(Error::AlreadyInitialized);
    }
    storage::set_admin(env, admin);
    Ok(())
}

pub fn admin(env: &Env) -> Result<Address, Error> {
    storage::get_admin(env).ok_or(Error::NotInitialized)
}

pub fn is_admin(env: &Env, address: &Address) -> bool {
    storage::get_admin(env).is_some_and(|admin| &admin == address)
}

pub fn is_verifier(env: &Env, address: &Address) -> bool {
    position_of(&storage::get_verifiers(env), address).is_some()
}

fn position_of(verifiers: &Vec<Address>, address: &Address) -> Option<u32> {
    let mut position = 0u32;
    for v in verifiers.iter() {
        if &v == address {
            return Some(position);
        }
        position += 1;
    }
    None
}

/// Fails with `Unauthorized` unless `caller` is the administrator.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    let admin = admin(env)?;
    if &admin != caller {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Fails with `Unauthorized` unless `caller` may review applications.
pub fn require_reviewer(env: &Env, caller: &Address) -> Result<(), Error> {
    let admin = admin(env)?;
    if &admin == caller || is_verifier(env, caller) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

/// Whitelist `verifier`. Adding an existing verifier is a no-op.
pub fn add_verifier(env: &Env, caller: &Address, verifier: &Address) -> Result<(), Error> {
    caller.require_auth();
    require_admin(env, caller)?;

    if verifier == &env.current_contract_address() {
        return Err(Error::InvalidIdentity);
    }

    let mut verifiers = storage::get_verifiers(env);
    if position_of(&verifiers, verifier).is_some() {
        return Ok(());
    }
    verifiers.push_back(verifier.clone());
    storage::set_verifiers(env, &verifiers);

    events::publish_verifier_changed(env, symbol_short!("vfy_add"), verifier, caller);
    Ok(())
}

/// Drop `verifier` from the whitelist. Removing a non-member is a no-op.
pub fn remove_verifier(env: &Env, caller: &Address, verifier: &Address) -> Result<(), Error> {
    caller.require_auth();
    require_admin(env, caller)?;

    let mut verifiers = storage::get_verifiers(env);
    let Some(position) = position_of(&verifiers, verifier) else {
        return Ok(());
    };
    verifiers.remove(position);
    storage::set_verifiers(env, &verifiers);

    events::publish_verifier_changed(env, symbol_short!("vfy_del"), verifier, caller);
    Ok(())
}

pub fn list_verifiers(env: &Env) -> Vec<Address> {
    storage::get_verifiers(env)
}
