//! # Fund escrow
//!
//! Custodies the token value behind each scholarship. The contract's own
//! address holds the tokens; [`EscrowAccount`] attributes them to a
//! scholarship so one scholarship can never spend another's reserve.
//!
//! Token movements go through the SEP-41 client configured at `init`. A
//! failing transfer traps the whole invocation, so a ledger write made in
//! the same call can never outlive a transfer that did not happen.

use soroban_sdk::{token, Address, Env};

use crate::storage;
use crate::types::EscrowAccount;
use crate::Error;

fn token_client(env: &Env) -> Result<token::Client<'_>, Error> {
    let token = storage::get_token(env).ok_or(Error::NotInitialized)?;
    Ok(token::Client::new(env, &token))
}

/// Pull `amount` from `from` into the contract and open the account for
/// scholarship `id`.
pub fn reserve(env: &Env, id: u64, from: &Address, amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }

    if amount > 0 {
        let client = token_client(env)?;
        if client.balance(from) < amount {
            return Err(Error::InsufficientFunds);
        }
        client.transfer(from, &env.current_contract_address(), &amount);
    }

    storage::save_escrow(
        env,
        id,
        &EscrowAccount {
            balance: amount,
            reclaimed: false,
        },
    );
    Ok(())
}

/// Pay `amount` out of scholarship `id`'s reserve to `recipient`.
///
/// Only called from the administrator-gated payment path in the ledger.
pub(crate) fn release(env: &Env, id: u64, amount: i128, recipient: &Address) -> Result<(), Error> {
    let mut account = storage::load_escrow(env, id).ok_or(Error::ScholarshipNotFound)?;
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    if amount > account.balance {
        return Err(Error::InsufficientReserve);
    }

    account.balance -= amount;
    storage::save_escrow(env, id, &account);

    if amount > 0 {
        token_client(env)?.transfer(&env.current_contract_address(), recipient, &amount);
    }
    Ok(())
}

/// Return whatever is left of scholarship `id`'s reserve to `recipient`.
///
/// Returns the amount moved. Empty or already reclaimed accounts yield 0.
pub(crate) fn reclaim(env: &Env, id: u64, recipient: &Address) -> Result<i128, Error> {
    let mut account = storage::load_escrow(env, id).ok_or(Error::ScholarshipNotFound)?;
    if account.reclaimed {
        return Ok(0);
    }

    let amount = account.balance;
    account.balance = 0;
    account.reclaimed = true;
    storage::save_escrow(env, id, &account);

    if amount > 0 {
        token_client(env)?.transfer(&env.current_contract_address(), recipient, &amount);
    }
    Ok(amount)
}

/// Value still held for scholarship `id`.
pub fn reserve_of(env: &Env, id: u64) -> Result<i128, Error> {
    storage::load_escrow(env, id)
        .map(|account| account.balance)
        .ok_or(Error::ScholarshipNotFound)
}
