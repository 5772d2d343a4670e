//! # Allowances
//!
//! One-off spend budgets that sit beside the windowed limit of a token.
//! An allowance is created either by the owner with a delay of at least one
//! time window, or immediately by guardian consensus (break-glass).
//!
//! Entries are kept in id order and never deleted. Cancelling marks an entry
//! inactive; spending reduces its residual amount.
use soroban_sdk::{Address, Env, Vec};

use crate::consensus::{cast_vote, VoteOutcome};
use crate::errors::LedgerError;
use crate::events::{
    emit_allowance_added, emit_allowance_cancelled, AllowanceAddedEvent, AllowanceCancelledEvent,
};
use crate::ownership::require_account_owner;
use crate::risk::{load_risk_params, require_non_negative};
use crate::storage::DataKey;
use crate::types::{Allowance, DecisionKey, ProposalValue};

/// All allowance entries of `(subject, token)`, oldest first.
pub fn get_allowances(env: &Env, subject: &Address, token: &Address) -> Vec<Allowance> {
    env.storage()
        .persistent()
        .get(&DataKey::Allowances(subject.clone(), token.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn save_allowances(env: &Env, subject: &Address, token: &Address, entries: &Vec<Allowance>) {
    env.storage()
        .persistent()
        .set(&DataKey::Allowances(subject.clone(), token.clone()), entries);
}

/// Id of the most recently created allowance, `0` if none was ever created.
pub fn last_allowance_id(env: &Env, subject: &Address, token: &Address) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::AllowanceCounter(subject.clone(), token.clone()))
        .unwrap_or(0)
}

/// Appends a new active entry and returns its id.
///
/// # Errors
/// - [`LedgerError::Overflow`] if the id counter is exhausted.
pub fn add_allowance(
    env: &Env,
    subject: &Address,
    token: &Address,
    amount: i128,
    valid_from: u64,
) -> Result<u64, LedgerError> {
    let id = last_allowance_id(env, subject, token)
        .checked_add(1)
        .ok_or(LedgerError::Overflow)?;

    let mut entries = get_allowances(env, subject, token);
    entries.push_back(Allowance {
        id,
        amount,
        valid_from,
        active: true,
    });
    save_allowances(env, subject, token, &entries);
    env.storage()
        .persistent()
        .set(&DataKey::AllowanceCounter(subject.clone(), token.clone()), &id);

    emit_allowance_added(
        env,
        AllowanceAddedEvent {
            subject: subject.clone(),
            token: token.clone(),
            id,
            amount,
            valid_from,
        },
    );
    Ok(id)
}

/// Owner-scheduled allowance that becomes usable at `valid_from`.
///
/// # Errors
/// - [`LedgerError::Unauthorized`] if `caller` is not the owner.
/// - [`LedgerError::DelayTooShort`] unless `valid_from` is at least one time
///   window after now.
pub fn allow_time_delayed_tx(
    env: &Env,
    subject: Address,
    caller: Address,
    token: Address,
    amount: i128,
    valid_from: u64,
) -> Result<u64, LedgerError> {
    require_non_negative(amount)?;
    let params = load_risk_params(env, &subject)?;
    require_account_owner(env, &subject, &caller)?;

    let earliest = env.ledger().timestamp().saturating_add(params.time_window);
    if valid_from < earliest {
        return Err(LedgerError::DelayTooShort);
    }
    add_allowance(env, &subject, &token, amount, valid_from)
}

/// Guardian vote for an allowance of `amount` usable immediately.
///
/// Returns the pending tally, or `0` once the allowance has been created.
pub fn vote_spend_allowance(
    env: &Env,
    subject: Address,
    voter: Address,
    token: Address,
    amount: i128,
) -> Result<u32, LedgerError> {
    require_non_negative(amount)?;
    let params = load_risk_params(env, &subject)?;
    match cast_vote(
        env,
        &subject,
        DecisionKey::SpendAllowance(token.clone()),
        &voter,
        ProposalValue::Amount(amount),
        params.required_votes,
    )? {
        VoteOutcome::Pending(tally) => Ok(tally),
        VoteOutcome::Execute(_) => {
            add_allowance(env, &subject, &token, amount, env.ledger().timestamp())?;
            Ok(0)
        }
    }
}

/// Deactivates allowance `id`. Cancelling only restricts, so it is immediate.
///
/// # Errors
/// - [`LedgerError::Unauthorized`] if `caller` is not the owner.
/// - [`LedgerError::AllowanceNotFound`] if no active entry has that id.
pub fn cancel_allowance(
    env: &Env,
    subject: Address,
    caller: Address,
    token: Address,
    id: u64,
) -> Result<(), LedgerError> {
    require_account_owner(env, &subject, &caller)?;

    let mut entries = get_allowances(env, &subject, &token);
    let mut cancelled = None;
    for i in 0..entries.len() {
        if let Some(mut entry) = entries.get(i) {
            if entry.id == id && entry.active {
                entry.active = false;
                cancelled = Some(entry.amount);
                entries.set(i, entry);
                break;
            }
        }
    }
    let amount = cancelled.ok_or(LedgerError::AllowanceNotFound)?;
    save_allowances(env, &subject, &token, &entries);

    emit_allowance_cancelled(
        env,
        AllowanceCancelledEvent {
            subject,
            token,
            id,
            amount,
        },
    );
    Ok(())
}

fn is_usable(entry: &Allowance, now: u64) -> bool {
    entry.active && entry.valid_from <= now && entry.amount > 0
}

/// Sum of active entries whose `valid_from` has passed.
pub fn allowance_available(env: &Env, subject: &Address, token: &Address) -> i128 {
    let now = env.ledger().timestamp();
    get_allowances(env, subject, token)
        .iter()
        .filter(|entry| is_usable(entry, now))
        .fold(0i128, |sum, entry| sum.saturating_add(entry.amount))
}

/// Deducts `amount` from usable entries, oldest first.
///
/// The caller has already checked that `allowance_available` covers `amount`.
pub(crate) fn consume_allowance(env: &Env, subject: &Address, token: &Address, amount: i128) {
    let now = env.ledger().timestamp();
    let mut entries = get_allowances(env, subject, token);
    let mut remaining = amount;

    for i in 0..entries.len() {
        if remaining == 0 {
            break;
        }
        if let Some(mut entry) = entries.get(i) {
            if !is_usable(&entry, now) {
                continue;
            }
            let taken = entry.amount.min(remaining);
            entry.amount -= taken;
            remaining -= taken;
            entries.set(i, entry);
        }
    }
    save_allowances(env, subject, token, &entries);
}
