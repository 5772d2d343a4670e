//! # Guardian Directory
//!
//! Keeps the guardian set of every protected subject. A subject may replace
//! its whole set at any time; there is no incremental add/remove and no
//! one-time lock.
//!
//! The set is stored twice: an ordered, deduplicated list for enumeration
//! and one membership flag per guardian so `is_guardian` is a single lookup.
use soroban_sdk::{Address, Env, Vec};

use crate::errors::LedgerError;
use crate::events::{emit_guardians_updated, GuardiansUpdatedEvent};
use crate::storage::DataKey;

/// Replaces the guardian set of `subject`.
///
/// Duplicates in `guardians` are dropped, keeping first-seen order.
/// Membership flags of guardians missing from the new set are removed.
///
/// # Errors
/// - [`LedgerError::Unauthorized`] if `caller` is not `subject`.
pub fn set_guardians(
    env: &Env,
    caller: Address,
    subject: Address,
    guardians: Vec<Address>,
) -> Result<(), LedgerError> {
    if caller != subject {
        return Err(LedgerError::Unauthorized);
    }

    let mut unique: Vec<Address> = Vec::new(env);
    for guardian in guardians.iter() {
        if !unique.contains(&guardian) {
            unique.push_back(guardian);
        }
    }

    let storage = env.storage().persistent();
    for previous in get_guardians(env, &subject).iter() {
        storage.remove(&DataKey::Guardian(subject.clone(), previous));
    }
    for guardian in unique.iter() {
        storage.set(&DataKey::Guardian(subject.clone(), guardian), &true);
    }
    storage.set(&DataKey::GuardianList(subject.clone()), &unique);

    emit_guardians_updated(
        env,
        GuardiansUpdatedEvent {
            subject,
            guardian_count: unique.len(),
            timestamp: env.ledger().timestamp(),
        },
    );

    Ok(())
}

/// Returns true if `address` is currently a guardian of `subject`.
pub fn is_guardian(env: &Env, subject: &Address, address: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Guardian(subject.clone(), address.clone()))
        .unwrap_or(false)
}

/// Returns the guardians of `subject` (empty if never set).
pub fn get_guardians(env: &Env, subject: &Address) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::GuardianList(subject.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn guardian_count(env: &Env, subject: &Address) -> u32 {
    get_guardians(env, subject).len()
}
