//! # Ownership Ledger
//!
//! One-time owner and display name per subject. After initialization the
//! owner can only be replaced by guardian consensus; the display name never
//! changes.
//!
//! A subject with no guardians can never change owner: every vote is
//! rejected as unauthorized. Integrators that need recovery must register
//! guardians before relying on it.
use soroban_sdk::{Address, Env, String};

use crate::consensus::{cast_vote, pending_votes, VoteOutcome};
use crate::errors::LedgerError;
use crate::events::{
    emit_owner_changed, emit_owner_initialized, OwnerChangedEvent, OwnerInitializedEvent,
};
use crate::storage::DataKey;
use crate::types::{DecisionKey, OwnershipRecord, ProposalValue};

/// Creates the ownership record of `subject`.
///
/// # Errors
/// - [`LedgerError::AlreadyInitialized`] if a record already exists.
pub fn initialize_owner(
    env: &Env,
    subject: Address,
    owner: Address,
    required_votes: u32,
    display_name: String,
) -> Result<(), LedgerError> {
    let key = DataKey::Ownership(subject.clone());
    if env.storage().persistent().has(&key) {
        return Err(LedgerError::AlreadyInitialized);
    }

    let record = OwnershipRecord {
        owner: owner.clone(),
        display_name,
        required_votes,
    };
    env.storage().persistent().set(&key, &record);

    emit_owner_initialized(
        env,
        OwnerInitializedEvent {
            subject,
            owner,
            required_votes,
        },
    );
    Ok(())
}

/// Casts a guardian vote to make `candidate` the owner of `subject`.
///
/// Returns the pending tally after the vote, or `0` once the owner has been
/// replaced.
///
/// # Errors
/// - [`LedgerError::NotInitialized`] if the subject has no ownership record.
/// - [`LedgerError::Unauthorized`] if `voter` is not a guardian.
pub fn vote_for_new_owner(
    env: &Env,
    subject: Address,
    voter: Address,
    candidate: Address,
) -> Result<u32, LedgerError> {
    let mut record = get_ownership(env, &subject).ok_or(LedgerError::NotInitialized)?;

    match cast_vote(
        env,
        &subject,
        DecisionKey::NewOwner,
        &voter,
        ProposalValue::Owner(candidate.clone()),
        record.required_votes,
    )? {
        VoteOutcome::Pending(tally) => Ok(tally),
        VoteOutcome::Execute(_) => {
            let previous_owner = record.owner;
            record.owner = candidate.clone();
            env.storage()
                .persistent()
                .set(&DataKey::Ownership(subject.clone()), &record);

            emit_owner_changed(
                env,
                OwnerChangedEvent {
                    subject,
                    previous_owner,
                    new_owner: candidate,
                    timestamp: env.ledger().timestamp(),
                },
            );
            Ok(0)
        }
    }
}

pub fn get_ownership(env: &Env, subject: &Address) -> Option<OwnershipRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Ownership(subject.clone()))
}

pub fn owner(env: &Env, subject: &Address) -> Result<Address, LedgerError> {
    get_ownership(env, subject)
        .map(|record| record.owner)
        .ok_or(LedgerError::NotInitialized)
}

pub fn display_name(env: &Env, subject: &Address) -> Result<String, LedgerError> {
    get_ownership(env, subject)
        .map(|record| record.display_name)
        .ok_or(LedgerError::NotInitialized)
}

pub fn owner_required_votes(env: &Env, subject: &Address) -> Result<u32, LedgerError> {
    get_ownership(env, subject)
        .map(|record| record.required_votes)
        .ok_or(LedgerError::NotInitialized)
}

/// Votes recorded for the currently proposed owner.
pub fn owner_vote_count(env: &Env, subject: &Address) -> u32 {
    pending_votes(env, subject, DecisionKey::NewOwner)
}

/// Address allowed to take owner-direct risk actions for `subject`.
///
/// This is the recorded owner, or the subject itself when it has no
/// ownership record (a self-governed account acting on its own behalf).
pub fn account_owner(env: &Env, subject: &Address) -> Address {
    get_ownership(env, subject)
        .map(|record| record.owner)
        .unwrap_or_else(|| subject.clone())
}

/// Require that `caller` is the account owner of `subject`.
pub fn require_account_owner(
    env: &Env,
    subject: &Address,
    caller: &Address,
) -> Result<(), LedgerError> {
    if account_owner(env, subject) != *caller {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}
