//! # Consensus Coordinator
//!
//! One N-of-M vote state machine shared by every guardian decision. Each
//! tally is keyed by `(subject, DecisionKey)` and holds a single pending
//! value plus the guardians who voted for exactly that value.
//!
//! ## Rules
//! 1. Only current guardians of the subject may vote.
//! 2. A vote for a different value than the pending one restarts the tally
//!    with just that voter.
//! 3. A repeat vote by the same guardian for the same value changes nothing.
//! 4. When the tally reaches the threshold the proposal is cleared and the
//!    caller applies the value.
//!
//! A threshold of `0` turns the voting path off: votes are kept as pending
//! but never execute, and owner-direct paths apply instead.
use soroban_sdk::{Address, Env, Vec};

use crate::errors::LedgerError;
use crate::events::{
    emit_proposal_executed, emit_vote_cast, ProposalExecutedEvent, VoteCastEvent,
};
use crate::guardians::is_guardian;
use crate::storage::DataKey;
use crate::types::{DecisionKey, Proposal, ProposalValue};

/// Result of an accepted vote.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VoteOutcome {
    /// Threshold not reached; carries the current tally.
    Pending(u32),
    /// Threshold reached; the value must now be applied.
    Execute(ProposalValue),
}

/// Records `voter`'s vote for `value` in the `key` tally of `subject`.
///
/// Voters recorded before a guardian-set replacement who are no longer
/// guardians are dropped from the tally before counting.
///
/// # Errors
/// - [`LedgerError::Unauthorized`] if `voter` is not a guardian of `subject`.
pub fn cast_vote(
    env: &Env,
    subject: &Address,
    key: DecisionKey,
    voter: &Address,
    value: ProposalValue,
    required_votes: u32,
) -> Result<VoteOutcome, LedgerError> {
    if !is_guardian(env, subject, voter) {
        return Err(LedgerError::Unauthorized);
    }

    let storage_key = DataKey::Proposal(subject.clone(), key.clone());
    let pending: Option<Proposal> = env.storage().persistent().get(&storage_key);

    let mut voters = match pending {
        Some(proposal) if proposal.value == value => {
            current_guardians_only(env, subject, proposal.voters)
        }
        _ => Vec::new(env),
    };
    if !voters.contains(voter) {
        voters.push_back(voter.clone());
    }
    let tally = voters.len();

    emit_vote_cast(
        env,
        VoteCastEvent {
            subject: subject.clone(),
            key: key.clone(),
            voter: voter.clone(),
            value: value.clone(),
            tally,
        },
    );

    if required_votes > 0 && tally >= required_votes {
        env.storage().persistent().remove(&storage_key);
        emit_proposal_executed(
            env,
            ProposalExecutedEvent {
                subject: subject.clone(),
                key,
                value: value.clone(),
                timestamp: env.ledger().timestamp(),
            },
        );
        return Ok(VoteOutcome::Execute(value));
    }

    env.storage()
        .persistent()
        .set(&storage_key, &Proposal { value, voters });
    Ok(VoteOutcome::Pending(tally))
}

fn current_guardians_only(env: &Env, subject: &Address, voters: Vec<Address>) -> Vec<Address> {
    let mut kept = Vec::new(env);
    for voter in voters.iter() {
        if is_guardian(env, subject, &voter) {
            kept.push_back(voter);
        }
    }
    kept
}

/// Returns the pending proposal for `key`, if any.
pub fn pending_proposal(env: &Env, subject: &Address, key: DecisionKey) -> Option<Proposal> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(subject.clone(), key))
}

/// Number of votes recorded for the pending value of `key` (0 if none).
pub fn pending_votes(env: &Env, subject: &Address, key: DecisionKey) -> u32 {
    pending_proposal(env, subject, key)
        .map(|proposal| proposal.voters.len())
        .unwrap_or(0)
}
