//! # Guardian Ledger – Event Logging
//!
//! Every state change publishes one `#[contractevent]` struct. The macro
//! derives the snake_case struct name as the leading topic and packs the
//! fields into the data payload. Off-chain indexers follow a subject by
//! filtering on the `subject` field.
//!
//! `emit_*` helpers give each action a single call-site. Events carry only
//! publicly observable state.
use soroban_sdk::{contractevent, Address, Env};

use crate::types::{DecisionKey, ProposalValue};

// ─────────────────────────────────────────────────────────────────────────────
// Event structs
// ─────────────────────────────────────────────────────────────────────────────

/// Emitted when a subject replaces its guardian set.
///
/// # Fields
/// * `subject` – The protected account.
/// * `guardian_count` – Number of distinct guardians after the update.
/// * `timestamp` – Ledger timestamp of the update.
#[contractevent]
#[derive(Clone, Debug)]
pub struct GuardiansUpdatedEvent {
    pub subject: Address,
    pub guardian_count: u32,
    pub timestamp: u64,
}

/// Emitted for every accepted guardian vote, including repeats.
///
/// # Fields
/// * `subject` – The protected account.
/// * `key` – The tally the vote was cast in.
/// * `voter` – The guardian.
/// * `value` – The value voted for.
/// * `tally` – Distinct votes for `value` after this vote.
#[contractevent]
#[derive(Clone, Debug)]
pub struct VoteCastEvent {
    pub subject: Address,
    pub key: DecisionKey,
    pub voter: Address,
    pub value: ProposalValue,
    pub tally: u32,
}

/// Emitted when a tally reaches its threshold and the action is applied.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ProposalExecutedEvent {
    pub subject: Address,
    pub key: DecisionKey,
    pub value: ProposalValue,
    pub timestamp: u64,
}

/// Emitted once per subject when its ownership record is created.
#[contractevent]
#[derive(Clone, Debug)]
pub struct OwnerInitializedEvent {
    pub subject: Address,
    pub owner: Address,
    pub required_votes: u32,
}

/// Emitted when guardian consensus replaces the owner.
///
/// # Fields
/// * `subject` – The protected account.
/// * `previous_owner` – Owner before the change.
/// * `new_owner` – Owner after the change.
/// * `timestamp` – Ledger timestamp of the change.
#[contractevent]
#[derive(Clone, Debug)]
pub struct OwnerChangedEvent {
    pub subject: Address,
    pub previous_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

/// Emitted once per subject when its risk parameters are created.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RiskParamsInitializedEvent {
    pub subject: Address,
    pub default_limit: i128,
    pub time_window: u64,
    pub required_votes: u32,
}

/// Emitted when the default limit or a token limit changes.
///
/// # Fields
/// * `subject` – The protected account.
/// * `token` – The token whose override changed; `None` for the default limit.
/// * `limit` – The limit now in force for `token` (or the new default).
/// * `actor` – Owner for direct changes, deciding guardian for voted ones.
/// * `timestamp` – Ledger timestamp of the change.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RiskLimitChangedEvent {
    pub subject: Address,
    pub token: Option<Address>,
    pub limit: i128,
    pub actor: Address,
    pub timestamp: u64,
}

/// Emitted when the spend window length changes.
#[contractevent]
#[derive(Clone, Debug)]
pub struct TimeWindowChangedEvent {
    pub subject: Address,
    pub time_window: u64,
    pub actor: Address,
    pub timestamp: u64,
}

/// Emitted when an allowance entry is created.
#[contractevent]
#[derive(Clone, Debug)]
pub struct AllowanceAddedEvent {
    pub subject: Address,
    pub token: Address,
    pub id: u64,
    pub amount: i128,
    pub valid_from: u64,
}

/// Emitted when the owner cancels an allowance entry.
#[contractevent]
#[derive(Clone, Debug)]
pub struct AllowanceCancelledEvent {
    pub subject: Address,
    pub token: Address,
    pub id: u64,
    pub amount: i128,
}

/// Emitted for every accepted spend.
///
/// # Fields
/// * `subject` – The protected account.
/// * `token` – The token spent.
/// * `amount` – The spend amount.
/// * `window_total` – Bucket total after the spend.
/// * `from_allowance` – `true` when the amount was drawn from allowances.
/// * `timestamp` – Ledger timestamp of the spend.
#[contractevent]
#[derive(Clone, Debug)]
pub struct SpendRecordedEvent {
    pub subject: Address,
    pub token: Address,
    pub amount: i128,
    pub window_total: i128,
    pub from_allowance: bool,
    pub timestamp: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Emitter helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn emit_guardians_updated(e: &Env, event: GuardiansUpdatedEvent) {
    event.publish(e);
}

pub fn emit_vote_cast(e: &Env, event: VoteCastEvent) {
    event.publish(e);
}

/// Emit after the proposal has been cleared from storage.
pub fn emit_proposal_executed(e: &Env, event: ProposalExecutedEvent) {
    event.publish(e);
}

pub fn emit_owner_initialized(e: &Env, event: OwnerInitializedEvent) {
    event.publish(e);
}

pub fn emit_owner_changed(e: &Env, event: OwnerChangedEvent) {
    event.publish(e);
}

pub fn emit_risk_params_initialized(e: &Env, event: RiskParamsInitializedEvent) {
    event.publish(e);
}

/// Emit after the new limit has been written to storage.
pub fn emit_risk_limit_changed(e: &Env, event: RiskLimitChangedEvent) {
    event.publish(e);
}

pub fn emit_time_window_changed(e: &Env, event: TimeWindowChangedEvent) {
    event.publish(e);
}

pub fn emit_allowance_added(e: &Env, event: AllowanceAddedEvent) {
    event.publish(e);
}

pub fn emit_allowance_cancelled(e: &Env, event: AllowanceCancelledEvent) {
    event.publish(e);
}

/// Emit after the spend window has been committed.
pub fn emit_spend_recorded(e: &Env, event: SpendRecordedEvent) {
    event.publish(e);
}
