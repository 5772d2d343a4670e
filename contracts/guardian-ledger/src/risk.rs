//! # Risk Limits
//!
//! Per-subject spend limits and window length, governed asymmetrically:
//!
//! | Change                         | Direction | Who                                   |
//! |--------------------------------|-----------|---------------------------------------|
//! | lower default / token limit    | tighten   | owner, immediately                    |
//! | longer time window             | tighten   | owner, immediately                    |
//! | raise default / token limit    | relax     | guardian vote, or owner if 0 votes    |
//! | shorter time window            | relax     | guardian vote, or owner if 0 votes    |
//!
//! When `required_votes > 0` a direct relaxation is refused with
//! [`LedgerError::ConsensusRequired`] whoever the caller is.
use soroban_sdk::{Address, Env};

use crate::consensus::{cast_vote, VoteOutcome};
use crate::errors::LedgerError;
use crate::events::{
    emit_risk_limit_changed, emit_risk_params_initialized, emit_time_window_changed,
    RiskLimitChangedEvent, RiskParamsInitializedEvent, TimeWindowChangedEvent,
};
use crate::ownership::require_account_owner;
use crate::storage::DataKey;
use crate::types::{DecisionKey, ProposalValue, RiskParams};

/// Which way a constraint moves when it becomes stricter.
#[derive(Clone, Copy)]
enum Stricter {
    /// Limits: a lower value lets less through.
    Lower,
    /// Windows: a longer window aggregates more spend.
    Higher,
}

impl Stricter {
    fn tightens<T: PartialOrd>(self, current: T, proposed: T) -> bool {
        match self {
            Stricter::Lower => proposed < current,
            Stricter::Higher => proposed > current,
        }
    }
}

/// Owner-direct tightening: caller must be the owner and the move must be strict.
fn require_restriction<T: PartialOrd>(
    env: &Env,
    subject: &Address,
    caller: &Address,
    stricter: Stricter,
    current: T,
    proposed: T,
) -> Result<(), LedgerError> {
    require_account_owner(env, subject, caller)?;
    if !stricter.tightens(current, proposed) {
        return Err(LedgerError::InvalidDirection);
    }
    Ok(())
}

/// Owner-direct relaxation, only possible while guardian voting is off.
/// The move must strictly loosen the constraint.
fn require_relaxation<T: PartialOrd>(
    env: &Env,
    subject: &Address,
    caller: &Address,
    params: &RiskParams,
    stricter: Stricter,
    current: T,
    proposed: T,
) -> Result<(), LedgerError> {
    if params.required_votes > 0 {
        return Err(LedgerError::ConsensusRequired);
    }
    require_account_owner(env, subject, caller)?;
    if !stricter.tightens(proposed, current) {
        return Err(LedgerError::InvalidDirection);
    }
    Ok(())
}

pub(crate) fn require_non_negative(amount: i128) -> Result<(), LedgerError> {
    if amount < 0 {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

// ============================================================================
// Parameters
// ============================================================================

/// Creates the risk parameters of `subject`.
///
/// # Errors
/// - [`LedgerError::AlreadyInitialized`] if parameters already exist.
/// - [`LedgerError::InvalidAmount`] if `default_limit` is negative.
pub fn initialize_risk_params(
    env: &Env,
    subject: Address,
    time_window: u64,
    default_limit: i128,
    required_votes: u32,
) -> Result<(), LedgerError> {
    let key = DataKey::RiskParams(subject.clone());
    if env.storage().persistent().has(&key) {
        return Err(LedgerError::AlreadyInitialized);
    }
    require_non_negative(default_limit)?;

    let params = RiskParams {
        default_limit,
        time_window,
        required_votes,
    };
    env.storage().persistent().set(&key, &params);

    emit_risk_params_initialized(
        env,
        RiskParamsInitializedEvent {
            subject,
            default_limit,
            time_window,
            required_votes,
        },
    );
    Ok(())
}

pub fn get_risk_params(env: &Env, subject: &Address) -> Option<RiskParams> {
    env.storage()
        .persistent()
        .get(&DataKey::RiskParams(subject.clone()))
}

pub(crate) fn load_risk_params(env: &Env, subject: &Address) -> Result<RiskParams, LedgerError> {
    get_risk_params(env, subject).ok_or(LedgerError::NotInitialized)
}

fn save_risk_params(env: &Env, subject: &Address, params: &RiskParams) {
    env.storage()
        .persistent()
        .set(&DataKey::RiskParams(subject.clone()), params);
}

/// Returns the per-token override, if one is set.
pub fn get_token_limit(env: &Env, subject: &Address, token: &Address) -> Option<i128> {
    env.storage()
        .persistent()
        .get(&DataKey::TokenLimit(subject.clone(), token.clone()))
}

/// Limit in force for `token`: its override, else the default limit.
pub fn limit_for_token(env: &Env, subject: &Address, token: &Address, params: &RiskParams) -> i128 {
    get_token_limit(env, subject, token).unwrap_or(params.default_limit)
}

// ============================================================================
// Default limit
// ============================================================================

/// Lowers the default limit immediately (owner only).
///
/// # Errors
/// - [`LedgerError::Unauthorized`] if `caller` is not the owner.
/// - [`LedgerError::InvalidDirection`] unless `new_limit` is below the current limit.
pub fn decrease_default_risk_limit(
    env: &Env,
    subject: Address,
    caller: Address,
    new_limit: i128,
) -> Result<(), LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    require_restriction(
        env,
        &subject,
        &caller,
        Stricter::Lower,
        params.default_limit,
        new_limit,
    )?;
    apply_default_limit(env, &subject, params, new_limit, caller);
    Ok(())
}

/// Raises the default limit directly. Only possible when voting is off.
///
/// # Errors
/// - [`LedgerError::ConsensusRequired`] if guardian votes are required.
/// - [`LedgerError::Unauthorized`] if `caller` is not the owner.
/// - [`LedgerError::InvalidDirection`] unless `new_limit` is above the current limit.
pub fn increase_default_risk_limit(
    env: &Env,
    subject: Address,
    caller: Address,
    new_limit: i128,
) -> Result<(), LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    require_relaxation(
        env,
        &subject,
        &caller,
        &params,
        Stricter::Lower,
        params.default_limit,
        new_limit,
    )?;
    apply_default_limit(env, &subject, params, new_limit, caller);
    Ok(())
}

/// Guardian vote to set the default limit to `new_limit`.
///
/// Returns the pending tally, or `0` once the limit has been applied.
pub fn vote_default_limit_increase(
    env: &Env,
    subject: Address,
    voter: Address,
    new_limit: i128,
) -> Result<u32, LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    match cast_vote(
        env,
        &subject,
        DecisionKey::DefaultLimitIncrease,
        &voter,
        ProposalValue::Amount(new_limit),
        params.required_votes,
    )? {
        VoteOutcome::Pending(tally) => Ok(tally),
        VoteOutcome::Execute(_) => {
            apply_default_limit(env, &subject, params, new_limit, voter);
            Ok(0)
        }
    }
}

fn apply_default_limit(
    env: &Env,
    subject: &Address,
    mut params: RiskParams,
    new_limit: i128,
    actor: Address,
) {
    params.default_limit = new_limit;
    save_risk_params(env, subject, &params);
    emit_risk_limit_changed(
        env,
        RiskLimitChangedEvent {
            subject: subject.clone(),
            token: None,
            limit: new_limit,
            actor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

// ============================================================================
// Token limits
// ============================================================================

/// Lowers the limit of one token immediately (owner only).
///
/// The comparison is against the limit currently in force for the token,
/// which is the default limit when no override exists.
pub fn decrease_token_limit(
    env: &Env,
    subject: Address,
    caller: Address,
    token: Address,
    new_limit: i128,
) -> Result<(), LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    let current = limit_for_token(env, &subject, &token, &params);
    require_restriction(env, &subject, &caller, Stricter::Lower, current, new_limit)?;
    apply_token_limit(env, &subject, token, new_limit, caller);
    Ok(())
}

/// Raises the limit of one token directly. Only possible when voting is off.
pub fn increase_token_limit(
    env: &Env,
    subject: Address,
    caller: Address,
    token: Address,
    new_limit: i128,
) -> Result<(), LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    let current = limit_for_token(env, &subject, &token, &params);
    require_relaxation(
        env,
        &subject,
        &caller,
        &params,
        Stricter::Lower,
        current,
        new_limit,
    )?;
    apply_token_limit(env, &subject, token, new_limit, caller);
    Ok(())
}

/// Guardian vote to set the limit of `token` to `new_limit`.
///
/// Each token has its own tally.
pub fn vote_token_limit_increase(
    env: &Env,
    subject: Address,
    voter: Address,
    token: Address,
    new_limit: i128,
) -> Result<u32, LedgerError> {
    require_non_negative(new_limit)?;
    let params = load_risk_params(env, &subject)?;
    match cast_vote(
        env,
        &subject,
        DecisionKey::TokenLimitIncrease(token.clone()),
        &voter,
        ProposalValue::Amount(new_limit),
        params.required_votes,
    )? {
        VoteOutcome::Pending(tally) => Ok(tally),
        VoteOutcome::Execute(_) => {
            apply_token_limit(env, &subject, token, new_limit, voter);
            Ok(0)
        }
    }
}

/// Drops the override of `token` so the default limit applies again.
///
/// Dropping is a restriction when the default is not above the override and
/// is applied at once; otherwise it relaxes the token and follows the
/// relaxation rule. A token without an override is left untouched.
pub fn remove_token_limit(
    env: &Env,
    subject: Address,
    caller: Address,
    token: Address,
) -> Result<(), LedgerError> {
    let params = load_risk_params(env, &subject)?;
    let Some(current) = get_token_limit(env, &subject, &token) else {
        return require_account_owner(env, &subject, &caller);
    };

    if params.default_limit <= current {
        require_account_owner(env, &subject, &caller)?;
    } else {
        require_relaxation(
            env,
            &subject,
            &caller,
            &params,
            Stricter::Lower,
            current,
            params.default_limit,
        )?;
    }

    env.storage()
        .persistent()
        .remove(&DataKey::TokenLimit(subject.clone(), token.clone()));
    emit_risk_limit_changed(
        env,
        RiskLimitChangedEvent {
            subject,
            token: Some(token),
            limit: params.default_limit,
            actor: caller,
            timestamp: env.ledger().timestamp(),
        },
    );
    Ok(())
}

fn apply_token_limit(env: &Env, subject: &Address, token: Address, new_limit: i128, actor: Address) {
    env.storage()
        .persistent()
        .set(&DataKey::TokenLimit(subject.clone(), token.clone()), &new_limit);
    emit_risk_limit_changed(
        env,
        RiskLimitChangedEvent {
            subject: subject.clone(),
            token: Some(token),
            limit: new_limit,
            actor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

// ============================================================================
// Time window
// ============================================================================

/// Lengthens the spend window immediately (owner only).
///
/// # Errors
/// - [`LedgerError::InvalidDirection`] unless `new_window` is longer than the current one.
pub fn increase_time_window(
    env: &Env,
    subject: Address,
    caller: Address,
    new_window: u64,
) -> Result<(), LedgerError> {
    let params = load_risk_params(env, &subject)?;
    require_restriction(
        env,
        &subject,
        &caller,
        Stricter::Higher,
        params.time_window,
        new_window,
    )?;
    apply_time_window(env, &subject, params, new_window, caller);
    Ok(())
}

/// Shortens the spend window directly. Only possible when voting is off.
pub fn decrease_time_window(
    env: &Env,
    subject: Address,
    caller: Address,
    new_window: u64,
) -> Result<(), LedgerError> {
    let params = load_risk_params(env, &subject)?;
    require_relaxation(
        env,
        &subject,
        &caller,
        &params,
        Stricter::Higher,
        params.time_window,
        new_window,
    )?;
    apply_time_window(env, &subject, params, new_window, caller);
    Ok(())
}

/// Guardian vote to set the spend window to `new_window` seconds.
pub fn vote_time_window_decrease(
    env: &Env,
    subject: Address,
    voter: Address,
    new_window: u64,
) -> Result<u32, LedgerError> {
    let params = load_risk_params(env, &subject)?;
    match cast_vote(
        env,
        &subject,
        DecisionKey::TimeWindowDecrease,
        &voter,
        ProposalValue::Seconds(new_window),
        params.required_votes,
    )? {
        VoteOutcome::Pending(tally) => Ok(tally),
        VoteOutcome::Execute(_) => {
            apply_time_window(env, &subject, params, new_window, voter);
            Ok(0)
        }
    }
}

fn apply_time_window(
    env: &Env,
    subject: &Address,
    mut params: RiskParams,
    new_window: u64,
    actor: Address,
) {
    params.time_window = new_window;
    save_risk_params(env, subject, &params);
    emit_time_window_changed(
        env,
        TimeWindowChangedEvent {
            subject: subject.clone(),
            time_window: new_window,
            actor,
            timestamp: env.ledger().timestamp(),
        },
    );
}
