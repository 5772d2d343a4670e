//! # Spend Accounting
//!
//! Reset-on-elapse bucket per (subject, token). A spend is first checked
//! against what is left of the window budget; if it does not fit, the whole
//! amount must come out of allowances. Window budget and allowance are never
//! combined to cover one spend, and a spend paid from allowance leaves the
//! window total untouched.
use soroban_sdk::{Address, Env};

use crate::allowances::{allowance_available, consume_allowance};
use crate::errors::LedgerError;
use crate::events::{emit_spend_recorded, SpendRecordedEvent};
use crate::risk::{limit_for_token, load_risk_params, require_non_negative};
use crate::storage::DataKey;
use crate::types::{SpendWindow, UNBOUNDED};

/// Current bucket of `(subject, token)`, `(0, 0)` if nothing was spent yet.
pub fn get_spend_window(env: &Env, subject: &Address, token: &Address) -> SpendWindow {
    env.storage()
        .persistent()
        .get(&DataKey::SpendWindow(subject.clone(), token.clone()))
        .unwrap_or(SpendWindow {
            amount: 0,
            start: 0,
        })
}

/// Records a spend of `amount` of `token` by `subject`.
///
/// # Errors
/// - [`LedgerError::NotInitialized`] if the subject has no risk parameters.
/// - [`LedgerError::InvalidAmount`] if `amount` is negative.
/// - [`LedgerError::RiskLimitExceeded`] if neither the window budget nor the
///   available allowance covers `amount`.
pub fn spend(env: &Env, subject: Address, token: Address, amount: i128) -> Result<(), LedgerError> {
    require_non_negative(amount)?;
    let params = load_risk_params(env, &subject)?;
    let limit = limit_for_token(env, &subject, &token, &params);
    let now = env.ledger().timestamp();
    let mut window = get_spend_window(env, &subject, &token);

    let mut from_allowance = false;
    if limit == UNBOUNDED {
        window.amount = window.amount.saturating_add(amount);
    } else {
        if now.saturating_sub(window.start) >= params.time_window {
            window = SpendWindow {
                amount: 0,
                start: now,
            };
        }
        let accumulated = window.amount.saturating_add(amount);
        if amount > limit || accumulated > limit {
            if allowance_available(env, &subject, &token) < amount {
                return Err(LedgerError::RiskLimitExceeded);
            }
            consume_allowance(env, &subject, &token, amount);
            from_allowance = true;
        } else {
            window.amount = accumulated;
        }
    }

    env.storage()
        .persistent()
        .set(&DataKey::SpendWindow(subject.clone(), token.clone()), &window);

    emit_spend_recorded(
        env,
        SpendRecordedEvent {
            subject,
            token,
            amount,
            window_total: window.amount,
            from_allowance,
            timestamp: now,
        },
    );
    Ok(())
}
