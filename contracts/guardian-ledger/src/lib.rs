//! # Guardian Ledger
//!
//! Account-protection contract combining guardian consensus with windowed
//! spend limits. Every piece of state is scoped by a *subject* address, so a
//! single deployment serves any number of protected accounts.
//!
//! - **Guardians**: each subject names the set of addresses allowed to vote
//!   on its behalf.
//! - **Ownership**: a one-time owner and display name; the owner can only be
//!   replaced by guardian consensus.
//! - **Risk limits**: per-token limits over a reset-on-elapse time window.
//!   Tightening is immediate for the owner; relaxing needs guardian votes.
//! - **Allowances**: one-off budgets above the limit, either time-delayed by
//!   the owner or granted immediately by guardians.

#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

mod allowances;
mod consensus;
mod errors;
mod events;
mod guardians;
mod ownership;
mod risk;
mod spend;
mod storage;
mod types;

pub use errors::LedgerError;
pub use types::{
    Allowance, DecisionKey, OwnershipRecord, Proposal, ProposalValue, RiskParams, SpendWindow,
    UNBOUNDED,
};

#[cfg(test)]
mod tests;

#[contract]
pub struct GuardianLedger;

#[contractimpl]
impl GuardianLedger {
    // ========================================================================
    // Guardians
    // ========================================================================

    /// Replace the guardian set of `subject`
    ///
    /// # Arguments
    /// * `caller` - Must be `subject` and authorize the call
    /// * `subject` - The protected account
    /// * `guardians` - New guardian set; duplicates are ignored
    ///
    /// # Errors
    /// - `Unauthorized` - `caller` is not `subject`
    pub fn set_guardians(
        env: Env,
        caller: Address,
        subject: Address,
        guardians: Vec<Address>,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        guardians::set_guardians(&env, caller, subject, guardians)
    }

    pub fn is_guardian(env: Env, subject: Address, address: Address) -> bool {
        guardians::is_guardian(&env, &subject, &address)
    }

    /// Guardians of `subject` in the order they were registered
    pub fn guardians(env: Env, subject: Address) -> Vec<Address> {
        guardians::get_guardians(&env, &subject)
    }

    pub fn guardian_count(env: Env, subject: Address) -> u32 {
        guardians::guardian_count(&env, &subject)
    }

    // ========================================================================
    // Ownership
    // ========================================================================

    /// Create the ownership record of `subject` (once)
    ///
    /// # Arguments
    /// * `subject` - The protected account
    /// * `owner` - Initial owner
    /// * `required_votes` - Guardian votes needed to replace the owner
    /// * `display_name` - Fixed label for the account
    ///
    /// # Errors
    /// - `AlreadyInitialized` - A record already exists
    pub fn initialize_owner(
        env: Env,
        subject: Address,
        owner: Address,
        required_votes: u32,
        display_name: String,
    ) -> Result<(), LedgerError> {
        ownership::initialize_owner(&env, subject, owner, required_votes, display_name)
    }

    /// Guardian vote to make `candidate` the owner of `subject`
    ///
    /// Returns the pending tally, or 0 once the owner was replaced.
    ///
    /// # Errors
    /// - `NotInitialized` - No ownership record
    /// - `Unauthorized` - `voter` is not a guardian
    pub fn vote_for_new_owner(
        env: Env,
        subject: Address,
        voter: Address,
        candidate: Address,
    ) -> Result<u32, LedgerError> {
        voter.require_auth();
        ownership::vote_for_new_owner(&env, subject, voter, candidate)
    }

    pub fn owner(env: Env, subject: Address) -> Result<Address, LedgerError> {
        ownership::owner(&env, &subject)
    }

    pub fn display_name(env: Env, subject: Address) -> Result<String, LedgerError> {
        ownership::display_name(&env, &subject)
    }

    pub fn owner_required_votes(env: Env, subject: Address) -> Result<u32, LedgerError> {
        ownership::owner_required_votes(&env, &subject)
    }

    /// Votes recorded for the currently proposed owner
    pub fn owner_vote_count(env: Env, subject: Address) -> u32 {
        ownership::owner_vote_count(&env, &subject)
    }

    // ========================================================================
    // Risk parameters
    // ========================================================================

    /// Create the risk parameters of `subject` (once)
    ///
    /// # Arguments
    /// * `subject` - The protected account
    /// * `time_window` - Spend window length in seconds
    /// * `default_limit` - Per-window limit for tokens without an override
    /// * `required_votes` - Guardian votes needed to relax a parameter
    ///
    /// # Errors
    /// - `AlreadyInitialized` - Parameters already exist
    /// - `InvalidAmount` - `default_limit` is negative
    pub fn initialize_risk_params(
        env: Env,
        subject: Address,
        time_window: u64,
        default_limit: i128,
        required_votes: u32,
    ) -> Result<(), LedgerError> {
        risk::initialize_risk_params(&env, subject, time_window, default_limit, required_votes)
    }

    pub fn risk_params(env: Env, subject: Address) -> Result<RiskParams, LedgerError> {
        risk::load_risk_params(&env, &subject)
    }

    pub fn default_risk_limit(env: Env, subject: Address) -> Result<i128, LedgerError> {
        Ok(risk::load_risk_params(&env, &subject)?.default_limit)
    }

    pub fn risk_time_window(env: Env, subject: Address) -> Result<u64, LedgerError> {
        Ok(risk::load_risk_params(&env, &subject)?.time_window)
    }

    pub fn risk_votes_required(env: Env, subject: Address) -> Result<u32, LedgerError> {
        Ok(risk::load_risk_params(&env, &subject)?.required_votes)
    }

    /// Limit in force for `token`: its override, else the default limit
    pub fn limit_for_token(env: Env, subject: Address, token: Address) -> Result<i128, LedgerError> {
        let params = risk::load_risk_params(&env, &subject)?;
        Ok(risk::limit_for_token(&env, &subject, &token, &params))
    }

    /// Lower the default limit immediately (owner only)
    ///
    /// # Errors
    /// - `Unauthorized` - `caller` is not the owner
    /// - `InvalidDirection` - `new_limit` is not below the current default
    pub fn decrease_default_risk_limit(
        env: Env,
        subject: Address,
        caller: Address,
        new_limit: i128,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::decrease_default_risk_limit(&env, subject, caller, new_limit)
    }

    /// Raise the default limit directly (owner only, voting disabled)
    ///
    /// # Errors
    /// - `ConsensusRequired` - Guardian votes are required
    /// - `Unauthorized` - `caller` is not the owner
    /// - `InvalidDirection` - `new_limit` is not above the current default
    pub fn increase_default_risk_limit(
        env: Env,
        subject: Address,
        caller: Address,
        new_limit: i128,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::increase_default_risk_limit(&env, subject, caller, new_limit)
    }

    /// Guardian vote to raise the default limit
    pub fn vote_default_limit_increase(
        env: Env,
        subject: Address,
        voter: Address,
        new_limit: i128,
    ) -> Result<u32, LedgerError> {
        voter.require_auth();
        risk::vote_default_limit_increase(&env, subject, voter, new_limit)
    }

    /// Lower the limit of `token` immediately (owner only)
    pub fn decrease_token_limit(
        env: Env,
        subject: Address,
        caller: Address,
        token: Address,
        new_limit: i128,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::decrease_token_limit(&env, subject, caller, token, new_limit)
    }

    /// Raise the limit of `token` directly (owner only, voting disabled)
    pub fn increase_token_limit(
        env: Env,
        subject: Address,
        caller: Address,
        token: Address,
        new_limit: i128,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::increase_token_limit(&env, subject, caller, token, new_limit)
    }

    /// Guardian vote to raise the limit of `token`
    pub fn vote_token_limit_increase(
        env: Env,
        subject: Address,
        voter: Address,
        token: Address,
        new_limit: i128,
    ) -> Result<u32, LedgerError> {
        voter.require_auth();
        risk::vote_token_limit_increase(&env, subject, voter, token, new_limit)
    }

    /// Drop the override of `token` so the default limit applies
    ///
    /// # Errors
    /// - `Unauthorized` - `caller` is not the owner
    /// - `ConsensusRequired` - Dropping would raise the limit and votes are required
    pub fn remove_token_limit(
        env: Env,
        subject: Address,
        caller: Address,
        token: Address,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::remove_token_limit(&env, subject, caller, token)
    }

    /// Lengthen the spend window immediately (owner only)
    pub fn increase_time_window(
        env: Env,
        subject: Address,
        caller: Address,
        new_window: u64,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::increase_time_window(&env, subject, caller, new_window)
    }

    /// Shorten the spend window directly (owner only, voting disabled)
    pub fn decrease_time_window(
        env: Env,
        subject: Address,
        caller: Address,
        new_window: u64,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        risk::decrease_time_window(&env, subject, caller, new_window)
    }

    /// Guardian vote to shorten the spend window
    pub fn vote_time_window_decrease(
        env: Env,
        subject: Address,
        voter: Address,
        new_window: u64,
    ) -> Result<u32, LedgerError> {
        voter.require_auth();
        risk::vote_time_window_decrease(&env, subject, voter, new_window)
    }

    // ========================================================================
    // Allowances
    // ========================================================================

    /// Schedule an allowance usable from `valid_from` (owner only)
    ///
    /// Returns the id of the new allowance.
    ///
    /// # Errors
    /// - `Unauthorized` - `caller` is not the owner
    /// - `DelayTooShort` - `valid_from` is less than one time window away
    pub fn allow_time_delayed_tx(
        env: Env,
        subject: Address,
        caller: Address,
        token: Address,
        amount: i128,
        valid_from: u64,
    ) -> Result<u64, LedgerError> {
        caller.require_auth();
        allowances::allow_time_delayed_tx(&env, subject, caller, token, amount, valid_from)
    }

    /// Guardian vote for an immediately usable allowance
    pub fn vote_spend_allowance(
        env: Env,
        subject: Address,
        voter: Address,
        token: Address,
        amount: i128,
    ) -> Result<u32, LedgerError> {
        voter.require_auth();
        allowances::vote_spend_allowance(&env, subject, voter, token, amount)
    }

    /// Cancel allowance `id` (owner only)
    ///
    /// # Errors
    /// - `Unauthorized` - `caller` is not the owner
    /// - `AllowanceNotFound` - No active allowance with that id
    pub fn cancel_allowance(
        env: Env,
        subject: Address,
        caller: Address,
        token: Address,
        id: u64,
    ) -> Result<(), LedgerError> {
        caller.require_auth();
        allowances::cancel_allowance(&env, subject, caller, token, id)
    }

    pub fn allowances(env: Env, subject: Address, token: Address) -> Vec<Allowance> {
        allowances::get_allowances(&env, &subject, &token)
    }

    pub fn allowance_available(env: Env, subject: Address, token: Address) -> i128 {
        allowances::allowance_available(&env, &subject, &token)
    }

    pub fn last_allowance_id(env: Env, subject: Address, token: Address) -> u64 {
        allowances::last_allowance_id(&env, &subject, &token)
    }

    // ========================================================================
    // Spending
    // ========================================================================

    /// Record a spend of `amount` of `token` by `subject`
    ///
    /// # Errors
    /// - `NotInitialized` - No risk parameters for `subject`
    /// - `RiskLimitExceeded` - Over the window limit and not covered by allowances
    pub fn spend(
        env: Env,
        subject: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), LedgerError> {
        subject.require_auth();
        spend::spend(&env, subject, token, amount)
    }

    /// Current spend window of `(subject, token)`
    pub fn spends(env: Env, subject: Address, token: Address) -> SpendWindow {
        spend::get_spend_window(&env, &subject, &token)
    }

    // ========================================================================
    // Proposals
    // ========================================================================

    pub fn pending_votes(env: Env, subject: Address, key: DecisionKey) -> u32 {
        consensus::pending_votes(&env, &subject, key)
    }

    pub fn pending_proposal(env: Env, subject: Address, key: DecisionKey) -> Option<Proposal> {
        consensus::pending_proposal(&env, &subject, key)
    }
}
