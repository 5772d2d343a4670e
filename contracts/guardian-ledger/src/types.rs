use soroban_sdk::{contracttype, Address, String, Vec};

/// Limit value meaning "no limit"; spends against it are recorded but never checked.
pub const UNBOUNDED: i128 = i128::MAX;

/// Owner and display name of a protected account.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipRecord {
    /// Address currently controlling the account
    pub owner: Address,
    /// Human readable label, fixed at initialization
    pub display_name: String,
    /// Guardian votes needed to replace the owner
    pub required_votes: u32,
}

/// Risk parameters of a protected account.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RiskParams {
    /// Per-window limit for tokens without an override
    pub default_limit: i128,
    /// Length of the spend window in seconds
    pub time_window: u64,
    /// Guardian votes needed to relax a parameter (0 = owner decides alone)
    pub required_votes: u32,
}

/// Spend bucket for one token.
///
/// The bucket is reset when a spend arrives a full window after `start`;
/// it does not slide.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpendWindow {
    /// Amount accumulated since `start`
    pub amount: i128,
    /// Ledger timestamp at which the bucket was opened
    pub start: u64,
}

/// Pre-approved amount that may be spent above the window limit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allowance {
    /// Identifier, increasing per subject and token
    pub id: u64,
    /// Amount still available from this entry
    pub amount: i128,
    /// Ledger timestamp from which the entry may be drawn
    pub valid_from: u64,
    /// False once cancelled
    pub active: bool,
}

/// Identifies an independent vote tally.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecisionKey {
    /// Replace the account owner
    NewOwner,
    /// Raise the default limit
    DefaultLimitIncrease,
    /// Raise the limit of one token
    TokenLimitIncrease(Address),
    /// Shorten the spend window
    TimeWindowDecrease,
    /// Grant an immediately usable allowance for one token
    SpendAllowance(Address),
}

/// Value a tally is voting for.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalValue {
    Owner(Address),
    Amount(i128),
    Seconds(u64),
}

/// Pending proposal: the value and the guardians who voted for exactly it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub value: ProposalValue,
    pub voters: Vec<Address>,
}
