use soroban_sdk::contracterror;

/// Errors returned by the guardian ledger.
///
/// Codes are part of the contract interface and never change meaning, so
/// integrators can match on the cause of a failure rather than just the fact
/// that a call failed. A duplicate guardian vote is not an error.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    /// Caller is not the subject, owner or guardian required for the action
    Unauthorized = 1,
    /// One-time setup was attempted a second time
    AlreadyInitialized = 2,
    /// The ownership or risk record for the subject does not exist
    NotInitialized = 3,
    /// An immediate change would relax a constraint instead of tightening it
    InvalidDirection = 4,
    /// The change relaxes a constraint and must go through guardian voting
    ConsensusRequired = 5,
    /// A time-delayed allowance starts before a full time window has passed
    DelayTooShort = 6,
    /// Spend is over the window limit and not covered by allowances
    RiskLimitExceeded = 7,
    /// Amount or limit is negative
    InvalidAmount = 8,
    /// No active allowance with the given id
    AllowanceNotFound = 9,
    /// Arithmetic overflow
    Overflow = 10,
}
