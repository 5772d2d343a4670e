use soroban_sdk::{contracttype, Address};

use crate::types::DecisionKey;

/// Storage keys for all ledger state.
///
/// Every entry is scoped by the subject address first, so accounts never
/// share state.
#[contracttype]
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum DataKey {
    /// Deduplicated guardian list: Vec<Address>
    GuardianList(Address),
    /// Guardian membership flag: (subject, guardian) -> bool
    Guardian(Address, Address),
    /// OwnershipRecord
    Ownership(Address),
    /// RiskParams
    RiskParams(Address),
    /// Per-token limit override: (subject, token) -> i128
    TokenLimit(Address, Address),
    /// SpendWindow for (subject, token)
    SpendWindow(Address, Address),
    /// Vec<Allowance> for (subject, token)
    Allowances(Address, Address),
    /// Last allowance id issued for (subject, token)
    AllowanceCounter(Address, Address),
    /// Pending Proposal for (subject, decision key)
    Proposal(Address, DecisionKey),
}
