//! Ownership ledger: one-time initialization and guardian-driven transfer.

use super::test_helpers::{guardian_vec, setup};
use crate::{DecisionKey, LedgerError, ProposalValue};
use soroban_sdk::{testutils::Address as _, Address, Env, String};

fn generate<const N: usize>(env: &Env) -> [Address; N] {
    core::array::from_fn(|_| Address::generate(env))
}

#[test]
fn test_initialize_owner_once() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let name = String::from_str(&env, "Treasury");

    client.initialize_owner(&subject, &owner, &2, &name);

    assert_eq!(client.owner(&subject), owner);
    assert_eq!(client.display_name(&subject), name);
    assert_eq!(client.owner_required_votes(&subject), 2);

    let other = Address::generate(&env);
    let result = client.try_initialize_owner(&subject, &other, &1, &name);
    assert_eq!(result, Err(Ok(LedgerError::AlreadyInitialized)));
    assert_eq!(client.owner(&subject), owner);
}

#[test]
fn test_reads_without_record_fail() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);

    assert_eq!(client.try_owner(&subject), Err(Ok(LedgerError::NotInitialized)));
    assert_eq!(
        client.try_display_name(&subject),
        Err(Ok(LedgerError::NotInitialized))
    );
    assert_eq!(
        client.try_owner_required_votes(&subject),
        Err(Ok(LedgerError::NotInitialized))
    );
    assert_eq!(client.owner_vote_count(&subject), 0);
}

#[test]
fn test_owner_replaced_at_threshold() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let candidate = Address::generate(&env);
    let guardians: [Address; 5] = generate(&env);
    let name = String::from_str(&env, "N");

    client.initialize_owner(&subject, &owner, &3, &name);
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &guardians));

    assert_eq!(client.vote_for_new_owner(&subject, &guardians[0], &candidate), 1);
    assert_eq!(client.vote_for_new_owner(&subject, &guardians[1], &candidate), 2);
    assert_eq!(client.owner(&subject), owner);
    assert_eq!(client.owner_vote_count(&subject), 2);

    assert_eq!(client.vote_for_new_owner(&subject, &guardians[2], &candidate), 0);
    assert_eq!(client.owner(&subject), candidate);
    assert_eq!(client.owner_vote_count(&subject), 0);
    assert_eq!(client.display_name(&subject), name);
}

#[test]
fn test_duplicate_vote_does_not_advance() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let candidate = Address::generate(&env);
    let guardians: [Address; 3] = generate(&env);

    client.initialize_owner(&subject, &owner, &2, &String::from_str(&env, "N"));
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &guardians));

    client.vote_for_new_owner(&subject, &guardians[0], &candidate);
    assert_eq!(client.vote_for_new_owner(&subject, &guardians[0], &candidate), 1);
    assert_eq!(client.owner(&subject), owner);
}

#[test]
fn test_competing_candidate_restarts_count() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let first = Address::generate(&env);
    let second = Address::generate(&env);
    let guardians: [Address; 3] = generate(&env);

    client.initialize_owner(&subject, &owner, &2, &String::from_str(&env, "N"));
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &guardians));

    client.vote_for_new_owner(&subject, &guardians[0], &first);
    assert_eq!(client.vote_for_new_owner(&subject, &guardians[1], &second), 1);
    assert_eq!(client.owner(&subject), owner);

    let proposal = client.pending_proposal(&subject, &DecisionKey::NewOwner).unwrap();
    assert_eq!(proposal.value, ProposalValue::Owner(second.clone()));

    assert_eq!(client.vote_for_new_owner(&subject, &guardians[2], &second), 0);
    assert_eq!(client.owner(&subject), second);
}

#[test]
fn test_non_guardian_vote_rejected() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let outsider = Address::generate(&env);
    let guardians: [Address; 2] = generate(&env);

    client.initialize_owner(&subject, &owner, &1, &String::from_str(&env, "N"));
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &guardians));

    let result = client.try_vote_for_new_owner(&subject, &outsider, &outsider);
    assert_eq!(result, Err(Ok(LedgerError::Unauthorized)));
    assert_eq!(client.owner(&subject), owner);
}

#[test]
fn test_vote_without_record_fails() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let guardians: [Address; 1] = generate(&env);
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &guardians));

    let result = client.try_vote_for_new_owner(&subject, &guardians[0], &guardians[0]);
    assert_eq!(result, Err(Ok(LedgerError::NotInitialized)));
}

#[test]
fn test_zero_guardians_locks_owner() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);

    client.initialize_owner(&subject, &owner, &1, &String::from_str(&env, "N"));

    for voter in [owner.clone(), subject.clone(), Address::generate(&env)] {
        let result = client.try_vote_for_new_owner(&subject, &voter, &voter);
        assert_eq!(result, Err(Ok(LedgerError::Unauthorized)));
    }
    assert_eq!(client.owner(&subject), owner);
}
