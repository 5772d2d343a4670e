/// # Event Logging – Tests
///
/// Every state change publishes a `#[contractevent]` struct whose data payload
/// is a map of its fields. The mirror types below decode that payload from
/// `env.events().all()`, which yields `(contract, topics, data)` tuples.
use crate::events::{emit_time_window_changed, TimeWindowChangedEvent};
use crate::{DecisionKey, GuardianLedger, ProposalValue};

use super::test_helpers::{guardian_vec, protected_account, setup, START};

use soroban_sdk::{
    contracttype,
    testutils::{Address as _, Events},
    Address, Env, String, TryFromVal, Val,
};

// ─────────────────────────────────────────────────────────────────────────────
// Mirror types
// ─────────────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestGuardiansUpdatedEvent {
    pub subject: Address,
    pub guardian_count: u32,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestVoteCastEvent {
    pub subject: Address,
    pub key: DecisionKey,
    pub voter: Address,
    pub value: ProposalValue,
    pub tally: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestProposalExecutedEvent {
    pub subject: Address,
    pub key: DecisionKey,
    pub value: ProposalValue,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestOwnerChangedEvent {
    pub subject: Address,
    pub previous_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestRiskLimitChangedEvent {
    pub subject: Address,
    pub token: Option<Address>,
    pub limit: i128,
    pub actor: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestTimeWindowChangedEvent {
    pub subject: Address,
    pub time_window: u64,
    pub actor: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestAllowanceAddedEvent {
    pub subject: Address,
    pub token: Address,
    pub id: u64,
    pub amount: i128,
    pub valid_from: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestAllowanceCancelledEvent {
    pub subject: Address,
    pub token: Address,
    pub id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TestSpendRecordedEvent {
    pub subject: Address,
    pub token: Address,
    pub amount: i128,
    pub window_total: i128,
    pub from_allowance: bool,
    pub timestamp: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Most recent published event whose payload decodes as `T`.
fn last_event<T: TryFromVal<Env, Val>>(env: &Env) -> Option<T> {
    let mut found = None;
    for (_contract, _topics, data) in env.events().all().iter() {
        if let Ok(event) = T::try_from_val(env, &data) {
            found = Some(event);
        }
    }
    found
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper invocation via env.as_contract()
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_time_window_event_structure() {
    let env = Env::default();
    let contract_id = env.register(GuardianLedger, ());

    env.as_contract(&contract_id, || {
        let subject = Address::generate(&env);
        let actor = Address::generate(&env);

        emit_time_window_changed(
            &env,
            TimeWindowChangedEvent {
                subject: subject.clone(),
                time_window: 3_600,
                actor: actor.clone(),
                timestamp: 42,
            },
        );

        let all = env.events().all();
        assert_eq!(all.len(), 1, "Expected exactly 1 event");

        let (_contract, _topics, data) = all.get_unchecked(0);
        let decoded = TestTimeWindowChangedEvent::try_from_val(&env, &data)
            .expect("Failed to decode TimeWindowChangedEvent");
        assert_eq!(decoded.subject, subject);
        assert_eq!(decoded.time_window, 3_600);
        assert_eq!(decoded.actor, actor);
        assert_eq!(decoded.timestamp, 42);
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Contract calls
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_guardians_updated_counts_distinct() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let a = Address::generate(&env);
    let b = Address::generate(&env);

    client.set_guardians(
        &subject,
        &subject,
        &guardian_vec(&env, &[a.clone(), b.clone(), a.clone()]),
    );

    let event: TestGuardiansUpdatedEvent = last_event(&env).expect("GuardiansUpdatedEvent");
    assert_eq!(event.subject, subject);
    assert_eq!(event.guardian_count, 2);
    assert_eq!(event.timestamp, START);
}

#[test]
fn test_owner_changed_event() {
    let (env, _id, client) = setup();
    let subject = Address::generate(&env);
    let owner = Address::generate(&env);
    let candidate = Address::generate(&env);
    let a = Address::generate(&env);
    let b = Address::generate(&env);

    client.initialize_owner(&subject, &owner, &2, &String::from_str(&env, "N"));
    client.set_guardians(&subject, &subject, &guardian_vec(&env, &[a.clone(), b.clone()]));

    client.vote_for_new_owner(&subject, &a, &candidate);
    let vote: TestVoteCastEvent = last_event(&env).expect("VoteCastEvent");
    assert_eq!(vote.key, DecisionKey::NewOwner);
    assert_eq!(vote.voter, a);
    assert_eq!(vote.value, ProposalValue::Owner(candidate.clone()));
    assert_eq!(vote.tally, 1);

    client.vote_for_new_owner(&subject, &b, &candidate);
    let changed: TestOwnerChangedEvent = last_event(&env).expect("OwnerChangedEvent");
    assert_eq!(changed.subject, subject);
    assert_eq!(changed.previous_owner, owner);
    assert_eq!(changed.new_owner, candidate);
    assert_eq!(changed.timestamp, START);
}

#[test]
fn test_proposal_executed_and_limit_changed() {
    let (env, _id, client) = setup();
    let acct = protected_account(&env, &client, 2, 100, 1_000);

    client.vote_default_limit_increase(&acct.subject, &acct.guardians[0], &500);
    client.vote_default_limit_increase(&acct.subject, &acct.guardians[1], &500);

    let executed: TestProposalExecutedEvent =
        last_event(&env).expect("ProposalExecutedEvent");
    assert_eq!(executed.subject, acct.subject);
    assert_eq!(executed.key, DecisionKey::DefaultLimitIncrease);
    assert_eq!(executed.value, ProposalValue::Amount(500));
    assert_eq!(executed.timestamp, START);

    let changed: TestRiskLimitChangedEvent = last_event(&env).expect("RiskLimitChangedEvent");
    assert_eq!(changed.token, None);
    assert_eq!(changed.limit, 500);
    assert_eq!(changed.actor, acct.guardians[1]);
}

#[test]
fn test_token_limit_changed_event() {
    let (env, _id, client) = setup();
    let acct = protected_account(&env, &client, 2, 100, 1_000);

    client.decrease_token_limit(&acct.subject, &acct.owner, &acct.token, &30);

    let changed: TestRiskLimitChangedEvent = last_event(&env).expect("RiskLimitChangedEvent");
    assert_eq!(changed.subject, acct.subject);
    assert_eq!(changed.token, Some(acct.token.clone()));
    assert_eq!(changed.limit, 30);
    assert_eq!(changed.actor, acct.owner);
}

#[test]
fn test_allowance_events() {
    let (env, _id, client) = setup();
    let acct = protected_account(&env, &client, 2, 10, 1_000);

    let id = client.allow_time_delayed_tx(
        &acct.subject,
        &acct.owner,
        &acct.token,
        &25,
        &(START + 1_000),
    );
    let added: TestAllowanceAddedEvent = last_event(&env).expect("AllowanceAddedEvent");
    assert_eq!(added.id, id);
    assert_eq!(added.amount, 25);
    assert_eq!(added.valid_from, START + 1_000);
    assert_eq!(added.token, acct.token);

    client.cancel_allowance(&acct.subject, &acct.owner, &acct.token, &id);
    let cancelled: TestAllowanceCancelledEvent =
        last_event(&env).expect("AllowanceCancelledEvent");
    assert_eq!(cancelled.subject, acct.subject);
    assert_eq!(cancelled.id, id);
    assert_eq!(cancelled.amount, 25);
}

#[test]
fn test_spend_recorded_marks_allowance_use() {
    let (env, _id, client) = setup();
    let acct = protected_account(&env, &client, 2, 10, 1_000);
    client.vote_spend_allowance(&acct.subject, &acct.guardians[0], &acct.token, &50);
    client.vote_spend_allowance(&acct.subject, &acct.guardians[1], &acct.token, &50);

    client.spend(&acct.subject, &acct.token, &4);
    let within: TestSpendRecordedEvent = last_event(&env).expect("SpendRecordedEvent");
    assert_eq!(within.amount, 4);
    assert_eq!(within.window_total, 4);
    assert!(!within.from_allowance);
    assert_eq!(within.timestamp, START);

    client.spend(&acct.subject, &acct.token, &20);
    let over: TestSpendRecordedEvent = last_event(&env).expect("SpendRecordedEvent");
    assert_eq!(over.subject, acct.subject);
    assert_eq!(over.token, acct.token);
    assert_eq!(over.amount, 20);
    assert_eq!(over.window_total, 4);
    assert!(over.from_allowance);
}
