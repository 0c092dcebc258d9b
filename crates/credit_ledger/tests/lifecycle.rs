//! End-to-end use-case flow against `InMemoryRepository`, mirroring the
//! original's `test_in_memory_credit_account_repository.py` scenarios.

use uuid::Uuid;

use credit_ledger::{
    usecase::{
        AddCreditInput, AddCreditUseCase, ConsumeCreditInput, ConsumeCreditUseCase,
        ExpireRenewInput, ExpireRenewUseCase, RefundCreditInput, RefundCreditUseCase,
    },
    AccountConfig, InMemoryRepository, NoopCacheInvalidator, Repository,
};

#[test]
fn add_then_consume_through_use_cases() {
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;
    let config = AccountConfig::default();
    let tenant_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let added = AddCreditUseCase::new(&mut repo, &cache, &config)
        .execute(AddCreditInput {
            tenant_id,
            amount: 100,
            owner_id,
            description: "monthly plan".to_string(),
            kind_label: None,
            contracted_service_id: None,
        })
        .unwrap();
    assert_eq!(added.account_id, tenant_id);
    assert_eq!(added.new_balance, 100);

    let consumed = ConsumeCreditUseCase::new(&mut repo, &cache)
        .execute(ConsumeCreditInput {
            tenant_id,
            amount: 30,
            owner_id,
            description: "api call".to_string(),
            consumed_at: None,
            target_type: Some("booking".to_string()),
            target_id: Some("B1".to_string()),
        })
        .unwrap();
    assert_eq!(consumed.account_id, tenant_id);
    assert_eq!(consumed.new_balance, 70);
}

#[test]
fn consume_then_refund_restores_balance() {
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;
    let config = AccountConfig::default();
    let tenant_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    AddCreditUseCase::new(&mut repo, &cache, &config)
        .execute(AddCreditInput {
            tenant_id,
            amount: 50,
            owner_id,
            description: "monthly plan".to_string(),
            kind_label: None,
            contracted_service_id: None,
        })
        .unwrap();

    ConsumeCreditUseCase::new(&mut repo, &cache)
        .execute(ConsumeCreditInput {
            tenant_id,
            amount: 20,
            owner_id,
            description: "booking".to_string(),
            consumed_at: None,
            target_type: Some("booking".to_string()),
            target_id: Some("B1".to_string()),
        })
        .unwrap();

    let refunded = RefundCreditUseCase::new(&mut repo, &cache)
        .execute(RefundCreditInput {
            tenant_id,
            owner_id,
            target_type: "booking".to_string(),
            target_id: "B1".to_string(),
        })
        .unwrap();
    assert_eq!(refunded.account_id, tenant_id);
    assert_eq!(refunded.new_balance, 50);

    // idempotent: refunding again does not double-credit.
    let refunded_again = RefundCreditUseCase::new(&mut repo, &cache)
        .execute(RefundCreditInput {
            tenant_id,
            owner_id,
            target_type: "booking".to_string(),
            target_id: "B1".to_string(),
        })
        .unwrap();
    assert_eq!(refunded_again.new_balance, 50);
}

#[test]
fn consuming_more_than_balance_fails_and_persists_nothing() {
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;
    let config = AccountConfig::default();
    let tenant_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    AddCreditUseCase::new(&mut repo, &cache, &config)
        .execute(AddCreditInput {
            tenant_id,
            amount: 10,
            owner_id,
            description: "monthly plan".to_string(),
            kind_label: None,
            contracted_service_id: None,
        })
        .unwrap();

    let err = ConsumeCreditUseCase::new(&mut repo, &cache)
        .execute(ConsumeCreditInput {
            tenant_id,
            amount: 999,
            owner_id,
            description: "too much".to_string(),
            consumed_at: None,
            target_type: None,
            target_id: None,
        })
        .unwrap_err();
    assert!(matches!(err, credit_ledger::CreditError::InsufficientBalance));

    let balance = repo
        .load_account_by_tenant(tenant_id)
        .unwrap()
        .unwrap()
        .balance(None);
    assert_eq!(balance, 10);
}

#[test]
fn consuming_against_unknown_tenant_fails() {
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;

    let err = ConsumeCreditUseCase::new(&mut repo, &cache)
        .execute(ConsumeCreditInput {
            tenant_id: Uuid::new_v4(),
            amount: 1,
            owner_id: Uuid::new_v4(),
            description: "spend".to_string(),
            consumed_at: None,
            target_type: None,
            target_id: None,
        })
        .unwrap_err();
    assert!(matches!(err, credit_ledger::CreditError::InvalidInput(_)));
}

#[test]
fn scheduled_job_is_a_no_op_for_a_freshly_added_batch() {
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;
    let config = AccountConfig::default();
    let tenant_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    AddCreditUseCase::new(&mut repo, &cache, &config)
        .execute(AddCreditInput {
            tenant_id,
            amount: 40,
            owner_id,
            description: "monthly plan".to_string(),
            kind_label: None,
            contracted_service_id: None,
        })
        .unwrap();

    // a batch created "now" has not reached its expiration date yet, so
    // the scheduled job leaves it untouched.
    let result = ExpireRenewUseCase::new(&mut repo, &cache)
        .execute(ExpireRenewInput {
            tenant_id,
            owner_id,
            renew_expired: true,
        })
        .unwrap();
    assert_eq!(result.account_id, tenant_id);
    assert_eq!(result.new_balance, 40);
    assert_eq!(result.expired_value, 0);
}

#[test]
fn scheduled_job_expires_and_renews_a_batch_from_the_full_history_view() {
    // InMemoryRepository's tenant view only exposes live batches, so to
    // exercise the expire/renew path deterministically we advance the
    // reference date on a historical snapshot well past any possible
    // expiration date and check expiry there instead.
    let mut repo = InMemoryRepository::new();
    let cache = NoopCacheInvalidator;
    let config = AccountConfig::default();
    let tenant_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    AddCreditUseCase::new(&mut repo, &cache, &config)
        .execute(AddCreditInput {
            tenant_id,
            amount: 25,
            owner_id,
            description: "monthly plan".to_string(),
            kind_label: None,
            contracted_service_id: None,
        })
        .unwrap();

    let today = chrono::Utc::now().date_naive();
    let mut historical = repo.load_full_history(tenant_id, today).unwrap();
    let far_future = today.checked_add_months(chrono::Months::new(3)).unwrap();
    historical.set_reference_date(far_future);
    assert_eq!(historical.count_expired(), 25);

    historical.expire(None);
    historical.renew();
    assert_eq!(historical.balance(None), 25);
    assert_eq!(historical.batches().len(), 2);
}
