mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cardledger_core::accounts::{
    AccountError, AccountRepository, AccountService, AccountServiceTrait,
};

#[tokio::test]
async fn test_adjust_credit_keeps_invariants() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(800));
    let service = AccountService::new(db.pool.clone());

    let account = service
        .adjust_credit(&account.account_id, dec!(-300), "tester")
        .await
        .unwrap();
    assert_eq!(account.available_credit, dec!(500));

    let account = service
        .adjust_credit(&account.account_id, dec!(200), "tester")
        .await
        .unwrap();
    assert_eq!(account.available_credit, dec!(700));

    assert!(account.available_credit >= Decimal::ZERO);
    assert!(account.available_credit <= account.credit_limit);
}

#[tokio::test]
async fn test_credit_above_limit_is_capped() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(800));
    let service = AccountService::new(db.pool.clone());

    // A refund cannot push available credit past the limit.
    let account = service
        .adjust_credit(&account.account_id, dec!(5000), "tester")
        .await
        .unwrap();
    assert_eq!(account.available_credit, dec!(1000));
    assert_eq!(account.credit_limit, dec!(1000));
}

#[tokio::test]
async fn test_insufficient_credit_leaves_account_unchanged() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(500));
    let service = AccountService::new(db.pool.clone());

    let err = service
        .adjust_credit(&account.account_id, dec!(-900), "tester")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InsufficientCredit { .. }));

    let unchanged = service.get_account(&account.account_id).unwrap();
    assert_eq!(unchanged.available_credit, dec!(500));
    assert_eq!(unchanged.version, account.version);
}

#[tokio::test]
async fn test_stale_version_conflicts_on_first_attempt() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(500));
    let repo = AccountRepository::new(db.pool.clone());

    // Two writers read the same version; the first conditional write wins.
    let stale_version = account.version;
    repo.adjust_credit(&account.account_id, dec!(-100), Some(stale_version), "writer-a")
        .unwrap();

    let err = repo
        .adjust_credit(&account.account_id, dec!(-100), Some(stale_version), "writer-b")
        .unwrap_err();
    assert!(matches!(err, AccountError::VersionConflict(_)));

    // Exactly one adjustment landed.
    let current = repo.get_by_id(&account.account_id).unwrap();
    assert_eq!(current.available_credit, dec!(400));
    assert_eq!(current.version, stale_version + 1);
}

#[tokio::test]
async fn test_adjust_limit_moves_both_balances() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(400));
    let service = AccountService::new(db.pool.clone());

    let account = service
        .adjust_limit(&account.account_id, dec!(500), "risk-team")
        .await
        .unwrap();
    assert_eq!(account.credit_limit, dec!(1500));
    assert_eq!(account.available_credit, dec!(900));

    // Shrinking past the outstanding balance is refused.
    let err = service
        .adjust_limit(&account.account_id, dec!(-1000), "risk-team")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InsufficientCredit { .. }));
}

#[tokio::test]
async fn test_get_account_not_found() {
    let db = common::setup_db();
    let service = AccountService::new(db.pool.clone());

    let err = service.get_account("missing").unwrap_err();
    assert!(matches!(err, AccountError::NotFound(_)));
}

#[tokio::test]
async fn test_soft_deleted_account_is_invisible() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(500));
    let service = AccountService::new(db.pool.clone());

    service
        .delete_account(&account.account_id, "admin")
        .await
        .unwrap();

    assert!(matches!(
        service.get_account(&account.account_id),
        Err(AccountError::NotFound(_))
    ));
    assert!(service.list_accounts(None).unwrap().is_empty());

    // And it cannot be mutated either.
    let err = service
        .adjust_credit(&account.account_id, dec!(10), "tester")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound(_)));
}

#[tokio::test]
async fn test_list_accounts_filters_by_company() {
    let db = common::setup_db();
    common::seed_account(&db.pool, dec!(1000), dec!(500));
    common::seed_account(&db.pool, dec!(2000), dec!(2000));
    let service = AccountService::new(db.pool.clone());

    let all = service.list_accounts(None).unwrap();
    assert_eq!(all.len(), 2);

    let company = service
        .list_accounts(Some("11111111-2222-3333-4444-555555555555"))
        .unwrap();
    assert_eq!(company.len(), 2);

    let other = service.list_accounts(Some("nobody")).unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_updated_by_stamped_on_adjustment() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(500));
    let service = AccountService::new(db.pool.clone());

    let account = service
        .adjust_credit(&account.account_id, dec!(-1), "ops@example.com")
        .await
        .unwrap();
    assert_eq!(account.updated_by.as_deref(), Some("ops@example.com"));
}
