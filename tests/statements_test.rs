mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use cardledger_core::statements::{
    NewStatement, StatementError, StatementService, StatementServiceTrait,
};

fn new_statement(account_id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> NewStatement {
    NewStatement {
        statement_id: None,
        account_id: account_id.to_string(),
        period_start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        period_end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        currency_code: "SEK".to_string(),
        total_due_amount: dec!(15000),
        minimum_due_amount: dec!(1000),
        due_date: NaiveDate::from_ymd_opt(end.0, end.1 + 1, 25).unwrap(),
        pdf_url: None,
        created_by: "cycle-close".to_string(),
    }
}

#[tokio::test]
async fn test_get_statement_by_composite_key() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    let created = service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap();

    let fetched = service
        .get_statement(
            &account.account_id,
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
        )
        .unwrap();
    assert_eq!(fetched.statement_id, created.statement_id);
    assert_eq!(fetched.total_due_amount, dec!(15000));

    let err = service
        .get_statement(
            &account.account_id,
            NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, StatementError::NotFound(_)));
}

#[tokio::test]
async fn test_list_statements_most_recent_first() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    for (start, end) in [
        ((2024, 3, 5), (2024, 4, 4)),
        ((2024, 5, 5), (2024, 6, 4)),
        ((2024, 4, 5), (2024, 5, 4)),
    ] {
        service
            .create_statement(new_statement(&account.account_id, start, end))
            .await
            .unwrap();
    }

    let statements = service.list_statements(&account.account_id).unwrap();
    let starts: Vec<NaiveDate> = statements.iter().map(|s| s.period_start).collect();
    assert_eq!(
        starts,
        vec![
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_and_overlapping_periods_rejected() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap();

    // Same period_start.
    let err = service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap_err();
    assert!(matches!(err, StatementError::InvalidData(_)));

    // Overlaps the existing period.
    let err = service
        .create_statement(new_statement(&account.account_id, (2024, 6, 1), (2024, 6, 30)))
        .await
        .unwrap_err();
    assert!(matches!(err, StatementError::InvalidData(_)));
}

#[tokio::test]
async fn test_record_payment_partial_then_full() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    let statement = service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap();

    let statement = service
        .record_payment(&statement.statement_id, dec!(5000), "payer")
        .await
        .unwrap();
    assert_eq!(statement.paid_amount, dec!(5000));
    assert!(statement.paid_at.is_none());
    assert_eq!(statement.updated_by.as_deref(), Some("payer"));

    let statement = service
        .record_payment(&statement.statement_id, dec!(10000), "payer")
        .await
        .unwrap();
    assert_eq!(statement.paid_amount, dec!(15000));
    assert!(statement.paid_at.is_some());
}

#[tokio::test]
async fn test_over_payment_leaves_paid_amount_unchanged() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    let statement = service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap();

    service
        .record_payment(&statement.statement_id, dec!(14000), "payer")
        .await
        .unwrap();

    let err = service
        .record_payment(&statement.statement_id, dec!(2000), "payer")
        .await
        .unwrap_err();
    assert!(matches!(err, StatementError::OverPayment { .. }));

    let unchanged = service
        .get_statement(
            &account.account_id,
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
        )
        .unwrap();
    assert_eq!(unchanged.paid_amount, dec!(14000));
    assert!(unchanged.paid_at.is_none());
}

#[tokio::test]
async fn test_non_positive_payment_rejected() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(50000), dec!(35000));
    let service = StatementService::new(db.pool.clone());

    let statement = service
        .create_statement(new_statement(&account.account_id, (2024, 5, 5), (2024, 6, 4)))
        .await
        .unwrap();

    let err = service
        .record_payment(&statement.statement_id, dec!(0), "payer")
        .await
        .unwrap_err();
    assert!(matches!(err, StatementError::InvalidData(_)));
}
