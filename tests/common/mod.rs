#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use cardledger_core::accounts::{Account, AccountRepository, NewAccount};
use cardledger_core::cards::{Card, CardRepository, CardStatus, NewCard};
use cardledger_core::db::{self, DbPool};

/// A disposable on-disk database; the tempdir is dropped with it.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    TestDb { pool, _dir: dir }
}

pub fn seed_account(pool: &Arc<DbPool>, credit_limit: Decimal, available: Decimal) -> Account {
    AccountRepository::new(pool.clone())
        .create(NewAccount {
            account_id: None,
            company_id: "11111111-2222-3333-4444-555555555555".to_string(),
            region_code: "SE".to_string(),
            currency_code: "SEK".to_string(),
            credit_limit,
            available_credit: available,
            statement_balance: Decimal::ZERO,
            cycle_start_day: 5,
            created_by: "seed".to_string(),
        })
        .expect("Failed to seed account")
}

pub fn seed_card(pool: &Arc<DbPool>, account_id: &str, expiry: NaiveDate) -> Card {
    CardRepository::new(pool.clone())
        .create(NewCard {
            card_id: None,
            account_id: account_id.to_string(),
            pan_token: "tok_test".to_string(),
            pan_last4: "4242".to_string(),
            expiry_date: expiry,
            created_by: "seed".to_string(),
        })
        .expect("Failed to seed card")
}

/// Issues a card and walks it to `active` through the repository.
pub fn seed_active_card(pool: &Arc<DbPool>, account_id: &str, expiry: NaiveDate) -> Card {
    let repo = CardRepository::new(pool.clone());
    let card = seed_card(pool, account_id, expiry);
    repo.update_status(&card.card_id, CardStatus::Active, None, "seed")
        .expect("Failed to activate card")
}

pub fn future_expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
}

pub fn past_expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 1, 31).unwrap()
}
