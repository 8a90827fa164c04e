use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::accounts::{AccountError, Result};
use crate::db::get_connection;
use crate::schema::card_accounts;
use crate::utils::parse_amount;

use super::accounts_model::{Account, AccountDB, NewAccount};

/// Repository for managing account data in the database.
///
/// Mutations follow the optimistic-concurrency discipline: read the row and
/// its version, compute the new state, then write conditioned on the version
/// being unchanged. A write that matches zero rows is a lost race.
pub struct AccountRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl AccountRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new account in the database
    pub fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let mut account_db: AccountDB = new_account.into();
        if account_db.account_id.is_empty() {
            account_db.account_id = uuid::Uuid::new_v4().to_string();
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        diesel::insert_into(card_accounts::table)
            .values(&account_db)
            .execute(&mut conn)
            .map_err(AccountError::from)?;

        Ok(account_db.into())
    }

    /// Retrieves an account by its ID, excluding soft-deleted rows
    pub fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let account = card_accounts::table
            .filter(card_accounts::account_id.eq(account_id))
            .filter(card_accounts::is_deleted.eq(false))
            .select(AccountDB::as_select())
            .first::<AccountDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("Account with id {} not found", account_id))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })?;

        Ok(account.into())
    }

    /// Lists accounts, optionally filtered by owning company
    pub fn list(&self, company_id_filter: Option<&str>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let mut query = card_accounts::table
            .filter(card_accounts::is_deleted.eq(false))
            .into_boxed();

        if let Some(company) = company_id_filter {
            query = query.filter(card_accounts::company_id.eq(company));
        }

        query
            .select(AccountDB::as_select())
            .order(card_accounts::created_at.asc())
            .load::<AccountDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(AccountError::from)
    }

    /// Applies `available_credit += delta` as a single conditional write.
    ///
    /// When `expected_version` is `None` the version read inside this call is
    /// used, which is the normal retry-loop path. Passing `Some(v)` makes the
    /// caller's stale read observable: a mismatch fails `VersionConflict`
    /// without touching the row.
    ///
    /// A negative result fails `InsufficientCredit`; a result above the
    /// credit limit is capped at the limit (a refund cannot create cash on a
    /// credit account).
    pub fn adjust_credit(
        &self,
        account_id: &str,
        delta: Decimal,
        expected_version: Option<i32>,
        actor: &str,
    ) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let existing = self.get_by_id(account_id)?;
        let expected = expected_version.unwrap_or(existing.version);
        if expected != existing.version {
            return Err(AccountError::VersionConflict(format!(
                "Account {} is at version {}, expected {}",
                account_id, existing.version, expected
            )));
        }

        let mut next_available = existing.available_credit + delta;
        if next_available < Decimal::ZERO {
            return Err(AccountError::InsufficientCredit {
                delta,
                available: existing.available_credit,
            });
        }
        if next_available > existing.credit_limit {
            next_available = existing.credit_limit;
        }

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            card_accounts::table
                .filter(card_accounts::account_id.eq(account_id))
                .filter(card_accounts::version.eq(expected))
                .filter(card_accounts::is_deleted.eq(false)),
        )
        .set((
            card_accounts::available_credit.eq(next_available.to_string()),
            card_accounts::version.eq(expected + 1),
            card_accounts::updated_at.eq(now),
            card_accounts::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(AccountError::from)?;

        if affected == 0 {
            return Err(AccountError::VersionConflict(format!(
                "Account {} was modified concurrently",
                account_id
            )));
        }

        self.get_by_id(account_id)
    }

    /// Moves `credit_limit` and `available_credit` by the same delta.
    ///
    /// This is the only path that changes the credit limit. Shrinking the
    /// limit below the outstanding balance (either value going negative)
    /// fails `InsufficientCredit`.
    pub fn adjust_limit(
        &self,
        account_id: &str,
        delta: Decimal,
        expected_version: Option<i32>,
        actor: &str,
    ) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let existing = self.get_by_id(account_id)?;
        let expected = expected_version.unwrap_or(existing.version);
        if expected != existing.version {
            return Err(AccountError::VersionConflict(format!(
                "Account {} is at version {}, expected {}",
                account_id, existing.version, expected
            )));
        }

        let next_limit = existing.credit_limit + delta;
        let next_available = existing.available_credit + delta;
        if next_limit < Decimal::ZERO || next_available < Decimal::ZERO {
            return Err(AccountError::InsufficientCredit {
                delta,
                available: existing.available_credit,
            });
        }

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            card_accounts::table
                .filter(card_accounts::account_id.eq(account_id))
                .filter(card_accounts::version.eq(expected))
                .filter(card_accounts::is_deleted.eq(false)),
        )
        .set((
            card_accounts::credit_limit.eq(next_limit.to_string()),
            card_accounts::available_credit.eq(next_available.to_string()),
            card_accounts::version.eq(expected + 1),
            card_accounts::updated_at.eq(now),
            card_accounts::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(AccountError::from)?;

        if affected == 0 {
            return Err(AccountError::VersionConflict(format!(
                "Account {} was modified concurrently",
                account_id
            )));
        }

        self.get_by_id(account_id)
    }

    /// Marks an account as deleted without destroying the row
    pub fn soft_delete(&self, account_id: &str, actor: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            card_accounts::table
                .filter(card_accounts::account_id.eq(account_id))
                .filter(card_accounts::is_deleted.eq(false)),
        )
        .set((
            card_accounts::is_deleted.eq(true),
            card_accounts::updated_at.eq(now),
            card_accounts::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(AccountError::from)?;

        if affected == 0 {
            return Err(AccountError::NotFound(format!(
                "Account with id {} not found",
                account_id
            )));
        }

        Ok(())
    }

    /// Raw balance read used by reconciliation checks in tests and repair
    /// tooling; bypasses the domain conversion.
    pub fn read_available_credit(&self, account_id: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let raw: String = card_accounts::table
            .filter(card_accounts::account_id.eq(account_id))
            .filter(card_accounts::is_deleted.eq(false))
            .select(card_accounts::available_credit)
            .first(&mut conn)
            .map_err(AccountError::from)?;

        Ok(parse_amount(&raw, "available_credit"))
    }
}
