use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::statements;
use crate::statements::{Result, StatementError};

use super::statements_model::{NewStatement, Statement, StatementDB};

/// Repository for managing statement data in the database
pub struct StatementRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl StatementRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Closes a billing period into a statement row.
    ///
    /// Rejects a duplicate `(account_id, period_start)` and any period that
    /// overlaps an existing one for the account.
    pub fn create(&self, new_statement: NewStatement) -> Result<Statement> {
        new_statement.validate()?;

        let existing = self.list_for_account(&new_statement.account_id)?;
        for other in &existing {
            if other.period_start == new_statement.period_start {
                return Err(StatementError::InvalidData(format!(
                    "Statement for account {} starting {} already exists",
                    new_statement.account_id, new_statement.period_start
                )));
            }
            if new_statement.period_start <= other.period_end
                && other.period_start <= new_statement.period_end
            {
                return Err(StatementError::InvalidData(format!(
                    "Period {}..{} overlaps existing statement {}",
                    new_statement.period_start, new_statement.period_end, other.statement_id
                )));
            }
        }

        let mut statement_db: StatementDB = new_statement.into();
        if statement_db.statement_id.is_empty() {
            statement_db.statement_id = uuid::Uuid::new_v4().to_string();
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        diesel::insert_into(statements::table)
            .values(&statement_db)
            .execute(&mut conn)
            .map_err(StatementError::from)?;

        Ok(statement_db.into())
    }

    /// Retrieves a statement by the composite `(account_id, period_start)` key
    pub fn get_by_period(&self, account_id: &str, period_start: NaiveDate) -> Result<Statement> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        let statement = statements::table
            .filter(statements::account_id.eq(account_id))
            .filter(statements::period_start.eq(period_start))
            .filter(statements::is_deleted.eq(false))
            .select(StatementDB::as_select())
            .first::<StatementDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => StatementError::NotFound(format!(
                    "Statement for account {} starting {} not found",
                    account_id, period_start
                )),
                _ => StatementError::DatabaseError(e.to_string()),
            })?;

        Ok(statement.into())
    }

    /// Retrieves a statement by its ID
    pub fn get_by_id(&self, statement_id: &str) -> Result<Statement> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        let statement = statements::table
            .filter(statements::statement_id.eq(statement_id))
            .filter(statements::is_deleted.eq(false))
            .select(StatementDB::as_select())
            .first::<StatementDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => StatementError::NotFound(format!(
                    "Statement with id {} not found",
                    statement_id
                )),
                _ => StatementError::DatabaseError(e.to_string()),
            })?;

        Ok(statement.into())
    }

    /// Lists an account's statements, most recent period first
    pub fn list_for_account(&self, account_id: &str) -> Result<Vec<Statement>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        statements::table
            .filter(statements::account_id.eq(account_id))
            .filter(statements::is_deleted.eq(false))
            .select(StatementDB::as_select())
            .order(statements::period_start.desc())
            .load::<StatementDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Statement::from).collect())
            .map_err(StatementError::from)
    }

    /// Applies `paid_amount += amount` as a single conditional write.
    ///
    /// The result exceeding `total_due_amount` fails `OverPayment` with the
    /// row untouched; reaching full payment stamps `paid_at`.
    pub fn record_payment(
        &self,
        statement_id: &str,
        amount: Decimal,
        expected_version: Option<i32>,
        actor: &str,
    ) -> Result<Statement> {
        if amount <= Decimal::ZERO {
            return Err(StatementError::InvalidData(
                "Payment amount must be positive".to_string(),
            ));
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        let existing = self.get_by_id(statement_id)?;
        let expected = expected_version.unwrap_or(existing.version);
        if expected != existing.version {
            return Err(StatementError::VersionConflict(format!(
                "Statement {} is at version {}, expected {}",
                statement_id, existing.version, expected
            )));
        }

        let next_paid = existing.paid_amount + amount;
        if next_paid > existing.total_due_amount {
            return Err(StatementError::OverPayment {
                amount,
                total_due: existing.total_due_amount,
            });
        }

        let now = chrono::Utc::now().naive_utc();
        let paid_at = if next_paid == existing.total_due_amount {
            Some(now)
        } else {
            existing.paid_at
        };

        let affected = diesel::update(
            statements::table
                .filter(statements::statement_id.eq(statement_id))
                .filter(statements::version.eq(expected))
                .filter(statements::is_deleted.eq(false)),
        )
        .set((
            statements::paid_amount.eq(next_paid.to_string()),
            statements::paid_at.eq(paid_at),
            statements::version.eq(expected + 1),
            statements::updated_at.eq(now),
            statements::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(StatementError::from)?;

        if affected == 0 {
            return Err(StatementError::VersionConflict(format!(
                "Statement {} was modified concurrently",
                statement_id
            )));
        }

        self.get_by_id(statement_id)
    }

    /// Marks a statement as deleted without destroying the row
    pub fn soft_delete(&self, statement_id: &str, actor: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| StatementError::DatabaseError(e.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            statements::table
                .filter(statements::statement_id.eq(statement_id))
                .filter(statements::is_deleted.eq(false)),
        )
        .set((
            statements::is_deleted.eq(true),
            statements::updated_at.eq(now),
            statements::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(StatementError::from)?;

        if affected == 0 {
            return Err(StatementError::NotFound(format!(
                "Statement with id {} not found",
                statement_id
            )));
        }

        Ok(())
    }
}
