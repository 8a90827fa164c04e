use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::transactions;
use crate::transactions::{Result, TransactionError};

use super::transactions_model::{NewTransaction, Transaction, TransactionDB, TransactionStatus};

/// Repository for the append-mostly transaction ledger
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Appends a new `pending` transaction row.
    ///
    /// A generated id is UUIDv7, so insertion order and lexicographic order
    /// of `transaction_id` agree; a caller-supplied id must keep that
    /// property for pagination to stay stable.
    pub fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        let mut transaction_db: TransactionDB = new_transaction.into();
        if transaction_db.transaction_id.is_empty() {
            transaction_db.transaction_id = uuid::Uuid::now_v7().to_string();
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .execute(&mut conn)
            .map_err(TransactionError::from)?;

        Ok(transaction_db.into())
    }

    /// Retrieves a transaction by its ID, excluding soft-deleted rows
    pub fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let transaction = transactions::table
            .filter(transactions::transaction_id.eq(transaction_id))
            .filter(transactions::is_deleted.eq(false))
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => TransactionError::NotFound(format!(
                    "Transaction with id {} not found",
                    transaction_id
                )),
                _ => TransactionError::DatabaseError(e.to_string()),
            })?;

        Ok(transaction.into())
    }

    /// Fetches one raw page of a card's ledger, `transaction_id` descending.
    ///
    /// With a boundary this seeks strictly past the last-seen key
    /// (`transaction_id < boundary`), which keeps the walk stable under
    /// concurrent inserts — rows newer than the first page's start can never
    /// shift later pages. The caller asks for one row more than it intends
    /// to return to learn whether another page exists.
    pub fn list_page(
        &self,
        card_id: &str,
        fetch_limit: i64,
        before: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let mut query = transactions::table
            .filter(transactions::card_id.eq(card_id))
            .filter(transactions::is_deleted.eq(false))
            .into_boxed();

        if let Some(boundary) = before {
            query = query.filter(transactions::transaction_id.lt(boundary));
        }

        query
            .select(TransactionDB::as_select())
            .order(transactions::transaction_id.desc())
            .limit(fetch_limit)
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(TransactionError::from)
    }

    /// Transitions a transaction `pending -> posted`; idempotent when the
    /// row is already `posted`.
    pub fn settle(&self, transaction_id: &str) -> Result<Transaction> {
        let existing = self.get_by_id(transaction_id)?;
        if existing.status == TransactionStatus::Posted {
            return Ok(existing);
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            transactions::table
                .filter(transactions::transaction_id.eq(transaction_id))
                .filter(transactions::version.eq(existing.version))
                .filter(transactions::is_deleted.eq(false)),
        )
        .set((
            transactions::status.eq(TransactionStatus::Posted.to_string()),
            transactions::version.eq(existing.version + 1),
            transactions::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(TransactionError::from)?;

        if affected == 0 {
            // Lost the race; the concurrent writer can only have settled it.
            return self.get_by_id(transaction_id);
        }

        self.get_by_id(transaction_id)
    }

    /// Flags a transaction whose account adjustment did not complete, so the
    /// partial failure stays observable for out-of-band repair.
    pub fn mark_needs_reconciliation(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            transactions::table
                .filter(transactions::transaction_id.eq(transaction_id))
                .filter(transactions::is_deleted.eq(false)),
        )
        .set((
            transactions::needs_reconciliation.eq(true),
            transactions::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(TransactionError::from)?;

        if affected == 0 {
            return Err(TransactionError::NotFound(format!(
                "Transaction with id {} not found",
                transaction_id
            )));
        }

        self.get_by_id(transaction_id)
    }

    /// Lists transactions awaiting ledger repair
    pub fn list_needing_reconciliation(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;

        transactions::table
            .filter(transactions::needs_reconciliation.eq(true))
            .filter(transactions::is_deleted.eq(false))
            .select(TransactionDB::as_select())
            .order(transactions::transaction_id.asc())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(TransactionError::from)
    }
}
