use async_trait::async_trait;
use chrono::Utc;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use std::sync::Arc;

use crate::accounts::{AccountService, AccountServiceTrait};
use crate::cards::CardRepository;
use crate::transactions::{Result, TransactionError};

use super::transactions_constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use super::transactions_cursor::{decode_cursor, encode_cursor};
use super::transactions_model::{NewTransaction, Transaction, TransactionPage};
use super::transactions_repository::TransactionRepository;
use super::transactions_traits::TransactionServiceTrait;

/// Service for the transaction ledger and its pagination protocol
pub struct TransactionService {
    transaction_repository: TransactionRepository,
    card_repository: CardRepository,
    account_service: AccountService,
}

impl TransactionService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            transaction_repository: TransactionRepository::new(pool.clone()),
            card_repository: CardRepository::new(pool.clone()),
            account_service: AccountService::new(pool),
        }
    }

    fn effective_limit(limit: Option<i64>) -> i64 {
        match limit {
            Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    /// Walks one page of a card's ledger with keyset pagination.
    ///
    /// Fetches `limit + 1` rows; a full overfetch means another page exists,
    /// and the cursor encodes the last *returned* row's id.
    fn list_transactions(
        &self,
        card_id: &str,
        limit: Option<i64>,
        cursor: Option<&str>,
    ) -> Result<TransactionPage> {
        let limit = Self::effective_limit(limit);
        let boundary = cursor.map(decode_cursor).transpose()?;

        let mut transactions = self.transaction_repository.list_page(
            card_id,
            limit + 1,
            boundary.as_deref(),
        )?;

        let next_cursor = if transactions.len() as i64 > limit {
            transactions.truncate(limit as usize);
            transactions
                .last()
                .map(|t| encode_cursor(&t.transaction_id))
        } else {
            None
        };

        Ok(TransactionPage {
            transactions,
            next_cursor,
        })
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository.get_by_id(transaction_id)
    }

    /// Records a posting against an active card.
    ///
    /// Two-step protocol: append the `pending` row, then adjust the owning
    /// account's available credit by `-amount` (the account service retries
    /// lost version races internally). If the adjustment ultimately fails
    /// the row is flagged `needs_reconciliation` and still returned — the
    /// posting itself succeeded and must never silently disappear.
    async fn record_transaction(
        &self,
        new_transaction: NewTransaction,
        actor: &str,
    ) -> Result<Transaction> {
        new_transaction.validate()?;

        let card = self.card_repository.get_by_id(&new_transaction.card_id)?;
        if !card.is_active_for_posting(Utc::now().date_naive()) {
            return Err(TransactionError::CardNotActive(card.card_id));
        }

        let amount = new_transaction.amount;
        let transaction = self.transaction_repository.create(new_transaction)?;
        debug!(
            "Recorded transaction {} of {} against card {}",
            transaction.transaction_id, amount, transaction.card_id
        );

        match self
            .account_service
            .adjust_credit(&card.account_id, -amount, actor)
            .await
        {
            Ok(_) => Ok(transaction),
            Err(e) => {
                warn!(
                    "Credit adjustment for transaction {} on account {} failed ({}); flagging for reconciliation",
                    transaction.transaction_id, card.account_id, e
                );
                self.transaction_repository
                    .mark_needs_reconciliation(&transaction.transaction_id)
            }
        }
    }

    /// `pending -> posted`; idempotent when already `posted`.
    async fn settle_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository.settle(transaction_id)
    }

    fn list_transactions_needing_reconciliation(&self) -> Result<Vec<Transaction>> {
        self.transaction_repository.list_needing_reconciliation()
    }
}
