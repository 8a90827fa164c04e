use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction, TransactionPage};
use crate::transactions::Result;

/// Trait defining the contract for transaction-ledger operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Keyset-paginated listing, `transaction_id` descending. A `None`
    /// cursor starts from the most recent row; repeated calls chaining
    /// `next_cursor` visit every row exactly once with no duplicates.
    fn list_transactions(
        &self,
        card_id: &str,
        limit: Option<i64>,
        cursor: Option<&str>,
    ) -> Result<TransactionPage>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Appends a `pending` posting and adjusts the owning account's
    /// available credit; a failed adjustment flags the row for
    /// reconciliation instead of dropping it.
    async fn record_transaction(
        &self,
        new_transaction: NewTransaction,
        actor: &str,
    ) -> Result<Transaction>;

    /// `pending -> posted`, idempotent.
    async fn settle_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Postings whose ledger adjustment is still outstanding.
    fn list_transactions_needing_reconciliation(&self) -> Result<Vec<Transaction>>;
}
