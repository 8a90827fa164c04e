use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, NewAccount};
use crate::accounts::Result;

/// Trait defining the contract for account-ledger operations.
///
/// Mutations follow the optimistic-concurrency discipline: a lost race is
/// retried internally with fresh reads, bounded, before `VersionConflict`
/// reaches the caller.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    fn get_account(&self, account_id: &str) -> Result<Account>;

    /// Lists accounts, optionally scoped to one owning company.
    fn list_accounts(&self, company_id_filter: Option<&str>) -> Result<Vec<Account>>;

    /// `available_credit += delta`; negative delta for a posted debit,
    /// positive for a payment or reversal.
    async fn adjust_credit(&self, account_id: &str, delta: Decimal, actor: &str)
        -> Result<Account>;

    /// Explicit limit change; the only operation that moves `credit_limit`.
    async fn adjust_limit(&self, account_id: &str, delta: Decimal, actor: &str) -> Result<Account>;

    async fn delete_account(&self, account_id: &str, actor: &str) -> Result<()>;
}
