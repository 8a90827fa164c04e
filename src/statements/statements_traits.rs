use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::statements_model::{NewStatement, Statement};
use crate::statements::Result;

/// Trait defining the contract for statement-cycle operations.
#[async_trait]
pub trait StatementServiceTrait: Send + Sync {
    /// Closes a billing period; `(account_id, period_start)` is unique and
    /// periods must not overlap within an account.
    async fn create_statement(&self, new_statement: NewStatement) -> Result<Statement>;

    /// Keyed lookup by the composite uniqueness constraint.
    fn get_statement(&self, account_id: &str, period_start: NaiveDate) -> Result<Statement>;

    /// Most recent period first; the list is small so no cursor pagination.
    fn list_statements(&self, account_id: &str) -> Result<Vec<Statement>>;

    /// `paid_amount += amount`; exceeding `total_due_amount` fails
    /// `OverPayment`, reaching it stamps `paid_at`.
    async fn record_payment(&self, statement_id: &str, amount: Decimal, actor: &str)
        -> Result<Statement>;
}
