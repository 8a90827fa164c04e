use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::statements::{Result, StatementError};

use super::statements_model::{NewStatement, Statement};
use super::statements_repository::StatementRepository;
use super::statements_traits::StatementServiceTrait;

const MAX_VERSION_RETRIES: usize = 3;

/// Service for the statement cycle
pub struct StatementService {
    statement_repository: StatementRepository,
}

impl StatementService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            statement_repository: StatementRepository::new(pool),
        }
    }
}

#[async_trait]
impl StatementServiceTrait for StatementService {
    async fn create_statement(&self, new_statement: NewStatement) -> Result<Statement> {
        debug!(
            "Closing statement period {}..{} for account {}",
            new_statement.period_start, new_statement.period_end, new_statement.account_id
        );
        self.statement_repository.create(new_statement)
    }

    fn get_statement(&self, account_id: &str, period_start: NaiveDate) -> Result<Statement> {
        self.statement_repository
            .get_by_period(account_id, period_start)
    }

    fn list_statements(&self, account_id: &str) -> Result<Vec<Statement>> {
        self.statement_repository.list_for_account(account_id)
    }

    async fn record_payment(
        &self,
        statement_id: &str,
        amount: Decimal,
        actor: &str,
    ) -> Result<Statement> {
        let mut attempts = 0;
        loop {
            match self
                .statement_repository
                .record_payment(statement_id, amount, None, actor)
            {
                Err(StatementError::VersionConflict(msg))
                    if attempts + 1 < MAX_VERSION_RETRIES =>
                {
                    attempts += 1;
                    debug!(
                        "Retrying payment on statement {} (attempt {}): {}",
                        statement_id,
                        attempts + 1,
                        msg
                    );
                }
                other => return other,
            }
        }
    }
}
