use async_trait::async_trait;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::accounts::{AccountError, Result};

use super::accounts_model::{Account, NewAccount};
use super::accounts_repository::AccountRepository;
use super::accounts_traits::AccountServiceTrait;

/// Bounded number of fresh-read retries after a lost optimistic-concurrency
/// race, before the conflict is surfaced to the caller.
const MAX_VERSION_RETRIES: usize = 3;

/// Service for the account ledger
pub struct AccountService {
    account_repository: AccountRepository,
}

impl AccountService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            account_repository: AccountRepository::new(pool),
        }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account for company {} in {}",
            new_account.company_id, new_account.currency_code
        );
        self.account_repository.create(new_account)
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.account_repository.get_by_id(account_id)
    }

    fn list_accounts(&self, company_id_filter: Option<&str>) -> Result<Vec<Account>> {
        self.account_repository.list(company_id_filter)
    }

    /// Applies a credit adjustment, retrying lost version races with fresh
    /// reads up to `MAX_VERSION_RETRIES` attempts.
    async fn adjust_credit(&self, account_id: &str, delta: Decimal, actor: &str) -> Result<Account> {
        let mut attempts = 0;
        loop {
            match self
                .account_repository
                .adjust_credit(account_id, delta, None, actor)
            {
                Err(AccountError::VersionConflict(msg)) if attempts + 1 < MAX_VERSION_RETRIES => {
                    attempts += 1;
                    debug!(
                        "Retrying credit adjustment for account {} (attempt {}): {}",
                        account_id,
                        attempts + 1,
                        msg
                    );
                }
                other => return other,
            }
        }
    }

    async fn adjust_limit(&self, account_id: &str, delta: Decimal, actor: &str) -> Result<Account> {
        let mut attempts = 0;
        loop {
            match self
                .account_repository
                .adjust_limit(account_id, delta, None, actor)
            {
                Err(AccountError::VersionConflict(msg)) if attempts + 1 < MAX_VERSION_RETRIES => {
                    attempts += 1;
                    debug!(
                        "Retrying limit adjustment for account {} (attempt {}): {}",
                        account_id,
                        attempts + 1,
                        msg
                    );
                }
                other => return other,
            }
        }
    }

    async fn delete_account(&self, account_id: &str, actor: &str) -> Result<()> {
        self.account_repository.soft_delete(account_id, actor)
    }
}
