use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_amount;

use super::accounts_errors::{AccountError, Result};

/// Domain model representing a credit-card account.
///
/// Invariants, enforced before every write:
/// `0 <= available_credit <= credit_limit` and `statement_balance >= 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub company_id: String,
    pub region_code: String,
    pub currency_code: String,
    pub credit_limit: Decimal,
    pub available_credit: Decimal,
    pub statement_balance: Decimal,
    pub cycle_start_day: i32,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub company_id: String,
    pub region_code: String,
    pub currency_code: String,
    pub credit_limit: Decimal,
    pub available_credit: Decimal,
    pub statement_balance: Decimal,
    pub cycle_start_day: i32,
    pub created_by: String,
}

impl NewAccount {
    /// Validates the new account data against the ledger invariants
    pub fn validate(&self) -> Result<()> {
        if self.company_id.trim().is_empty() {
            return Err(AccountError::InvalidData(
                "Company id cannot be empty".to_string(),
            ));
        }
        if self.currency_code.trim().is_empty() {
            return Err(AccountError::InvalidData(
                "Currency code cannot be empty".to_string(),
            ));
        }
        if !(1..=28).contains(&self.cycle_start_day) {
            return Err(AccountError::InvalidData(format!(
                "Cycle start day must be between 1 and 28, got {}",
                self.cycle_start_day
            )));
        }
        if self.credit_limit < Decimal::ZERO {
            return Err(AccountError::InvalidData(
                "Credit limit cannot be negative".to_string(),
            ));
        }
        if self.available_credit < Decimal::ZERO || self.available_credit > self.credit_limit {
            return Err(AccountError::InvalidData(
                "Available credit must be between zero and the credit limit".to_string(),
            ));
        }
        if self.statement_balance < Decimal::ZERO {
            return Err(AccountError::InvalidData(
                "Statement balance cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for card accounts
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::card_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub account_id: String,
    pub company_id: String,
    pub region_code: String,
    pub currency_code: String,
    pub credit_limit: String,
    pub available_credit: String,
    pub statement_balance: String,
    pub cycle_start_day: i32,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            credit_limit: parse_amount(&db.credit_limit, "credit_limit"),
            available_credit: parse_amount(&db.available_credit, "available_credit"),
            statement_balance: parse_amount(&db.statement_balance, "statement_balance"),
            account_id: db.account_id,
            company_id: db.company_id,
            region_code: db.region_code,
            currency_code: db.currency_code,
            cycle_start_day: db.cycle_start_day,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            account_id: domain.account_id.unwrap_or_default(),
            company_id: domain.company_id,
            region_code: domain.region_code,
            currency_code: domain.currency_code,
            credit_limit: domain.credit_limit.to_string(),
            available_credit: domain.available_credit.to_string(),
            statement_balance: domain.statement_balance.to_string(),
            cycle_start_day: domain.cycle_start_day,
            created_at: now,
            created_by: domain.created_by,
            updated_at: now,
            updated_by: None,
            version: 1,
            is_deleted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_account() -> NewAccount {
        NewAccount {
            account_id: None,
            company_id: "company-1".to_string(),
            region_code: "SE".to_string(),
            currency_code: "SEK".to_string(),
            credit_limit: dec!(50000),
            available_credit: dec!(35000),
            statement_balance: dec!(15000),
            cycle_start_day: 5,
            created_by: "test".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_valid_account() {
        assert!(valid_account().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_cycle_day() {
        for day in [0, 29, -1] {
            let mut account = valid_account();
            account.cycle_start_day = day;
            assert!(account.validate().is_err(), "day {} should be rejected", day);
        }
    }

    #[test]
    fn test_validate_rejects_available_above_limit() {
        let mut account = valid_account();
        account.available_credit = dec!(50001);
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        let mut account = valid_account();
        account.statement_balance = dec!(-1);
        assert!(account.validate().is_err());

        let mut account = valid_account();
        account.credit_limit = dec!(-100);
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_db_round_trip_is_exact() {
        let mut account = valid_account();
        account.available_credit = dec!(12345.67);
        let db: AccountDB = account.into();
        assert_eq!(db.available_credit, "12345.67");
        let domain: Account = db.into();
        assert_eq!(domain.available_credit, dec!(12345.67));
    }
}
