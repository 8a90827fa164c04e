use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_amount;

use super::statements_errors::{Result, StatementError};

/// Domain model for one billing-period statement.
///
/// `(account_id, period_start)` identifies at most one statement; periods do
/// not overlap within an account. `paid_amount` never exceeds
/// `total_due_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub statement_id: String,
    pub account_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub currency_code: String,
    pub total_due_amount: Decimal,
    pub minimum_due_amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_amount: Decimal,
    pub paid_at: Option<NaiveDateTime>,
    pub pdf_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

/// Input model for closing a billing period into a statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<String>,
    pub account_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub currency_code: String,
    pub total_due_amount: Decimal,
    pub minimum_due_amount: Decimal,
    pub due_date: NaiveDate,
    pub pdf_url: Option<String>,
    pub created_by: String,
}

impl NewStatement {
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(StatementError::InvalidData(
                "Account id cannot be empty".to_string(),
            ));
        }
        if self.period_start >= self.period_end {
            return Err(StatementError::InvalidData(format!(
                "Period start {} must be before period end {}",
                self.period_start, self.period_end
            )));
        }
        if self.total_due_amount < Decimal::ZERO || self.minimum_due_amount < Decimal::ZERO {
            return Err(StatementError::InvalidData(
                "Due amounts cannot be negative".to_string(),
            ));
        }
        if self.minimum_due_amount > self.total_due_amount {
            return Err(StatementError::InvalidData(
                "Minimum due cannot exceed total due".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for statements
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::statements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatementDB {
    pub statement_id: String,
    pub account_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub currency_code: String,
    pub total_due_amount: String,
    pub minimum_due_amount: String,
    pub due_date: NaiveDate,
    pub paid_amount: String,
    pub paid_at: Option<NaiveDateTime>,
    pub pdf_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

impl From<StatementDB> for Statement {
    fn from(db: StatementDB) -> Self {
        Self {
            total_due_amount: parse_amount(&db.total_due_amount, "total_due_amount"),
            minimum_due_amount: parse_amount(&db.minimum_due_amount, "minimum_due_amount"),
            paid_amount: parse_amount(&db.paid_amount, "paid_amount"),
            statement_id: db.statement_id,
            account_id: db.account_id,
            period_start: db.period_start,
            period_end: db.period_end,
            currency_code: db.currency_code,
            due_date: db.due_date,
            paid_at: db.paid_at,
            pdf_url: db.pdf_url,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}

impl From<NewStatement> for StatementDB {
    fn from(domain: NewStatement) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            statement_id: domain.statement_id.unwrap_or_default(),
            account_id: domain.account_id,
            period_start: domain.period_start,
            period_end: domain.period_end,
            currency_code: domain.currency_code,
            total_due_amount: domain.total_due_amount.to_string(),
            minimum_due_amount: domain.minimum_due_amount.to_string(),
            due_date: domain.due_date,
            paid_amount: Decimal::ZERO.to_string(),
            paid_at: None,
            pdf_url: domain.pdf_url,
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

    fn valid_statement() -> NewStatement {
        NewStatement {
            statement_id: None,
            account_id: "a1".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            currency_code: "SEK".to_string(),
            total_due_amount: dec!(15000),
            minimum_due_amount: dec!(1000),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
            pdf_url: None,
            created_by: "test".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_valid_statement() {
        assert!(valid_statement().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_period() {
        let mut statement = valid_statement();
        statement.period_end = statement.period_start;
        assert!(statement.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_minimum_above_total() {
        let mut statement = valid_statement();
        statement.minimum_due_amount = dec!(20000);
        assert!(statement.validate().is_err());
    }

    #[test]
    fn test_new_statement_starts_unpaid() {
        let db: StatementDB = valid_statement().into();
        assert_eq!(db.paid_amount, "0");
        assert!(db.paid_at.is_none());
    }
}
