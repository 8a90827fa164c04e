use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::parse_amount;

use super::transactions_errors::{Result, TransactionError};

/// Transaction posting status. Rows are immutable once `posted`; the only
/// mutation is `pending -> posted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Posted,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Posted => "posted",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "posted" => Ok(TransactionStatus::Posted),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

/// Domain model for one ledger posting against a card.
///
/// `transaction_id` is the keyset pagination sort key: lexicographically
/// comparable and strictly monotonic with insertion order (UUIDv7 when
/// generated here). Amounts are signed: debits positive, credits/refunds
/// negative. `needs_reconciliation` marks a posting whose account credit
/// adjustment did not complete and awaits out-of-band repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub card_id: String,
    pub posted_at: NaiveDateTime,
    pub amount: Decimal,
    pub currency_code: String,
    pub exchange_rate: Decimal,
    pub fx_rate_date: Option<NaiveDate>,
    pub merchant_name: String,
    pub category: String,
    pub status: TransactionStatus,
    pub needs_reconciliation: bool,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

/// One page of a cursor walk over a card's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    /// Opaque token for the next page; `None` signals end-of-sequence.
    pub next_cursor: Option<String>,
}

/// Input model for recording a new transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub card_id: String,
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx_rate_date: Option<NaiveDate>,
    pub merchant_name: String,
    pub category: String,
    pub created_by: String,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.card_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Card id cannot be empty".to_string(),
            ));
        }
        if self.currency_code.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Currency code cannot be empty".to_string(),
            ));
        }
        if self.merchant_name.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Merchant name cannot be empty".to_string(),
            ));
        }
        if self.amount == Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Amount cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for transactions
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub transaction_id: String,
    pub card_id: String,
    pub posted_at: NaiveDateTime,
    pub amount: String,
    pub currency_code: String,
    pub exchange_rate: String,
    pub fx_rate_date: Option<NaiveDate>,
    pub merchant_name: String,
    pub category: String,
    pub status: String,
    pub needs_reconciliation: bool,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            amount: parse_amount(&db.amount, "amount"),
            exchange_rate: parse_amount(&db.exchange_rate, "exchange_rate"),
            status: TransactionStatus::from_str(&db.status).unwrap_or(TransactionStatus::Pending),
            transaction_id: db.transaction_id,
            card_id: db.card_id,
            posted_at: db.posted_at,
            currency_code: db.currency_code,
            fx_rate_date: db.fx_rate_date,
            merchant_name: db.merchant_name,
            category: db.category,
            needs_reconciliation: db.needs_reconciliation,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            transaction_id: domain.transaction_id.unwrap_or_default(),
            card_id: domain.card_id,
            posted_at: now,
            amount: domain.amount.to_string(),
            currency_code: domain.currency_code,
            exchange_rate: domain.exchange_rate.unwrap_or(Decimal::ONE).to_string(),
            fx_rate_date: domain.fx_rate_date,
            merchant_name: domain.merchant_name,
            category: domain.category,
            status: TransactionStatus::Pending.to_string(),
            needs_reconciliation: false,
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

    fn valid_transaction() -> NewTransaction {
        NewTransaction {
            transaction_id: None,
            card_id: "c1".to_string(),
            amount: dec!(125.50),
            currency_code: "SEK".to_string(),
            exchange_rate: None,
            fx_rate_date: None,
            merchant_name: "Espresso House".to_string(),
            category: "Food".to_string(),
            created_by: "test".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_debits_and_credits() {
        assert!(valid_transaction().validate().is_ok());

        let mut refund = valid_transaction();
        refund.amount = dec!(-50);
        assert!(refund.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_amount_and_blank_fields() {
        let mut t = valid_transaction();
        t.amount = Decimal::ZERO;
        assert!(t.validate().is_err());

        let mut t = valid_transaction();
        t.merchant_name = "  ".to_string();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_new_transaction_defaults() {
        let db: TransactionDB = valid_transaction().into();
        assert_eq!(db.status, "pending");
        assert_eq!(db.exchange_rate, "1");
        assert!(!db.needs_reconciliation);
        assert_eq!(db.version, 1);
    }

    #[test]
    fn test_amount_survives_storage_exactly() {
        let mut t = valid_transaction();
        t.amount = dec!(0.1);
        let db: TransactionDB = t.into();
        let domain: Transaction = db.into();
        assert_eq!(domain.amount, dec!(0.1));
    }
}
