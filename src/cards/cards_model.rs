use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cards_errors::{CardError, Result};

/// Card lifecycle states.
///
/// `inactive`, `active` and `blocked` are persisted; `expired` is derived
/// from `expiry_date` and never written by a manual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Inactive,
    Active,
    Blocked,
    Expired,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Inactive => "inactive",
            CardStatus::Active => "active",
            CardStatus::Blocked => "blocked",
            CardStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inactive" => Ok(CardStatus::Inactive),
            "active" => Ok(CardStatus::Active),
            "blocked" => Ok(CardStatus::Blocked),
            "expired" => Ok(CardStatus::Expired),
            other => Err(CardError::InvalidData(format!(
                "Unknown card status '{}'",
                other
            ))),
        }
    }
}

/// Checks a requested manual transition against the legal transition table.
/// `expired` is system-derived and rejected as a manual target; an expired
/// card accepts no further transitions.
pub fn validate_transition(from: CardStatus, to: CardStatus) -> Result<()> {
    use CardStatus::*;
    match (from, to) {
        (Inactive, Active) | (Active, Blocked) | (Blocked, Active) => Ok(()),
        (f, t) => Err(CardError::InvalidTransition {
            from: f.to_string(),
            to: t.to_string(),
        }),
    }
}

/// Domain model representing a card drawing against an account.
///
/// The full PAN is never stored: only an opaque token (kept in storage) and
/// the last four digits surface here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_id: String,
    pub account_id: String,
    pub pan_last4: String,
    pub expiry_date: NaiveDate,
    pub status: CardStatus,
    pub activated_at: Option<NaiveDateTime>,
    pub blocked_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

impl Card {
    /// The status as seen by callers: an `active` card past its expiry date
    /// is `expired`, with no explicit transition recorded.
    pub fn effective_status(&self, today: NaiveDate) -> CardStatus {
        if self.status == CardStatus::Active && self.expiry_date < today {
            CardStatus::Expired
        } else {
            self.status
        }
    }

    /// Whether transactions may post against this card right now.
    pub fn is_active_for_posting(&self, today: NaiveDate) -> bool {
        self.effective_status(today) == CardStatus::Active
    }
}

/// Input model for issuing a new card. Cards always start `inactive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    pub account_id: String,
    pub pan_token: String,
    pub pan_last4: String,
    pub expiry_date: NaiveDate,
    pub created_by: String,
}

impl NewCard {
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(CardError::InvalidData(
                "Account id cannot be empty".to_string(),
            ));
        }
        if self.pan_token.trim().is_empty() {
            return Err(CardError::InvalidData(
                "PAN token cannot be empty".to_string(),
            ));
        }
        if self.pan_last4.len() != 4 || !self.pan_last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidData(
                "PAN last4 must be exactly four digits".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for cards
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardDB {
    pub card_id: String,
    pub account_id: String,
    pub pan_token: String,
    pub pan_last4: String,
    pub expiry_date: NaiveDate,
    pub status: String,
    pub activated_at: Option<NaiveDateTime>,
    pub blocked_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

impl From<CardDB> for Card {
    fn from(db: CardDB) -> Self {
        Self {
            status: CardStatus::from_str(&db.status).unwrap_or(CardStatus::Inactive),
            card_id: db.card_id,
            account_id: db.account_id,
            pan_last4: db.pan_last4,
            expiry_date: db.expiry_date,
            activated_at: db.activated_at,
            blocked_at: db.blocked_at,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}

impl From<NewCard> for CardDB {
    fn from(domain: NewCard) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            card_id: domain.card_id.unwrap_or_default(),
            account_id: domain.account_id,
            pan_token: domain.pan_token,
            pan_last4: domain.pan_last4,
            expiry_date: domain.expiry_date,
            status: CardStatus::Inactive.to_string(),
            activated_at: None,
            blocked_at: None,
            created_at: now,
            created_by: domain.created_by,
            updated_at: now,
            updated_by: None,
            version: 1,
            is_deleted: false,
        }
    }
}
