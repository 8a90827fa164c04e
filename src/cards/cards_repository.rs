use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::cards::{CardError, Result};
use crate::db::get_connection;
use crate::schema::cards;

use super::cards_model::{Card, CardDB, CardStatus, NewCard};

/// Repository for managing card data in the database
pub struct CardRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl CardRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new card in the `inactive` state
    pub fn create(&self, new_card: NewCard) -> Result<Card> {
        new_card.validate()?;

        let mut card_db: CardDB = new_card.into();
        if card_db.card_id.is_empty() {
            card_db.card_id = uuid::Uuid::new_v4().to_string();
        }

        let mut conn = get_connection(&self.pool)
            .map_err(|e| CardError::DatabaseError(e.to_string()))?;

        diesel::insert_into(cards::table)
            .values(&card_db)
            .execute(&mut conn)
            .map_err(CardError::from)?;

        Ok(card_db.into())
    }

    /// Retrieves a card by its ID, excluding soft-deleted rows
    pub fn get_by_id(&self, card_id: &str) -> Result<Card> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CardError::DatabaseError(e.to_string()))?;

        let card = cards::table
            .filter(cards::card_id.eq(card_id))
            .filter(cards::is_deleted.eq(false))
            .select(CardDB::as_select())
            .first::<CardDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    CardError::NotFound(format!("Card with id {} not found", card_id))
                }
                _ => CardError::DatabaseError(e.to_string()),
            })?;

        Ok(card.into())
    }

    /// Lists an account's cards in creation order
    pub fn list_for_account(&self, account_id: &str) -> Result<Vec<Card>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CardError::DatabaseError(e.to_string()))?;

        cards::table
            .filter(cards::account_id.eq(account_id))
            .filter(cards::is_deleted.eq(false))
            .select(CardDB::as_select())
            .order(cards::created_at.asc())
            .load::<CardDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Card::from).collect())
            .map_err(CardError::from)
    }

    /// Writes a validated status transition as a conditional update.
    ///
    /// The caller has already checked the transition table; this writes the
    /// new status plus its side-effect timestamps, conditioned on `version`.
    pub fn update_status(
        &self,
        card_id: &str,
        new_status: CardStatus,
        expected_version: Option<i32>,
        actor: &str,
    ) -> Result<Card> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CardError::DatabaseError(e.to_string()))?;

        let existing = self.get_by_id(card_id)?;
        let expected = expected_version.unwrap_or(existing.version);
        if expected != existing.version {
            return Err(CardError::VersionConflict(format!(
                "Card {} is at version {}, expected {}",
                card_id, existing.version, expected
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let (activated, blocked): (Option<NaiveDateTime>, Option<NaiveDateTime>) =
            match (existing.status, new_status) {
                (CardStatus::Inactive, CardStatus::Active) => (Some(now), existing.blocked_at),
                (CardStatus::Active, CardStatus::Blocked) => (existing.activated_at, Some(now)),
                (CardStatus::Blocked, CardStatus::Active) => (existing.activated_at, None),
                _ => (existing.activated_at, existing.blocked_at),
            };

        let affected = diesel::update(
            cards::table
                .filter(cards::card_id.eq(card_id))
                .filter(cards::version.eq(expected))
                .filter(cards::is_deleted.eq(false)),
        )
        .set((
            cards::status.eq(new_status.to_string()),
            cards::activated_at.eq(activated),
            cards::blocked_at.eq(blocked),
            cards::version.eq(expected + 1),
            cards::updated_at.eq(now),
            cards::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(CardError::from)?;

        if affected == 0 {
            return Err(CardError::VersionConflict(format!(
                "Card {} was modified concurrently",
                card_id
            )));
        }

        self.get_by_id(card_id)
    }

    /// Marks a card as deleted without destroying the row
    pub fn soft_delete(&self, card_id: &str, actor: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CardError::DatabaseError(e.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(
            cards::table
                .filter(cards::card_id.eq(card_id))
                .filter(cards::is_deleted.eq(false)),
        )
        .set((
            cards::is_deleted.eq(true),
            cards::updated_at.eq(now),
            cards::updated_by.eq(Some(actor.to_string())),
        ))
        .execute(&mut conn)
        .map_err(CardError::from)?;

        if affected == 0 {
            return Err(CardError::NotFound(format!(
                "Card with id {} not found",
                card_id
            )));
        }

        Ok(())
    }
}
