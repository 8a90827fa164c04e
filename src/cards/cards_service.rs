use async_trait::async_trait;
use chrono::Utc;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::cards::{CardError, Result};

use super::cards_model::{validate_transition, Card, CardStatus, NewCard};
use super::cards_repository::CardRepository;
use super::cards_traits::CardServiceTrait;

const MAX_VERSION_RETRIES: usize = 3;

/// Service for the card lifecycle state machine
pub struct CardService {
    card_repository: CardRepository,
}

impl CardService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            card_repository: CardRepository::new(pool),
        }
    }
}

#[async_trait]
impl CardServiceTrait for CardService {
    async fn create_card(&self, new_card: NewCard) -> Result<Card> {
        debug!("Issuing card for account {}", new_card.account_id);
        self.card_repository.create(new_card)
    }

    fn get_card(&self, card_id: &str) -> Result<Card> {
        self.card_repository.get_by_id(card_id)
    }

    fn list_cards_for_account(&self, account_id: &str) -> Result<Vec<Card>> {
        self.card_repository.list_for_account(account_id)
    }

    /// Moves a card through the status state machine.
    ///
    /// The transition is validated against the card's effective status, so a
    /// card past its expiry date accepts no manual transitions at all.
    async fn update_status(
        &self,
        card_id: &str,
        new_status: CardStatus,
        actor: &str,
    ) -> Result<Card> {
        let mut attempts = 0;
        loop {
            let card = self.card_repository.get_by_id(card_id)?;
            let current = card.effective_status(Utc::now().date_naive());
            validate_transition(current, new_status)?;

            match self.card_repository.update_status(
                card_id,
                new_status,
                Some(card.version),
                actor,
            ) {
                Err(CardError::VersionConflict(msg)) if attempts + 1 < MAX_VERSION_RETRIES => {
                    attempts += 1;
                    debug!(
                        "Retrying status update for card {} (attempt {}): {}",
                        card_id,
                        attempts + 1,
                        msg
                    );
                }
                other => return other,
            }
        }
    }

    async fn delete_card(&self, card_id: &str, actor: &str) -> Result<()> {
        self.card_repository.soft_delete(card_id, actor)
    }
}
