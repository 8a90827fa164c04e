use async_trait::async_trait;

use super::cards_model::{Card, CardStatus, NewCard};
use crate::cards::Result;

/// Trait defining the contract for card-lifecycle operations.
#[async_trait]
pub trait CardServiceTrait: Send + Sync {
    /// Issues a new card in the `inactive` state.
    async fn create_card(&self, new_card: NewCard) -> Result<Card>;

    fn get_card(&self, card_id: &str) -> Result<Card>;

    /// Lists an account's cards in creation order, soft-deleted excluded.
    fn list_cards_for_account(&self, account_id: &str) -> Result<Vec<Card>>;

    /// Applies a manual status transition, enforcing the transition table
    /// and stamping `updated_by` with the acting principal.
    async fn update_status(&self, card_id: &str, new_status: CardStatus, actor: &str)
        -> Result<Card>;

    async fn delete_card(&self, card_id: &str, actor: &str) -> Result<()>;
}
