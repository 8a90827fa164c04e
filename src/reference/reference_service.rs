use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

use crate::reference::Result;

use super::reference_model::{Currency, Region};
use super::reference_repository::ReferenceRepository;
use super::reference_traits::ReferenceServiceTrait;

/// Service for currency and region reference lookups
pub struct ReferenceService {
    reference_repository: ReferenceRepository,
}

impl ReferenceService {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            reference_repository: ReferenceRepository::new(pool),
        }
    }
}

impl ReferenceServiceTrait for ReferenceService {
    fn get_currency(&self, code: &str) -> Result<Currency> {
        self.reference_repository.get_currency(code)
    }

    fn list_currencies(&self) -> Result<Vec<Currency>> {
        self.reference_repository.list_currencies()
    }

    fn get_region(&self, code: &str) -> Result<Region> {
        self.reference_repository.get_region(code)
    }

    fn list_regions(&self) -> Result<Vec<Region>> {
        self.reference_repository.list_regions()
    }

    /// Rounds an amount to the currency's declared precision for display.
    /// Midpoints round away from zero.
    fn round_amount(&self, amount: Decimal, currency_code: &str) -> Result<Decimal> {
        let currency = self.reference_repository.get_currency(currency_code)?;
        Ok(amount.round_dp_with_strategy(
            currency.decimal_places as u32,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }
}
