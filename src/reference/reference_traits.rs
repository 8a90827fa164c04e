use rust_decimal::Decimal;

use super::reference_model::{Currency, Region};
use crate::reference::Result;

/// Trait defining the contract for currency/region reference lookups.
pub trait ReferenceServiceTrait: Send + Sync {
    fn get_currency(&self, code: &str) -> Result<Currency>;
    fn list_currencies(&self) -> Result<Vec<Currency>>;
    fn get_region(&self, code: &str) -> Result<Region>;
    fn list_regions(&self) -> Result<Vec<Region>>;

    /// Rounds an amount using the currency's `decimal_places`.
    fn round_amount(&self, amount: Decimal, currency_code: &str) -> Result<Decimal>;
}
