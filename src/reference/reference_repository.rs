use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::reference::{ReferenceError, Result};
use crate::schema::{currencies, regions};

use super::reference_model::{Currency, CurrencyDB, Region, RegionDB};

/// Repository for the static currency/region reference tables
pub struct ReferenceRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ReferenceRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_currency(&self, code: &str) -> Result<Currency> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        let currency = currencies::table
            .filter(currencies::currency_code.eq(code))
            .filter(currencies::is_deleted.eq(false))
            .select(CurrencyDB::as_select())
            .first::<CurrencyDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ReferenceError::NotFound(format!("Currency {} not found", code))
                }
                _ => ReferenceError::DatabaseError(e.to_string()),
            })?;

        Ok(currency.into())
    }

    pub fn list_currencies(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        currencies::table
            .filter(currencies::is_deleted.eq(false))
            .select(CurrencyDB::as_select())
            .order(currencies::currency_code.asc())
            .load::<CurrencyDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Currency::from).collect())
            .map_err(ReferenceError::from)
    }

    pub fn get_region(&self, code: &str) -> Result<Region> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        let region = regions::table
            .filter(regions::region_code.eq(code))
            .filter(regions::is_deleted.eq(false))
            .select(RegionDB::as_select())
            .first::<RegionDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ReferenceError::NotFound(format!("Region {} not found", code))
                }
                _ => ReferenceError::DatabaseError(e.to_string()),
            })?;

        Ok(region.into())
    }

    pub fn list_regions(&self) -> Result<Vec<Region>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        regions::table
            .filter(regions::is_deleted.eq(false))
            .select(RegionDB::as_select())
            .order(regions::region_code.asc())
            .load::<RegionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Region::from).collect())
            .map_err(ReferenceError::from)
    }

    /// Inserts or replaces a currency row. Reference data is maintained by
    /// migrations; this exists for controlled baseline updates.
    pub fn upsert_currency(&self, currency: CurrencyDB) -> Result<Currency> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        diesel::replace_into(currencies::table)
            .values(&currency)
            .execute(&mut conn)
            .map_err(ReferenceError::from)?;

        Ok(currency.into())
    }

    pub fn upsert_region(&self, region: RegionDB) -> Result<Region> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ReferenceError::DatabaseError(e.to_string()))?;

        diesel::replace_into(regions::table)
            .values(&region)
            .execute(&mut conn)
            .map_err(ReferenceError::from)?;

        Ok(region.into())
    }
}
