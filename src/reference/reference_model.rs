use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Domain model for a supported currency
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub currency_code: String,
    pub symbol: String,
    pub decimal_places: i32,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

/// Domain model for a supported region
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_code: String,
    pub name: String,
    pub timezone: String,
    pub locale: String,
    pub default_currency_code: String,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
}

/// Database model for currencies
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub currency_code: String,
    pub symbol: String,
    pub decimal_places: i32,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

/// Database model for regions
#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::regions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RegionDB {
    pub region_code: String,
    pub name: String,
    pub timezone: String,
    pub locale: String,
    pub default_currency_code: String,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: Option<String>,
    pub version: i32,
    pub is_deleted: bool,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Self {
            currency_code: db.currency_code,
            symbol: db.symbol,
            decimal_places: db.decimal_places,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}

impl From<RegionDB> for Region {
    fn from(db: RegionDB) -> Self {
        Self {
            region_code: db.region_code,
            name: db.name,
            timezone: db.timezone,
            locale: db.locale,
            default_currency_code: db.default_currency_code,
            created_at: db.created_at,
            created_by: db.created_by,
            updated_at: db.updated_at,
            updated_by: db.updated_by,
            version: db.version,
        }
    }
}
