pub mod db;

pub mod accounts;
pub mod cards;
pub mod reference;
pub mod statements;
pub mod transactions;

pub mod errors;
pub mod schema;

pub(crate) mod utils;

pub use errors::{Error, Result};
