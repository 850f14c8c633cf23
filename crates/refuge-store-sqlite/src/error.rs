//! Error type for `refuge-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  UnknownTag { column: &'static str, value: String },
}

impl From<Error> for refuge_core::Error {
  fn from(e: Error) -> Self { refuge_core::Error::Backend(Box::new(e)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
