//! SQLite backend for the Refuge shelter registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every write runs the core rule engine
//! inside one immediate transaction.

mod encode;
mod queries;
mod schema;
mod store;
mod uow;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
