//! Core types, rules, and trait definitions for the Refuge shelter registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! [`engine`] enforces every data-integrity rule against an abstract
//! [`uow::UnitOfWork`]; storage backends supply the unit of work and expose
//! the engine through the async [`store::ShelterStore`] facade.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod engine;
pub mod entity;
pub mod error;
pub mod filter;
pub mod input;
pub mod report;
pub mod store;
pub mod tags;
pub mod uow;

mod validate;

pub use error::{Entity, Error, Result};
