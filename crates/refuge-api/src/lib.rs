//! JSON REST API for Refuge.
//!
//! Exposes an axum [`Router`] backed by any [`refuge_core::store::ShelterStore`].
//! Handlers only parse requests and map results; every rule lives in the
//! store's engine. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", refuge_api::api_router(Arc::new(store)))
//! ```

pub mod error;
pub mod records;
pub mod reports;
pub mod residents;
pub mod shelters;
pub mod staff;
pub mod stays;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use refuge_core::{engine::Removal, store::ShelterStore};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Response body of a delete-or-deactivate request.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemovalBody {
  pub outcome: Removal,
}

/// `?hard=true` turns a removal into a purge that never deactivates.
#[derive(Debug, Default, Deserialize)]
pub struct HardDelete {
  #[serde(default)]
  pub hard: bool,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ShelterStore + 'static,
{
  Router::new()
    // Shelters
    .route("/shelters", get(shelters::list::<S>).post(shelters::create::<S>))
    .route(
      "/shelters/{id}",
      get(shelters::get_one::<S>)
        .patch(shelters::update::<S>)
        .delete(shelters::remove::<S>),
    )
    .route("/shelters/{id}/occupancy", get(shelters::occupancy::<S>))
    .route("/shelters/by-registration/{id}", get(shelters::by_registration::<S>))
    // Staff
    .route("/staff", get(staff::list::<S>).post(staff::create::<S>))
    .route(
      "/staff/{id}",
      get(staff::get_one::<S>).patch(staff::update::<S>).delete(staff::remove::<S>),
    )
    .route("/staff/{id}/transfer", post(staff::transfer::<S>))
    .route("/staff/{id}/transfers", get(staff::transfers::<S>))
    .route("/staff/by-registration/{number}", get(staff::by_registration::<S>))
    // Residents
    .route("/residents", get(residents::list::<S>).post(residents::create::<S>))
    .route("/residents/awaiting", get(residents::awaiting::<S>))
    .route(
      "/residents/{id}",
      get(residents::get_one::<S>)
        .patch(residents::update::<S>)
        .delete(residents::remove::<S>),
    )
    .route(
      "/residents/{id}/contacts",
      get(residents::contacts::<S>).post(residents::add_contact::<S>),
    )
    .route("/residents/by-record/{number}", get(residents::by_record::<S>))
    // Stays
    .route("/stays", get(stays::list::<S>).post(stays::admit::<S>))
    .route("/stays/{id}", get(stays::get_one::<S>))
    .route("/stays/{id}/discharge", post(stays::discharge::<S>))
    .route("/stays/{id}/tenure", get(stays::tenure::<S>))
    // Care logs, contacts, persons
    .route(
      "/care-logs",
      get(records::list_care_logs::<S>).post(records::record_care_log::<S>),
    )
    .route(
      "/contacts/{id}",
      get(records::get_contact::<S>).patch(records::update_contact::<S>),
    )
    .route(
      "/persons/{id}",
      get(records::get_person::<S>).patch(records::update_person::<S>),
    )
    .route("/persons/by-tax-id/{tax_id}", get(records::person_by_tax_id::<S>))
    // Reports
    .route("/reports/statistics", get(reports::statistics::<S>))
    .route("/reports/occupancy", get(reports::occupancy::<S>))
    .route("/reports/shifts", get(reports::shifts::<S>))
    .route("/availability", get(reports::availability::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
