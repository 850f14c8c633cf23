//! Handlers for care logs, family contacts and person profiles.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/care-logs` | Query: [`CareLogFilter`]; newest first |
//! | `POST`  | `/care-logs` | Body: [`NewCareLog`]; returns 201 |
//! | `GET`   | `/contacts/{id}` | 404 if not found |
//! | `PATCH` | `/contacts/{id}` | Body: [`FamilyContactPatch`] |
//! | `GET`   | `/persons/{id}` | 404 if not found |
//! | `PATCH` | `/persons/{id}` | Body: [`PersonPatch`]; `null` clears email or secondary phone |
//! | `GET`   | `/persons/by-tax-id/{tax_id}` | Lookup across both roles |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use refuge_core::{
  entity::{CareLog, FamilyContact, Person},
  filter::CareLogFilter,
  input::{FamilyContactPatch, NewCareLog, PersonPatch},
  store::ShelterStore,
};

use crate::error::ApiError;

// ─── Care logs ───────────────────────────────────────────────────────────────

/// `GET /care-logs`
pub async fn list_care_logs<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<CareLogFilter>,
) -> Result<Json<Vec<CareLog>>, ApiError> {
  Ok(Json(store.list_care_logs(filter).await?))
}

/// `POST /care-logs`
pub async fn record_care_log<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCareLog>,
) -> Result<impl IntoResponse, ApiError> {
  let log = store.record_care_log(body).await?;
  Ok((StatusCode::CREATED, Json(log)))
}

// ─── Family contacts ─────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_contact<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<FamilyContact>, ApiError> {
  let contact = store
    .get_family_contact(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("family contact {id} not found")))?;
  Ok(Json(contact))
}

/// `PATCH /contacts/{id}`
pub async fn update_contact<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<FamilyContactPatch>,
) -> Result<Json<FamilyContact>, ApiError> {
  Ok(Json(store.update_family_contact(id, patch).await?))
}

// ─── Persons ─────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_person<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .get_person(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

/// `GET /persons/by-tax-id/{tax_id}`
pub async fn person_by_tax_id<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(tax_id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .find_person_by_tax_id(tax_id.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person with tax id {tax_id:?} not found")))?;
  Ok(Json(person))
}

/// `PATCH /persons/{id}`
pub async fn update_person<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<PersonPatch>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(store.update_person(id, patch).await?))
}
