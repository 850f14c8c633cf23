//! Handlers for `/residents` endpoints, including a resident's family
//! contacts.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/residents` | Query: [`ResidentFilter`] |
//! | `POST`   | `/residents` | Body: [`NewResident`]; returns 201 |
//! | `GET`    | `/residents/awaiting` | Active residents without an active stay |
//! | `GET`    | `/residents/{id}` | Resident joined with its person |
//! | `PATCH`  | `/residents/{id}` | Body: [`ResidentPatch`] |
//! | `DELETE` | `/residents/{id}` | Deletes or discharges; `?hard=true` only deletes |
//! | `GET`    | `/residents/{id}/contacts` | `?emergency_only=true` |
//! | `POST`   | `/residents/{id}/contacts` | Body: [`NewFamilyContact`]; returns 201 |
//! | `GET`    | `/residents/by-record/{number}` | Lookup by record number |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use refuge_core::{
  entity::{FamilyContact, Resident, ResidentProfile},
  filter::ResidentFilter,
  input::{NewFamilyContact, NewResident, ResidentPatch},
  store::ShelterStore,
};
use serde::Deserialize;

use crate::{HardDelete, RemovalBody, error::ApiError};

/// `GET /residents`
pub async fn list<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<ResidentFilter>,
) -> Result<Json<Vec<ResidentProfile>>, ApiError> {
  Ok(Json(store.list_residents(filter).await?))
}

/// `GET /residents/awaiting`
pub async fn awaiting<S: ShelterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ResidentProfile>>, ApiError> {
  Ok(Json(store.residents_awaiting_admission().await?))
}

/// `POST /residents`
pub async fn create<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewResident>,
) -> Result<impl IntoResponse, ApiError> {
  let profile = store.create_resident(body).await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /residents/{id}`
pub async fn get_one<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ResidentProfile>, ApiError> {
  let profile = store
    .get_resident(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("resident {id} not found")))?;
  Ok(Json(profile))
}

/// `GET /residents/by-record/{number}`
pub async fn by_record<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(number): Path<String>,
) -> Result<Json<ResidentProfile>, ApiError> {
  let profile = store
    .find_resident_by_record(number.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("resident {number:?} not found")))?;
  Ok(Json(profile))
}

/// `PATCH /residents/{id}`
pub async fn update<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<ResidentPatch>,
) -> Result<Json<Resident>, ApiError> {
  Ok(Json(store.update_resident(id, patch).await?))
}

/// `DELETE /residents/{id}[?hard=true]`
pub async fn remove<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<HardDelete>,
) -> Result<Response, ApiError> {
  if params.hard {
    store.purge_resident(id).await?;
    return Ok(StatusCode::NO_CONTENT.into_response());
  }
  let outcome = store.remove_resident(id).await?;
  Ok(Json(RemovalBody { outcome }).into_response())
}

// ─── Family contacts ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ContactParams {
  #[serde(default)]
  pub emergency_only: bool,
}

/// `GET /residents/{id}/contacts[?emergency_only=true]`
pub async fn contacts<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<ContactParams>,
) -> Result<Json<Vec<FamilyContact>>, ApiError> {
  Ok(Json(store.list_family_contacts(id, params.emergency_only).await?))
}

/// `POST /residents/{id}/contacts`
pub async fn add_contact<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewFamilyContact>,
) -> Result<impl IntoResponse, ApiError> {
  let contact = store.add_family_contact(id, body).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}
