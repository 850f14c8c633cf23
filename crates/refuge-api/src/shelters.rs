//! Handlers for `/shelters` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/shelters` | Query: [`ShelterFilter`] |
//! | `POST`   | `/shelters` | Body: [`NewShelter`]; returns 201 |
//! | `GET`    | `/shelters/{id}` | 404 if not found |
//! | `PATCH`  | `/shelters/{id}` | Body: [`ShelterPatch`] |
//! | `DELETE` | `/shelters/{id}` | `?force=true` deactivates an occupied shelter |
//! | `GET`    | `/shelters/{id}/occupancy` | Occupancy report |
//! | `GET`    | `/shelters/by-registration/{id}` | Lookup by tax registration id |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use refuge_core::{
  entity::Shelter,
  filter::ShelterFilter,
  input::{NewShelter, ShelterPatch},
  report::ShelterOccupancy,
  store::ShelterStore,
};
use serde::Deserialize;

use crate::{RemovalBody, error::ApiError};

/// `GET /shelters`
pub async fn list<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<ShelterFilter>,
) -> Result<Json<Vec<Shelter>>, ApiError> {
  Ok(Json(store.list_shelters(filter).await?))
}

/// `POST /shelters`
pub async fn create<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewShelter>,
) -> Result<impl IntoResponse, ApiError> {
  let shelter = store.create_shelter(body).await?;
  Ok((StatusCode::CREATED, Json(shelter)))
}

/// `GET /shelters/{id}`
pub async fn get_one<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Shelter>, ApiError> {
  let shelter = store
    .get_shelter(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("shelter {id} not found")))?;
  Ok(Json(shelter))
}

/// `GET /shelters/by-registration/{id}`
pub async fn by_registration<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(registration): Path<String>,
) -> Result<Json<Shelter>, ApiError> {
  let shelter = store
    .find_shelter_by_registration(registration.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("shelter {registration:?} not found")))?;
  Ok(Json(shelter))
}

/// `PATCH /shelters/{id}`
pub async fn update<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<ShelterPatch>,
) -> Result<Json<Shelter>, ApiError> {
  Ok(Json(store.update_shelter(id, patch).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveParams {
  #[serde(default)]
  pub force: bool,
}

/// `DELETE /shelters/{id}[?force=true]`
pub async fn remove<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<RemoveParams>,
) -> Result<Json<RemovalBody>, ApiError> {
  let outcome = store.remove_shelter(id, params.force).await?;
  Ok(Json(RemovalBody { outcome }))
}

/// `GET /shelters/{id}/occupancy`
pub async fn occupancy<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ShelterOccupancy>, ApiError> {
  let report = store
    .shelter_occupancy(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("shelter {id} not found")))?;
  Ok(Json(report))
}
