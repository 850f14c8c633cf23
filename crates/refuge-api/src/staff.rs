//! Handlers for `/staff` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/staff` | Query: [`StaffFilter`] |
//! | `POST`   | `/staff` | Body: [`NewStaff`]; returns 201 |
//! | `GET`    | `/staff/{id}` | Staff joined with its person |
//! | `PATCH`  | `/staff/{id}` | Body: [`StaffPatch`] |
//! | `DELETE` | `/staff/{id}` | Deletes or deactivates; `?hard=true` only deletes |
//! | `POST`   | `/staff/{id}/transfer` | Body: `{"to_shelter_id": 3}` (or `null`) |
//! | `GET`    | `/staff/{id}/transfers` | Transfer trail, oldest first |
//! | `GET`    | `/staff/by-registration/{number}` | Lookup by registration number |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use refuge_core::{
  entity::{Staff, StaffProfile, StaffTransfer},
  filter::StaffFilter,
  input::{NewStaff, StaffPatch},
  store::ShelterStore,
};
use serde::Deserialize;

use crate::{HardDelete, RemovalBody, error::ApiError};

/// `GET /staff`
pub async fn list<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<StaffFilter>,
) -> Result<Json<Vec<StaffProfile>>, ApiError> {
  Ok(Json(store.list_staff(filter).await?))
}

/// `POST /staff`
pub async fn create<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewStaff>,
) -> Result<impl IntoResponse, ApiError> {
  let profile = store.create_staff(body).await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /staff/{id}`
pub async fn get_one<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<StaffProfile>, ApiError> {
  let profile = store
    .get_staff(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("staff {id} not found")))?;
  Ok(Json(profile))
}

/// `GET /staff/by-registration/{number}`
pub async fn by_registration<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(number): Path<String>,
) -> Result<Json<StaffProfile>, ApiError> {
  let profile = store
    .find_staff_by_registration(number.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("staff {number:?} not found")))?;
  Ok(Json(profile))
}

/// `PATCH /staff/{id}`
pub async fn update<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<StaffPatch>,
) -> Result<Json<Staff>, ApiError> {
  Ok(Json(store.update_staff(id, patch).await?))
}

/// `DELETE /staff/{id}[?hard=true]`
pub async fn remove<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<HardDelete>,
) -> Result<Response, ApiError> {
  if params.hard {
    store.purge_staff(id).await?;
    return Ok(StatusCode::NO_CONTENT.into_response());
  }
  let outcome = store.remove_staff(id).await?;
  Ok(Json(RemovalBody { outcome }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct TransferBody {
  /// Target shelter; `null` leaves the staff member unassigned.
  #[serde(default)]
  pub to_shelter_id: Option<i64>,
}

/// `POST /staff/{id}/transfer`
pub async fn transfer<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<TransferBody>,
) -> Result<impl IntoResponse, ApiError> {
  let transfer = store.transfer_staff(id, body.to_shelter_id).await?;
  Ok((StatusCode::CREATED, Json(transfer)))
}

/// `GET /staff/{id}/transfers`
pub async fn transfers<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<StaffTransfer>>, ApiError> {
  Ok(Json(store.list_transfers(id).await?))
}
