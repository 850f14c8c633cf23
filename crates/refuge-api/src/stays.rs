//! Handlers for `/stays` endpoints: admission and discharge.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stays` | Query: [`StayFilter`]; open stays unless `include_inactive=true` or `active=false` |
//! | `POST` | `/stays` | Body: [`Admission`]; returns 201 + the open stay |
//! | `GET`  | `/stays/{id}` | 404 if not found |
//! | `POST` | `/stays/{id}/discharge` | Body: [`Discharge`] (`{}` discharges today) |
//! | `GET`  | `/stays/{id}/tenure` | `?as_of=YYYY-MM-DD`, defaults to today |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use refuge_core::{
  entity::Stay,
  filter::StayFilter,
  input::{Admission, Discharge},
  report,
  store::ShelterStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `GET /stays`
pub async fn list<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(filter): Query<StayFilter>,
) -> Result<Json<Vec<Stay>>, ApiError> {
  Ok(Json(store.list_stays(filter).await?))
}

/// `POST /stays`
pub async fn admit<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<Admission>,
) -> Result<impl IntoResponse, ApiError> {
  let stay = store.admit(body).await?;
  Ok((StatusCode::CREATED, Json(stay)))
}

async fn fetch<S: ShelterStore>(store: &S, id: i64) -> Result<Stay, ApiError> {
  store
    .get_stay(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("stay {id} not found")))
}

/// `GET /stays/{id}`
pub async fn get_one<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Stay>, ApiError> {
  Ok(Json(fetch(store.as_ref(), id).await?))
}

/// `POST /stays/{id}/discharge`
pub async fn discharge<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<Discharge>,
) -> Result<Json<Stay>, ApiError> {
  Ok(Json(store.discharge(id, body).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct TenureParams {
  pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Tenure {
  pub stay_id: i64,
  pub days:    i64,
}

/// `GET /stays/{id}/tenure[?as_of=YYYY-MM-DD]`
pub async fn tenure<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Query(params): Query<TenureParams>,
) -> Result<Json<Tenure>, ApiError> {
  let stay = fetch(store.as_ref(), id).await?;
  let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());
  Ok(Json(Tenure {
    stay_id: id,
    days:    report::tenure_days(stay.entry_date, stay.exit_date, as_of),
  }))
}
