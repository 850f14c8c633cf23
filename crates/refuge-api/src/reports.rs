//! Handlers for `/reports` and `/availability`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/statistics` | Headline counts |
//! | `GET`  | `/reports/occupancy` | Occupancy of every active shelter |
//! | `GET`  | `/reports/shifts` | Active staff per shift |
//! | `GET`  | `/availability` | One or more of `tax_id`, `email`, `registration_number`, `record_number`, `shelter_registration`; `exclude_id` only with keys of one owner |

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Query, State},
};
use refuge_core::{
  report::{ShelterOccupancy, SystemStatistics},
  store::ShelterStore,
  tags::Shift,
  uow::UniqueKey,
};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /reports/statistics`
pub async fn statistics<S: ShelterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<SystemStatistics>, ApiError> {
  Ok(Json(store.statistics().await?))
}

/// `GET /reports/occupancy`
pub async fn occupancy<S: ShelterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ShelterOccupancy>>, ApiError> {
  Ok(Json(store.occupancy_overview().await?))
}

/// `GET /reports/shifts`
pub async fn shifts<S: ShelterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<BTreeMap<Shift, u32>>, ApiError> {
  Ok(Json(store.staff_count_by_shift().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
  pub tax_id:               Option<String>,
  pub email:                Option<String>,
  pub registration_number:  Option<String>,
  pub record_number:        Option<String>,
  pub shelter_registration: Option<String>,
  /// Row to ignore, so an edit form can keep its own value. Only accepted
  /// when every supplied key is owned by the same collection (`tax_id` and
  /// `email` by persons, the others by their own table).
  pub exclude_id:           Option<i64>,
}

/// `GET /availability?tax_id=...[&exclude_id=...]`
///
/// Answers with one boolean per supplied key, e.g. `{"tax_id": false}`.
pub async fn availability<S: ShelterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<AvailabilityParams>,
) -> Result<Json<BTreeMap<&'static str, bool>>, ApiError> {
  let checks = [
    ("tax_id", UniqueKey::TaxId, params.tax_id),
    ("email", UniqueKey::Email, params.email),
    ("registration_number", UniqueKey::RegistrationNumber, params.registration_number),
    ("record_number", UniqueKey::RecordNumber, params.record_number),
    ("shelter_registration", UniqueKey::ShelterRegistration, params.shelter_registration),
  ];

  let supplied: Vec<_> =
    checks.into_iter().filter_map(|(name, key, value)| Some((name, key, value?))).collect();
  let Some(&(_, first, _)) = supplied.first() else {
    return Err(ApiError::BadRequest("no key to check was supplied".into()));
  };
  if params.exclude_id.is_some() && supplied.iter().any(|(_, key, _)| key.owner() != first.owner())
  {
    return Err(ApiError::BadRequest(
      "exclude_id is ambiguous across keys owned by different records".into(),
    ));
  }

  let mut answer = BTreeMap::new();
  for (name, key, value) in supplied {
    answer.insert(name, store.is_available(key, value, params.exclude_id).await?);
  }
  Ok(Json(answer))
}
