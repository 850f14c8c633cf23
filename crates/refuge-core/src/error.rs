//! Error types for `refuge-core`.

use std::fmt;

use thiserror::Error;

/// The entity collections a failure can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  Person,
  Shelter,
  Staff,
  Resident,
  Stay,
  CareLog,
  FamilyContact,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Entity::Person => "person",
      Entity::Shelter => "shelter",
      Entity::Staff => "staff member",
      Entity::Resident => "resident",
      Entity::Stay => "stay",
      Entity::CareLog => "care log",
      Entity::FamilyContact => "family contact",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A uniqueness rule would be violated.
  #[error("{field} {value:?} is already registered")]
  DuplicateKey { field: &'static str, value: String },

  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("shelter {shelter_id} is full (capacity {capacity})")]
  CapacityExceeded { shelter_id: i64, capacity: u32 },

  #[error("resident {resident_id} already has active stay {stay_id}")]
  AlreadyAdmitted { resident_id: i64, stay_id: i64 },

  #[error("stay {0} is already discharged")]
  AlreadyDischarged(i64),

  #[error("shelter {shelter_id} still has {occupants} active occupant(s)")]
  HasActiveOccupants { shelter_id: i64, occupants: u32 },

  /// Hard deletion refused because history rows reference the entity.
  #[error("{entity} {id} has recorded history and cannot be deleted")]
  HasHistory { entity: Entity, id: i64 },

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("storage error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// A stable snake_case tag for the failure kind.
  pub fn kind(&self) -> &'static str {
    match self {
      Error::DuplicateKey { .. } => "duplicate_key",
      Error::NotFound { .. } => "not_found",
      Error::CapacityExceeded { .. } => "capacity_exceeded",
      Error::AlreadyAdmitted { .. } => "already_admitted",
      Error::AlreadyDischarged(_) => "already_discharged",
      Error::HasActiveOccupants { .. } => "has_active_occupants",
      Error::HasHistory { .. } => "has_history",
      Error::Validation(_) => "validation_error",
      Error::Backend(_) => "backend",
    }
  }

  pub(crate) fn not_found(entity: Entity, id: i64) -> Self {
    Error::NotFound { entity, id }
  }

  pub(crate) fn invalid(message: impl Into<String>) -> Self {
    Error::Validation(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
