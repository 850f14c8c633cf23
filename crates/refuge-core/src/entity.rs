//! Persisted entities.
//!
//! Every entity is identified by a surrogate `i64` key assigned by the store
//! and never changed afterwards. Entities are plain records; derived values
//! such as occupancy or tenure live in [`crate::report`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tags::{EmploymentStatus, PersonRole, ResidencyStatus, ShelterKind, Shift};

// ─── Shared ──────────────────────────────────────────────────────────────────

/// A postal address; shared by persons and shelters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub street:      String,
  pub number:      Option<String>,
  pub district:    String,
  pub city:        String,
  /// Two-letter state code.
  pub state:       String,
  pub postal_code: Option<String>,
}

// ─── People ──────────────────────────────────────────────────────────────────

/// Identity and contact data common to staff and residents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:       i64,
  /// National tax ID; unique across both roles.
  pub tax_id:          String,
  pub name:            String,
  pub birth_date:      NaiveDate,
  pub phone:           String,
  pub secondary_phone: Option<String>,
  pub email:           Option<String>,
  pub address:         Address,
  pub role:            PersonRole,
  pub active:          bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
  pub staff_id:            i64,
  pub person_id:           i64,
  pub registration_number: String,
  pub job_title:           String,
  pub hire_date:           NaiveDate,
  pub salary:              Decimal,
  pub shift:               Shift,
  pub status:              EmploymentStatus,
  /// The shelter this staff member works at, if assigned.
  pub shelter_id:          Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
  pub resident_id:         i64,
  pub person_id:           i64,
  pub record_number:       String,
  pub entry_date:          NaiveDate,
  pub exit_date:           Option<NaiveDate>,
  pub intake_reason:       String,
  pub chemical_dependency: bool,
  pub has_disability:      bool,
  pub disability_kind:     Option<String>,
  pub status:              ResidencyStatus,
}

/// A staff record joined with its person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
  pub person: Person,
  pub staff:  Staff,
}

impl StaffProfile {
  /// Employed and not soft-deactivated.
  pub fn is_active(&self) -> bool {
    self.person.active && self.staff.status == EmploymentStatus::Active
  }
}

/// A resident record joined with its person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentProfile {
  pub person:   Person,
  pub resident: Resident,
}

impl ResidentProfile {
  pub fn is_active(&self) -> bool {
    self.person.active && self.resident.status == ResidencyStatus::Active
  }
}

// ─── Shelters ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
  pub shelter_id:           i64,
  pub tax_registration_id:  String,
  pub name:                 String,
  /// Number of beds; always at least one.
  pub capacity:             u32,
  pub address:              Address,
  pub phone:                String,
  pub kind:                 ShelterKind,
  pub legal_representative: String,
  pub active:               bool,
}

// ─── Episodes and history ────────────────────────────────────────────────────

/// One admission episode of a resident at a shelter.
///
/// An active stay counts against the shelter's capacity. Discharge sets
/// `exit_date` and clears `active`; a stay is never reactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
  pub stay_id:     i64,
  pub resident_id: i64,
  pub shelter_id:  i64,
  pub entry_date:  NaiveDate,
  pub exit_date:   Option<NaiveDate>,
  /// Bed or slot label, e.g. `"V001"`.
  pub slot:        Option<String>,
  pub active:      bool,
  pub exit_reason: Option<String>,
  pub notes:       Option<String>,
}

/// A service or visit delivered by a staff member to a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareLog {
  pub care_log_id: i64,
  pub resident_id: i64,
  pub staff_id:    i64,
  pub date:        NaiveDate,
  pub category:    String,
  pub description: String,
  pub notes:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyContact {
  pub contact_id:   i64,
  pub resident_id:  i64,
  pub name:         String,
  pub relationship: String,
  pub phone:        String,
  pub emergency:    bool,
}

/// One entry of the append-only staff transfer trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffTransfer {
  pub transfer_id:     i64,
  pub staff_id:        i64,
  pub from_shelter_id: Option<i64>,
  pub to_shelter_id:   Option<i64>,
  pub recorded_at:     DateTime<Utc>,
}
