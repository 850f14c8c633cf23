//! Typed inputs for the rule engine: creation records and partial patches.
//!
//! Patches hold one `Option` per field; `None` leaves the field unchanged.
//! Nullable columns use `Option<Option<T>>`, where `Some(None)` clears the
//! value. In JSON, an absent key is `None` and an explicit `null` is
//! `Some(None)`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
  entity::{Address, FamilyContact, Person, Resident, Shelter, Staff},
  tags::{EmploymentStatus, ResidencyStatus, ShelterKind, Shift},
};

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// Person fields supplied when registering staff or a resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub tax_id:          String,
  pub name:            String,
  pub birth_date:      NaiveDate,
  pub phone:           String,
  #[serde(default)]
  pub secondary_phone: Option<String>,
  #[serde(default)]
  pub email:           Option<String>,
  pub address:         Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShelter {
  pub tax_registration_id:  String,
  pub name:                 String,
  pub capacity:             u32,
  pub address:              Address,
  pub phone:                String,
  pub kind:                 ShelterKind,
  pub legal_representative: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStaff {
  pub person:              NewPerson,
  pub registration_number: String,
  pub job_title:           String,
  pub hire_date:           NaiveDate,
  pub salary:              Decimal,
  pub shift:               Shift,
  #[serde(default)]
  pub shelter_id:          Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResident {
  pub person:              NewPerson,
  pub record_number:       String,
  pub entry_date:          NaiveDate,
  pub intake_reason:       String,
  #[serde(default)]
  pub chemical_dependency: bool,
  #[serde(default)]
  pub has_disability:      bool,
  #[serde(default)]
  pub disability_kind:     Option<String>,
}

/// A request to admit a resident to a shelter bed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admission {
  pub resident_id: i64,
  pub shelter_id:  i64,
  pub entry_date:  NaiveDate,
  #[serde(default)]
  pub slot:        Option<String>,
}

/// Closing data for an active stay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Discharge {
  /// Defaults to today when omitted.
  #[serde(default)]
  pub exit_date: Option<NaiveDate>,
  #[serde(default)]
  pub reason:    Option<String>,
  #[serde(default)]
  pub notes:     Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCareLog {
  pub resident_id: i64,
  pub staff_id:    i64,
  pub date:        NaiveDate,
  pub category:    String,
  pub description: String,
  #[serde(default)]
  pub notes:       Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFamilyContact {
  pub name:         String,
  pub relationship: String,
  pub phone:        String,
  #[serde(default)]
  pub emergency:    bool,
}

// ─── Patches ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterPatch {
  pub tax_registration_id:  Option<String>,
  pub name:                 Option<String>,
  pub capacity:             Option<u32>,
  pub address:              Option<Address>,
  pub phone:                Option<String>,
  pub kind:                 Option<ShelterKind>,
  pub legal_representative: Option<String>,
}

impl ShelterPatch {
  pub fn apply(self, shelter: &mut Shelter) {
    if let Some(v) = self.tax_registration_id { shelter.tax_registration_id = v; }
    if let Some(v) = self.name { shelter.name = v; }
    if let Some(v) = self.capacity { shelter.capacity = v; }
    if let Some(v) = self.address { shelter.address = v; }
    if let Some(v) = self.phone { shelter.phone = v; }
    if let Some(v) = self.kind { shelter.kind = v; }
    if let Some(v) = self.legal_representative { shelter.legal_representative = v; }
  }
}

/// Profile fields of a person. The role tag is not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonPatch {
  pub name:            Option<String>,
  pub birth_date:      Option<NaiveDate>,
  pub phone:           Option<String>,
  #[serde(deserialize_with = "double_option")]
  pub secondary_phone: Option<Option<String>>,
  #[serde(deserialize_with = "double_option")]
  pub email:           Option<Option<String>>,
  pub address:         Option<Address>,
}

impl PersonPatch {
  pub fn apply(self, person: &mut Person) {
    if let Some(v) = self.name { person.name = v; }
    if let Some(v) = self.birth_date { person.birth_date = v; }
    if let Some(v) = self.phone { person.phone = v; }
    if let Some(v) = self.secondary_phone { person.secondary_phone = v; }
    if let Some(v) = self.email { person.email = v; }
    if let Some(v) = self.address { person.address = v; }
  }
}

/// Employment fields of a staff member. Shelter assignment changes go
/// through a transfer so that they are audited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffPatch {
  pub registration_number: Option<String>,
  pub job_title:           Option<String>,
  pub hire_date:           Option<NaiveDate>,
  pub salary:              Option<Decimal>,
  pub shift:               Option<Shift>,
  pub status:              Option<EmploymentStatus>,
}

impl StaffPatch {
  pub fn apply(self, staff: &mut Staff) {
    if let Some(v) = self.registration_number { staff.registration_number = v; }
    if let Some(v) = self.job_title { staff.job_title = v; }
    if let Some(v) = self.hire_date { staff.hire_date = v; }
    if let Some(v) = self.salary { staff.salary = v; }
    if let Some(v) = self.shift { staff.shift = v; }
    if let Some(v) = self.status { staff.status = v; }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentPatch {
  pub record_number:       Option<String>,
  pub intake_reason:       Option<String>,
  pub chemical_dependency: Option<bool>,
  pub has_disability:      Option<bool>,
  #[serde(deserialize_with = "double_option")]
  pub disability_kind:     Option<Option<String>>,
  pub status:              Option<ResidencyStatus>,
  #[serde(deserialize_with = "double_option")]
  pub exit_date:           Option<Option<NaiveDate>>,
}

impl ResidentPatch {
  pub fn apply(self, resident: &mut Resident) {
    if let Some(v) = self.record_number { resident.record_number = v; }
    if let Some(v) = self.intake_reason { resident.intake_reason = v; }
    if let Some(v) = self.chemical_dependency { resident.chemical_dependency = v; }
    if let Some(v) = self.has_disability { resident.has_disability = v; }
    if let Some(v) = self.disability_kind { resident.disability_kind = v; }
    if let Some(v) = self.status { resident.status = v; }
    if let Some(v) = self.exit_date { resident.exit_date = v; }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyContactPatch {
  pub name:         Option<String>,
  pub relationship: Option<String>,
  pub phone:        Option<String>,
  pub emergency:    Option<bool>,
}

impl FamilyContactPatch {
  pub fn apply(self, contact: &mut FamilyContact) {
    if let Some(v) = self.name { contact.name = v; }
    if let Some(v) = self.relationship { contact.relationship = v; }
    if let Some(v) = self.phone { contact.phone = v; }
    if let Some(v) = self.emergency { contact.emergency = v; }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn person_patch_distinguishes_absent_from_null() {
    let patch: PersonPatch =
      serde_json::from_str(r#"{"email": null, "name": "Maria"}"#).unwrap();
    assert_eq!(patch.email, Some(None));
    assert_eq!(patch.secondary_phone, None);
    assert_eq!(patch.name.as_deref(), Some("Maria"));
  }

  #[test]
  fn staff_patch_applies_only_provided_fields() {
    let mut staff = Staff {
      staff_id:            1,
      person_id:           1,
      registration_number: "FUNC001".into(),
      job_title:           "Social worker".into(),
      hire_date:           NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
      salary:              Decimal::new(350000, 2),
      shift:               Shift::Morning,
      status:              EmploymentStatus::Active,
      shelter_id:          Some(3),
    };
    StaffPatch { shift: Some(Shift::Night), ..Default::default() }.apply(&mut staff);
    assert_eq!(staff.shift, Shift::Night);
    assert_eq!(staff.registration_number, "FUNC001");
    assert_eq!(staff.shelter_id, Some(3));
  }
}
