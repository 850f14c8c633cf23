//! The `UnitOfWork` trait: the engine's view of one open transaction.
//!
//! A backend hands the engine a unit of work scoped to a single transaction.
//! The engine reads current counts and uniqueness through it and writes its
//! result through it; the backend commits only if the engine returns `Ok`
//! and rolls back on every other exit path.
//!
//! Implementations must make the transaction exclusive for writers (a write
//! lock, serializable isolation, or equivalent) so that a check followed by
//! an insert cannot interleave with another unit of work.

use chrono::{DateTime, Utc};

use crate::{
  entity::{
    CareLog, FamilyContact, Person, Resident, Shelter, Staff, StaffTransfer, Stay,
  },
  input::{Admission, NewCareLog, NewFamilyContact, NewPerson, NewShelter},
  tags::PersonRole,
  Entity, Result,
};

/// Which unique column a lookup is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
  TaxId,
  Email,
  RegistrationNumber,
  RecordNumber,
  ShelterRegistration,
}

impl UniqueKey {
  pub fn field(self) -> &'static str {
    match self {
      UniqueKey::TaxId => "tax id",
      UniqueKey::Email => "email",
      UniqueKey::RegistrationNumber => "registration number",
      UniqueKey::RecordNumber => "record number",
      UniqueKey::ShelterRegistration => "tax registration id",
    }
  }

  /// The collection whose ids an `exclude` argument refers to.
  pub fn owner(self) -> Entity {
    match self {
      UniqueKey::TaxId | UniqueKey::Email => Entity::Person,
      UniqueKey::RegistrationNumber => Entity::Staff,
      UniqueKey::RecordNumber => Entity::Resident,
      UniqueKey::ShelterRegistration => Entity::Shelter,
    }
  }
}

pub trait UnitOfWork {
  // ── Uniqueness ────────────────────────────────────────────────────────

  /// Return the id of the row holding `value` in the `key` column, skipping
  /// the row whose id is `exclude`.
  fn holder_of(
    &self,
    key: UniqueKey,
    value: &str,
    exclude: Option<i64>,
  ) -> Result<Option<i64>>;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn person(&self, id: i64) -> Result<Option<Person>>;
  fn shelter(&self, id: i64) -> Result<Option<Shelter>>;
  fn staff(&self, id: i64) -> Result<Option<Staff>>;
  fn resident(&self, id: i64) -> Result<Option<Resident>>;
  fn stay(&self, id: i64) -> Result<Option<Stay>>;
  fn family_contact(&self, id: i64) -> Result<Option<FamilyContact>>;

  fn active_stay_count(&self, shelter_id: i64) -> Result<u32>;
  fn active_stay_of(&self, resident_id: i64) -> Result<Option<Stay>>;
  fn stay_count_of_resident(&self, resident_id: i64) -> Result<u32>;
  fn stay_count_of_shelter(&self, shelter_id: i64) -> Result<u32>;
  fn transfer_count_of_staff(&self, staff_id: i64) -> Result<u32>;
  fn care_log_count_of_staff(&self, staff_id: i64) -> Result<u32>;
  fn care_log_count_of_resident(&self, resident_id: i64) -> Result<u32>;

  // ── Inserts ───────────────────────────────────────────────────────────

  fn insert_person(&mut self, person: &NewPerson, role: PersonRole) -> Result<Person>;
  fn insert_shelter(&mut self, shelter: &NewShelter) -> Result<Shelter>;
  /// Insert a staff row; `staff.staff_id` is ignored and assigned by the store.
  fn insert_staff(&mut self, staff: &Staff) -> Result<Staff>;
  /// Insert a resident row; `resident.resident_id` is ignored.
  fn insert_resident(&mut self, resident: &Resident) -> Result<Resident>;
  /// Insert an active stay for `admission`.
  fn insert_stay(&mut self, admission: &Admission) -> Result<Stay>;
  fn insert_care_log(&mut self, log: &NewCareLog) -> Result<CareLog>;
  fn insert_family_contact(
    &mut self,
    resident_id: i64,
    contact: &NewFamilyContact,
  ) -> Result<FamilyContact>;
  fn append_transfer(
    &mut self,
    staff_id: i64,
    from: Option<i64>,
    to: Option<i64>,
    at: DateTime<Utc>,
  ) -> Result<StaffTransfer>;

  // ── Updates (full-row writes) ─────────────────────────────────────────

  fn update_person(&mut self, person: &Person) -> Result<()>;
  fn update_shelter(&mut self, shelter: &Shelter) -> Result<()>;
  fn update_staff(&mut self, staff: &Staff) -> Result<()>;
  fn update_resident(&mut self, resident: &Resident) -> Result<()>;
  fn update_stay(&mut self, stay: &Stay) -> Result<()>;
  fn update_family_contact(&mut self, contact: &FamilyContact) -> Result<()>;

  /// Clear the shelter reference of every staff member assigned to it.
  /// Returns the number of staff rows detached.
  fn detach_staff_from(&mut self, shelter_id: i64) -> Result<u32>;

  // ── Hard deletes ──────────────────────────────────────────────────────

  fn delete_person(&mut self, id: i64) -> Result<()>;
  fn delete_shelter(&mut self, id: i64) -> Result<()>;
  fn delete_staff(&mut self, id: i64) -> Result<()>;
  fn delete_resident(&mut self, id: i64) -> Result<()>;
  fn delete_family_contacts_of(&mut self, resident_id: i64) -> Result<()>;
}
