//! The `ShelterStore` trait: the async facade higher layers program against.
//!
//! The trait is implemented by storage backends (e.g. `refuge-store-sqlite`),
//! which run every write through [`crate::engine`] inside a single
//! transaction. Higher layers (`refuge-api`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Failures are reported with the core [`Error`](crate::Error) taxonomy;
//! backend-specific failures arrive as [`Error::Backend`](crate::Error::Backend).

use std::{collections::BTreeMap, future::Future};

use crate::{
  Result,
  engine::Removal,
  entity::{
    CareLog, FamilyContact, Person, Resident, ResidentProfile, Shelter, Staff,
    StaffProfile, StaffTransfer, Stay,
  },
  filter::{CareLogFilter, ResidentFilter, ShelterFilter, StaffFilter, StayFilter},
  input::{
    Admission, Discharge, FamilyContactPatch, NewCareLog, NewFamilyContact, NewResident,
    NewShelter, NewStaff, PersonPatch, ResidentPatch, ShelterPatch, StaffPatch,
  },
  report::{ShelterOccupancy, SystemStatistics},
  tags::Shift,
  uow::UniqueKey,
};

/// Abstraction over a Refuge storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ShelterStore: Send + Sync {
  // ── Shelters ──────────────────────────────────────────────────────────

  fn create_shelter(
    &self,
    input: NewShelter,
  ) -> impl Future<Output = Result<Shelter>> + Send + '_;

  fn update_shelter(
    &self,
    id: i64,
    patch: ShelterPatch,
  ) -> impl Future<Output = Result<Shelter>> + Send + '_;

  /// See [`crate::engine::remove_shelter`].
  fn remove_shelter(
    &self,
    id: i64,
    force: bool,
  ) -> impl Future<Output = Result<Removal>> + Send + '_;

  fn get_shelter(&self, id: i64) -> impl Future<Output = Result<Option<Shelter>>> + Send + '_;

  fn list_shelters(
    &self,
    filter: ShelterFilter,
  ) -> impl Future<Output = Result<Vec<Shelter>>> + Send + '_;

  // ── Staff ─────────────────────────────────────────────────────────────

  fn create_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<StaffProfile>> + Send + '_;

  fn update_staff(
    &self,
    id: i64,
    patch: StaffPatch,
  ) -> impl Future<Output = Result<Staff>> + Send + '_;

  /// Move a staff member to another shelter (or none) and record the move.
  fn transfer_staff(
    &self,
    staff_id: i64,
    to: Option<i64>,
  ) -> impl Future<Output = Result<StaffTransfer>> + Send + '_;

  /// Hard delete only; fails with `HasHistory` when history exists.
  fn purge_staff(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;

  /// Delete, or deactivate when history exists.
  fn remove_staff(&self, id: i64) -> impl Future<Output = Result<Removal>> + Send + '_;

  fn get_staff(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<StaffProfile>>> + Send + '_;

  fn find_staff_by_registration(
    &self,
    registration_number: String,
  ) -> impl Future<Output = Result<Option<StaffProfile>>> + Send + '_;

  fn list_staff(
    &self,
    filter: StaffFilter,
  ) -> impl Future<Output = Result<Vec<StaffProfile>>> + Send + '_;

  /// The transfer trail of one staff member, oldest first.
  fn list_transfers(
    &self,
    staff_id: i64,
  ) -> impl Future<Output = Result<Vec<StaffTransfer>>> + Send + '_;

  // ── Residents ─────────────────────────────────────────────────────────

  fn create_resident(
    &self,
    input: NewResident,
  ) -> impl Future<Output = Result<ResidentProfile>> + Send + '_;

  fn update_resident(
    &self,
    id: i64,
    patch: ResidentPatch,
  ) -> impl Future<Output = Result<Resident>> + Send + '_;

  fn purge_resident(&self, id: i64) -> impl Future<Output = Result<()>> + Send + '_;

  fn remove_resident(&self, id: i64) -> impl Future<Output = Result<Removal>> + Send + '_;

  fn get_resident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ResidentProfile>>> + Send + '_;

  fn find_resident_by_record(
    &self,
    record_number: String,
  ) -> impl Future<Output = Result<Option<ResidentProfile>>> + Send + '_;

  fn list_residents(
    &self,
    filter: ResidentFilter,
  ) -> impl Future<Output = Result<Vec<ResidentProfile>>> + Send + '_;

  /// Active residents without an active stay.
  fn residents_awaiting_admission(
    &self,
  ) -> impl Future<Output = Result<Vec<ResidentProfile>>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  fn update_person(
    &self,
    id: i64,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person>> + Send + '_;

  fn get_person(&self, id: i64) -> impl Future<Output = Result<Option<Person>>> + Send + '_;

  fn find_person_by_tax_id(
    &self,
    tax_id: String,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + '_;

  // ── Stays ─────────────────────────────────────────────────────────────

  fn admit(&self, admission: Admission) -> impl Future<Output = Result<Stay>> + Send + '_;

  fn discharge(
    &self,
    stay_id: i64,
    input: Discharge,
  ) -> impl Future<Output = Result<Stay>> + Send + '_;

  fn get_stay(&self, id: i64) -> impl Future<Output = Result<Option<Stay>>> + Send + '_;

  fn list_stays(
    &self,
    filter: StayFilter,
  ) -> impl Future<Output = Result<Vec<Stay>>> + Send + '_;

  // ── Care logs and contacts ────────────────────────────────────────────

  fn record_care_log(
    &self,
    input: NewCareLog,
  ) -> impl Future<Output = Result<CareLog>> + Send + '_;

  /// Most recent first, truncated to `filter.limit` if set.
  fn list_care_logs(
    &self,
    filter: CareLogFilter,
  ) -> impl Future<Output = Result<Vec<CareLog>>> + Send + '_;

  fn add_family_contact(
    &self,
    resident_id: i64,
    input: NewFamilyContact,
  ) -> impl Future<Output = Result<FamilyContact>> + Send + '_;

  fn update_family_contact(
    &self,
    id: i64,
    patch: FamilyContactPatch,
  ) -> impl Future<Output = Result<FamilyContact>> + Send + '_;

  fn get_family_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<FamilyContact>>> + Send + '_;

  fn list_family_contacts(
    &self,
    resident_id: i64,
    emergency_only: bool,
  ) -> impl Future<Output = Result<Vec<FamilyContact>>> + Send + '_;

  // ── Uniqueness ────────────────────────────────────────────────────────

  /// Whether `value` is unused in the `key` column, ignoring row `exclude`.
  fn is_available(
    &self,
    key: UniqueKey,
    value: String,
    exclude: Option<i64>,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  fn find_shelter_by_registration(
    &self,
    tax_registration_id: String,
  ) -> impl Future<Output = Result<Option<Shelter>>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Returns `None` if the shelter does not exist.
  fn shelter_occupancy(
    &self,
    shelter_id: i64,
  ) -> impl Future<Output = Result<Option<ShelterOccupancy>>> + Send + '_;

  /// Occupancy of every active shelter.
  fn occupancy_overview(
    &self,
  ) -> impl Future<Output = Result<Vec<ShelterOccupancy>>> + Send + '_;

  fn staff_count_by_shift(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<Shift, u32>>> + Send + '_;

  fn statistics(&self) -> impl Future<Output = Result<SystemStatistics>> + Send + '_;
}
