//! [`SqliteStore`]: the SQLite implementation of [`ShelterStore`].

use std::{collections::BTreeMap, path::Path};

use refuge_core::{
  Result as CoreResult,
  engine::{self, Removal},
  entity::{
    CareLog, FamilyContact, Person, Resident, ResidentProfile, Shelter, Staff, StaffProfile,
    StaffTransfer, Stay,
  },
  filter::{CareLogFilter, ResidentFilter, ShelterFilter, StaffFilter, StayFilter},
  input::{
    Admission, Discharge, FamilyContactPatch, NewCareLog, NewFamilyContact, NewResident,
    NewShelter, NewStaff, PersonPatch, ResidentPatch, ShelterPatch, StaffPatch,
  },
  report::{self, ShelterOccupancy, SystemStatistics},
  store::ShelterStore,
  tags::Shift,
  uow::UniqueKey,
};
use rusqlite::{Connection, TransactionBehavior};

use crate::{Error, Result, queries, schema::SCHEMA, uow::SqliteUow};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A shelter registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted and every
/// call runs on the connection's dedicated thread, so writes are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` against a unit of work inside one `BEGIN IMMEDIATE`
  /// transaction. Commits only when `op` succeeds.
  async fn write<T, F>(&self, op: F) -> CoreResult<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteUow<'_>) -> CoreResult<T> + Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = op(&mut SqliteUow::new(&tx));
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await
      .map_err(Error::from)?;

    if let Err(e) = &outcome {
      tracing::warn!(kind = e.kind(), "write rejected: {e}");
    }
    outcome
  }

  /// Run a read-only query on the connection thread.
  async fn read<T, F>(&self, op: F) -> CoreResult<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    let outcome = self.conn.call(move |conn| Ok(op(conn))).await.map_err(Error::from)?;
    Ok(outcome?)
  }
}

// ─── ShelterStore impl ───────────────────────────────────────────────────────

impl ShelterStore for SqliteStore {
  // ── Shelters ──────────────────────────────────────────────────────────────

  async fn create_shelter(&self, input: NewShelter) -> CoreResult<Shelter> {
    self.write(move |uow| engine::create_shelter(uow, input)).await
  }

  async fn update_shelter(&self, id: i64, patch: ShelterPatch) -> CoreResult<Shelter> {
    self.write(move |uow| engine::update_shelter(uow, id, patch)).await
  }

  async fn remove_shelter(&self, id: i64, force: bool) -> CoreResult<Removal> {
    self.write(move |uow| engine::remove_shelter(uow, id, force)).await
  }

  async fn get_shelter(&self, id: i64) -> CoreResult<Option<Shelter>> {
    self.read(move |conn| queries::shelter(conn, id)).await
  }

  async fn list_shelters(&self, filter: ShelterFilter) -> CoreResult<Vec<Shelter>> {
    let mut shelters = self.read(queries::all_shelters).await?;
    shelters.retain(|s| filter.matches(s));
    Ok(shelters)
  }

  // ── Staff ─────────────────────────────────────────────────────────────────

  async fn create_staff(&self, input: NewStaff) -> CoreResult<StaffProfile> {
    self.write(move |uow| engine::create_staff(uow, input)).await
  }

  async fn update_staff(&self, id: i64, patch: StaffPatch) -> CoreResult<Staff> {
    self.write(move |uow| engine::update_staff(uow, id, patch)).await
  }

  async fn transfer_staff(&self, staff_id: i64, to: Option<i64>) -> CoreResult<StaffTransfer> {
    self.write(move |uow| engine::transfer_staff(uow, staff_id, to)).await
  }

  async fn purge_staff(&self, id: i64) -> CoreResult<()> {
    self.write(move |uow| engine::purge_staff(uow, id)).await
  }

  async fn remove_staff(&self, id: i64) -> CoreResult<Removal> {
    self.write(move |uow| engine::remove_staff(uow, id)).await
  }

  async fn get_staff(&self, id: i64) -> CoreResult<Option<StaffProfile>> {
    self.read(move |conn| queries::staff_profile(conn, id)).await
  }

  async fn find_staff_by_registration(
    &self,
    registration_number: String,
  ) -> CoreResult<Option<StaffProfile>> {
    self
      .read(move |conn| queries::staff_profile_by_registration(conn, &registration_number))
      .await
  }

  async fn list_staff(&self, filter: StaffFilter) -> CoreResult<Vec<StaffProfile>> {
    let mut staff = self.read(queries::all_staff_profiles).await?;
    staff.retain(|p| filter.matches(p));
    Ok(staff)
  }

  async fn list_transfers(&self, staff_id: i64) -> CoreResult<Vec<StaffTransfer>> {
    self.read(move |conn| queries::transfers_of(conn, staff_id)).await
  }

  // ── Residents ─────────────────────────────────────────────────────────────

  async fn create_resident(&self, input: NewResident) -> CoreResult<ResidentProfile> {
    self.write(move |uow| engine::create_resident(uow, input)).await
  }

  async fn update_resident(&self, id: i64, patch: ResidentPatch) -> CoreResult<Resident> {
    self.write(move |uow| engine::update_resident(uow, id, patch)).await
  }

  async fn purge_resident(&self, id: i64) -> CoreResult<()> {
    self.write(move |uow| engine::purge_resident(uow, id)).await
  }

  async fn remove_resident(&self, id: i64) -> CoreResult<Removal> {
    self.write(move |uow| engine::remove_resident(uow, id)).await
  }

  async fn get_resident(&self, id: i64) -> CoreResult<Option<ResidentProfile>> {
    self.read(move |conn| queries::resident_profile(conn, id)).await
  }

  async fn find_resident_by_record(
    &self,
    record_number: String,
  ) -> CoreResult<Option<ResidentProfile>> {
    self.read(move |conn| queries::resident_profile_by_record(conn, &record_number)).await
  }

  async fn list_residents(&self, filter: ResidentFilter) -> CoreResult<Vec<ResidentProfile>> {
    let mut residents = self.read(queries::all_resident_profiles).await?;
    residents.retain(|p| filter.matches(p));
    Ok(residents)
  }

  async fn residents_awaiting_admission(&self) -> CoreResult<Vec<ResidentProfile>> {
    let (residents, admitted) = self
      .read(|conn| {
        Ok((queries::all_resident_profiles(conn)?, queries::admitted_residents(conn)?))
      })
      .await?;
    Ok(report::awaiting_admission(residents, &admitted))
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn update_person(&self, id: i64, patch: PersonPatch) -> CoreResult<Person> {
    self.write(move |uow| engine::update_person(uow, id, patch)).await
  }

  async fn get_person(&self, id: i64) -> CoreResult<Option<Person>> {
    self.read(move |conn| queries::person(conn, id)).await
  }

  async fn find_person_by_tax_id(&self, tax_id: String) -> CoreResult<Option<Person>> {
    self.read(move |conn| queries::person_by_tax_id(conn, &tax_id)).await
  }

  // ── Stays ─────────────────────────────────────────────────────────────────

  async fn admit(&self, admission: Admission) -> CoreResult<Stay> {
    self.write(move |uow| engine::admit(uow, admission)).await
  }

  async fn discharge(&self, stay_id: i64, input: Discharge) -> CoreResult<Stay> {
    self.write(move |uow| engine::discharge(uow, stay_id, input)).await
  }

  async fn get_stay(&self, id: i64) -> CoreResult<Option<Stay>> {
    self.read(move |conn| queries::stay(conn, id)).await
  }

  async fn list_stays(&self, filter: StayFilter) -> CoreResult<Vec<Stay>> {
    let mut stays = self.read(queries::all_stays).await?;
    stays.retain(|s| filter.matches(s));
    Ok(stays)
  }

  // ── Care logs and contacts ────────────────────────────────────────────────

  async fn record_care_log(&self, input: NewCareLog) -> CoreResult<CareLog> {
    self.write(move |uow| engine::record_care_log(uow, input)).await
  }

  async fn list_care_logs(&self, filter: CareLogFilter) -> CoreResult<Vec<CareLog>> {
    let mut logs = self.read(queries::all_care_logs).await?;
    logs.retain(|l| filter.matches(l));
    if let Some(limit) = filter.limit {
      logs.truncate(limit);
    }
    Ok(logs)
  }

  async fn add_family_contact(
    &self,
    resident_id: i64,
    input: NewFamilyContact,
  ) -> CoreResult<FamilyContact> {
    self.write(move |uow| engine::add_family_contact(uow, resident_id, input)).await
  }

  async fn update_family_contact(
    &self,
    id: i64,
    patch: FamilyContactPatch,
  ) -> CoreResult<FamilyContact> {
    self.write(move |uow| engine::update_family_contact(uow, id, patch)).await
  }

  async fn get_family_contact(&self, id: i64) -> CoreResult<Option<FamilyContact>> {
    self.read(move |conn| queries::family_contact(conn, id)).await
  }

  async fn list_family_contacts(
    &self,
    resident_id: i64,
    emergency_only: bool,
  ) -> CoreResult<Vec<FamilyContact>> {
    self
      .read(move |conn| queries::family_contacts_of(conn, resident_id, emergency_only))
      .await
  }

  // ── Uniqueness ────────────────────────────────────────────────────────────

  async fn is_available(
    &self,
    key: UniqueKey,
    value: String,
    exclude: Option<i64>,
  ) -> CoreResult<bool> {
    self
      .read(move |conn| Ok(engine::is_available(&SqliteUow::new(conn), key, &value, exclude)))
      .await?
  }

  async fn find_shelter_by_registration(
    &self,
    tax_registration_id: String,
  ) -> CoreResult<Option<Shelter>> {
    self.read(move |conn| queries::shelter_by_registration(conn, &tax_registration_id)).await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn shelter_occupancy(&self, shelter_id: i64) -> CoreResult<Option<ShelterOccupancy>> {
    self
      .read(move |conn| {
        let Some(shelter) = queries::shelter(conn, shelter_id)? else {
          return Ok(None);
        };
        let occupied = queries::active_stay_count(conn, shelter_id)?;
        let total = queries::stay_count_of_shelter(conn, shelter_id)?;
        Ok(Some(ShelterOccupancy::new(&shelter, occupied, total)))
      })
      .await
  }

  async fn occupancy_overview(&self) -> CoreResult<Vec<ShelterOccupancy>> {
    self
      .read(|conn| {
        queries::all_shelters(conn)?
          .iter()
          .filter(|s| s.active)
          .map(|s| -> Result<ShelterOccupancy> {
            let occupied = queries::active_stay_count(conn, s.shelter_id)?;
            let total = queries::stay_count_of_shelter(conn, s.shelter_id)?;
            Ok(ShelterOccupancy::new(s, occupied, total))
          })
          .collect()
      })
      .await
  }

  async fn staff_count_by_shift(&self) -> CoreResult<BTreeMap<Shift, u32>> {
    let staff = self.read(queries::all_staff_profiles).await?;
    Ok(report::count_by_shift(&staff))
  }

  async fn statistics(&self) -> CoreResult<SystemStatistics> {
    self
      .read(|conn| {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let shelters = queries::all_shelters(conn)?;
        let staff = queries::all_staff_profiles(conn)?;
        let residents = queries::all_resident_profiles(conn)?;
        Ok(SystemStatistics {
          active_shelters:  count(shelters.iter().filter(|s| s.active).count()),
          active_staff:     count(staff.iter().filter(|p| p.is_active()).count()),
          active_residents: count(residents.iter().filter(|p| p.is_active()).count()),
          active_stays:     queries::total_active_stays(conn)?,
          care_logs:        queries::total_care_logs(conn)?,
        })
      })
      .await
  }
}
