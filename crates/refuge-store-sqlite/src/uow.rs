//! [`SqliteUow`]: the engine's unit of work over one open SQLite transaction.

use chrono::{DateTime, Utc};
use refuge_core::{
  Result,
  entity::{CareLog, FamilyContact, Person, Resident, Shelter, Staff, StaffTransfer, Stay},
  input::{Admission, NewCareLog, NewFamilyContact, NewPerson, NewShelter},
  tags::PersonRole,
  uow::{UniqueKey, UnitOfWork},
};
use rusqlite::Connection;

use crate::queries;

/// Borrows the connection of a transaction the caller owns. Dropping the
/// unit of work never commits.
pub struct SqliteUow<'c> {
  conn: &'c Connection,
}

impl<'c> SqliteUow<'c> {
  pub fn new(conn: &'c Connection) -> Self { Self { conn } }
}

impl UnitOfWork for SqliteUow<'_> {
  fn holder_of(&self, key: UniqueKey, value: &str, exclude: Option<i64>) -> Result<Option<i64>> {
    Ok(queries::holder_of(self.conn, key, value, exclude)?)
  }

  fn person(&self, id: i64) -> Result<Option<Person>> { Ok(queries::person(self.conn, id)?) }

  fn shelter(&self, id: i64) -> Result<Option<Shelter>> { Ok(queries::shelter(self.conn, id)?) }

  fn staff(&self, id: i64) -> Result<Option<Staff>> { Ok(queries::staff(self.conn, id)?) }

  fn resident(&self, id: i64) -> Result<Option<Resident>> {
    Ok(queries::resident(self.conn, id)?)
  }

  fn stay(&self, id: i64) -> Result<Option<Stay>> { Ok(queries::stay(self.conn, id)?) }

  fn family_contact(&self, id: i64) -> Result<Option<FamilyContact>> {
    Ok(queries::family_contact(self.conn, id)?)
  }

  fn active_stay_count(&self, shelter_id: i64) -> Result<u32> {
    Ok(queries::active_stay_count(self.conn, shelter_id)?)
  }

  fn active_stay_of(&self, resident_id: i64) -> Result<Option<Stay>> {
    Ok(queries::active_stay_of(self.conn, resident_id)?)
  }

  fn stay_count_of_resident(&self, resident_id: i64) -> Result<u32> {
    Ok(queries::stay_count_of_resident(self.conn, resident_id)?)
  }

  fn stay_count_of_shelter(&self, shelter_id: i64) -> Result<u32> {
    Ok(queries::stay_count_of_shelter(self.conn, shelter_id)?)
  }

  fn transfer_count_of_staff(&self, staff_id: i64) -> Result<u32> {
    Ok(queries::transfer_count_of_staff(self.conn, staff_id)?)
  }

  fn care_log_count_of_staff(&self, staff_id: i64) -> Result<u32> {
    Ok(queries::care_log_count_of_staff(self.conn, staff_id)?)
  }

  fn care_log_count_of_resident(&self, resident_id: i64) -> Result<u32> {
    Ok(queries::care_log_count_of_resident(self.conn, resident_id)?)
  }

  fn insert_person(&mut self, person: &NewPerson, role: PersonRole) -> Result<Person> {
    Ok(queries::insert_person(self.conn, person, role)?)
  }

  fn insert_shelter(&mut self, shelter: &NewShelter) -> Result<Shelter> {
    Ok(queries::insert_shelter(self.conn, shelter)?)
  }

  fn insert_staff(&mut self, staff: &Staff) -> Result<Staff> {
    Ok(queries::insert_staff(self.conn, staff)?)
  }

  fn insert_resident(&mut self, resident: &Resident) -> Result<Resident> {
    Ok(queries::insert_resident(self.conn, resident)?)
  }

  fn insert_stay(&mut self, admission: &Admission) -> Result<Stay> {
    Ok(queries::insert_stay(self.conn, admission)?)
  }

  fn insert_care_log(&mut self, log: &NewCareLog) -> Result<CareLog> {
    Ok(queries::insert_care_log(self.conn, log)?)
  }

  fn insert_family_contact(
    &mut self,
    resident_id: i64,
    contact: &NewFamilyContact,
  ) -> Result<FamilyContact> {
    Ok(queries::insert_family_contact(self.conn, resident_id, contact)?)
  }

  fn append_transfer(
    &mut self,
    staff_id: i64,
    from: Option<i64>,
    to: Option<i64>,
    at: DateTime<Utc>,
  ) -> Result<StaffTransfer> {
    Ok(queries::append_transfer(self.conn, staff_id, from, to, at)?)
  }

  fn update_person(&mut self, person: &Person) -> Result<()> {
    Ok(queries::update_person(self.conn, person)?)
  }

  fn update_shelter(&mut self, shelter: &Shelter) -> Result<()> {
    Ok(queries::update_shelter(self.conn, shelter)?)
  }

  fn update_staff(&mut self, staff: &Staff) -> Result<()> {
    Ok(queries::update_staff(self.conn, staff)?)
  }

  fn update_resident(&mut self, resident: &Resident) -> Result<()> {
    Ok(queries::update_resident(self.conn, resident)?)
  }

  fn update_stay(&mut self, stay: &Stay) -> Result<()> { Ok(queries::update_stay(self.conn, stay)?) }

  fn update_family_contact(&mut self, contact: &FamilyContact) -> Result<()> {
    Ok(queries::update_family_contact(self.conn, contact)?)
  }

  fn detach_staff_from(&mut self, shelter_id: i64) -> Result<u32> {
    Ok(queries::detach_staff_from(self.conn, shelter_id)?)
  }

  fn delete_person(&mut self, id: i64) -> Result<()> { Ok(queries::delete_person(self.conn, id)?) }

  fn delete_shelter(&mut self, id: i64) -> Result<()> {
    Ok(queries::delete_shelter(self.conn, id)?)
  }

  fn delete_staff(&mut self, id: i64) -> Result<()> { Ok(queries::delete_staff(self.conn, id)?) }

  fn delete_resident(&mut self, id: i64) -> Result<()> {
    Ok(queries::delete_resident(self.conn, id)?)
  }

  fn delete_family_contacts_of(&mut self, resident_id: i64) -> Result<()> {
    Ok(queries::delete_family_contacts_of(self.conn, resident_id)?)
  }
}
