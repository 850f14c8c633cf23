//! Synchronous SQL over a borrowed connection.
//!
//! Every function here runs inside whatever transaction the caller holds;
//! none of them commit. Selects go through one `select_*` helper per table
//! that takes the trailing `WHERE`/`ORDER BY` clause, so the column lists
//! and row readers are written once.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use refuge_core::{
  entity::{
    CareLog, FamilyContact, Person, Resident, ResidentProfile, Shelter, Staff, StaffProfile,
    StaffTransfer, Stay,
  },
  input::{Admission, NewCareLog, NewFamilyContact, NewPerson, NewShelter},
  tags::PersonRole,
  uow::UniqueKey,
};
use rusqlite::{Connection, OptionalExtension as _, Params, Row, params};

use crate::{
  Result,
  encode::{
    RawAddress, RawCareLog, RawPerson, RawResident, RawShelter, RawStaff, RawStay,
    RawTransfer, encode_date, encode_decimal, encode_dt, family_contact_from_row,
  },
};

// ─── Column lists and row readers ────────────────────────────────────────────

const PERSON_COLS: &str = "p.person_id, p.tax_id, p.name, p.birth_date, p.phone, \
  p.secondary_phone, p.email, p.street, p.number, p.district, p.city, p.state, \
  p.postal_code, p.role, p.active";
const PERSON_WIDTH: usize = 15;

const SHELTER_COLS: &str = "sh.shelter_id, sh.tax_registration_id, sh.name, sh.capacity, \
  sh.street, sh.number, sh.district, sh.city, sh.state, sh.postal_code, sh.phone, sh.kind, \
  sh.legal_representative, sh.active";

const STAFF_COLS: &str = "st.staff_id, st.person_id, st.registration_number, st.job_title, \
  st.hire_date, st.salary, st.shift, st.status, st.shelter_id";

const RESIDENT_COLS: &str = "r.resident_id, r.person_id, r.record_number, r.entry_date, \
  r.exit_date, r.intake_reason, r.chemical_dependency, r.has_disability, r.disability_kind, \
  r.status";

const STAY_COLS: &str = "y.stay_id, y.resident_id, y.shelter_id, y.entry_date, y.exit_date, \
  y.slot, y.active, y.exit_reason, y.notes";

const CARE_LOG_COLS: &str =
  "c.care_log_id, c.resident_id, c.staff_id, c.date, c.category, c.description, c.notes";

const CONTACT_COLS: &str =
  "f.contact_id, f.resident_id, f.name, f.relationship, f.phone, f.emergency";

const TRANSFER_COLS: &str =
  "t.transfer_id, t.staff_id, t.from_shelter_id, t.to_shelter_id, t.recorded_at";

fn read_address(row: &Row<'_>, at: usize) -> rusqlite::Result<RawAddress> {
  Ok(RawAddress {
    street:      row.get(at)?,
    number:      row.get(at + 1)?,
    district:    row.get(at + 2)?,
    city:        row.get(at + 3)?,
    state:       row.get(at + 4)?,
    postal_code: row.get(at + 5)?,
  })
}

fn read_person(row: &Row<'_>, at: usize) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:       row.get(at)?,
    tax_id:          row.get(at + 1)?,
    name:            row.get(at + 2)?,
    birth_date:      row.get(at + 3)?,
    phone:           row.get(at + 4)?,
    secondary_phone: row.get(at + 5)?,
    email:           row.get(at + 6)?,
    address:         read_address(row, at + 7)?,
    role:            row.get(at + 13)?,
    active:          row.get(at + 14)?,
  })
}

fn read_shelter(row: &Row<'_>) -> rusqlite::Result<RawShelter> {
  Ok(RawShelter {
    shelter_id:           row.get(0)?,
    tax_registration_id:  row.get(1)?,
    name:                 row.get(2)?,
    capacity:             row.get(3)?,
    address:              read_address(row, 4)?,
    phone:                row.get(10)?,
    kind:                 row.get(11)?,
    legal_representative: row.get(12)?,
    active:               row.get(13)?,
  })
}

fn read_staff(row: &Row<'_>, at: usize) -> rusqlite::Result<RawStaff> {
  Ok(RawStaff {
    staff_id:            row.get(at)?,
    person_id:           row.get(at + 1)?,
    registration_number: row.get(at + 2)?,
    job_title:           row.get(at + 3)?,
    hire_date:           row.get(at + 4)?,
    salary:              row.get(at + 5)?,
    shift:               row.get(at + 6)?,
    status:              row.get(at + 7)?,
    shelter_id:          row.get(at + 8)?,
  })
}

fn read_resident(row: &Row<'_>, at: usize) -> rusqlite::Result<RawResident> {
  Ok(RawResident {
    resident_id:         row.get(at)?,
    person_id:           row.get(at + 1)?,
    record_number:       row.get(at + 2)?,
    entry_date:          row.get(at + 3)?,
    exit_date:           row.get(at + 4)?,
    intake_reason:       row.get(at + 5)?,
    chemical_dependency: row.get(at + 6)?,
    has_disability:      row.get(at + 7)?,
    disability_kind:     row.get(at + 8)?,
    status:              row.get(at + 9)?,
  })
}

fn read_stay(row: &Row<'_>) -> rusqlite::Result<RawStay> {
  Ok(RawStay {
    stay_id:     row.get(0)?,
    resident_id: row.get(1)?,
    shelter_id:  row.get(2)?,
    entry_date:  row.get(3)?,
    exit_date:   row.get(4)?,
    slot:        row.get(5)?,
    active:      row.get(6)?,
    exit_reason: row.get(7)?,
    notes:       row.get(8)?,
  })
}

fn read_care_log(row: &Row<'_>) -> rusqlite::Result<RawCareLog> {
  Ok(RawCareLog {
    care_log_id: row.get(0)?,
    resident_id: row.get(1)?,
    staff_id:    row.get(2)?,
    date:        row.get(3)?,
    category:    row.get(4)?,
    description: row.get(5)?,
    notes:       row.get(6)?,
  })
}

fn read_transfer(row: &Row<'_>) -> rusqlite::Result<RawTransfer> {
  Ok(RawTransfer {
    transfer_id:     row.get(0)?,
    staff_id:        row.get(1)?,
    from_shelter_id: row.get(2)?,
    to_shelter_id:   row.get(3)?,
    recorded_at:     row.get(4)?,
  })
}

fn rows<T, P, F>(conn: &Connection, sql: &str, params: P, read: F) -> rusqlite::Result<Vec<T>>
where
  P: Params,
  F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
  let mut stmt = conn.prepare(sql)?;
  let out = stmt.query_map(params, read)?.collect::<rusqlite::Result<Vec<_>>>();
  out
}

fn count(conn: &Connection, sql: &str, id: i64) -> Result<u32> {
  Ok(conn.query_row(sql, [id], |r| r.get(0))?)
}

// ─── Selects ─────────────────────────────────────────────────────────────────

fn select_persons(conn: &Connection, tail: &str, params: impl Params) -> Result<Vec<Person>> {
  let sql = format!("SELECT {PERSON_COLS} FROM persons p {tail}");
  rows(conn, &sql, params, |row| read_person(row, 0))?
    .into_iter()
    .map(RawPerson::into_person)
    .collect()
}

fn select_shelters(conn: &Connection, tail: &str, params: impl Params) -> Result<Vec<Shelter>> {
  let sql = format!("SELECT {SHELTER_COLS} FROM shelters sh {tail}");
  rows(conn, &sql, params, read_shelter)?
    .into_iter()
    .map(RawShelter::into_shelter)
    .collect()
}

fn select_staff(conn: &Connection, tail: &str, params: impl Params) -> Result<Vec<Staff>> {
  let sql = format!("SELECT {STAFF_COLS} FROM staff st {tail}");
  rows(conn, &sql, params, |row| read_staff(row, 0))?
    .into_iter()
    .map(RawStaff::into_staff)
    .collect()
}

fn select_residents(conn: &Connection, tail: &str, params: impl Params) -> Result<Vec<Resident>> {
  let sql = format!("SELECT {RESIDENT_COLS} FROM residents r {tail}");
  rows(conn, &sql, params, |row| read_resident(row, 0))?
    .into_iter()
    .map(RawResident::into_resident)
    .collect()
}

fn select_staff_profiles(
  conn: &Connection,
  tail: &str,
  params: impl Params,
) -> Result<Vec<StaffProfile>> {
  let sql = format!(
    "SELECT {PERSON_COLS}, {STAFF_COLS}
     FROM staff st JOIN persons p ON p.person_id = st.person_id {tail}"
  );
  let raws = rows(conn, &sql, params, |row| {
    Ok((read_person(row, 0)?, read_staff(row, PERSON_WIDTH)?))
  })?;
  raws
    .into_iter()
    .map(|(p, s)| Ok(StaffProfile { person: p.into_person()?, staff: s.into_staff()? }))
    .collect()
}

fn select_resident_profiles(
  conn: &Connection,
  tail: &str,
  params: impl Params,
) -> Result<Vec<ResidentProfile>> {
  let sql = format!(
    "SELECT {PERSON_COLS}, {RESIDENT_COLS}
     FROM residents r JOIN persons p ON p.person_id = r.person_id {tail}"
  );
  let raws = rows(conn, &sql, params, |row| {
    Ok((read_person(row, 0)?, read_resident(row, PERSON_WIDTH)?))
  })?;
  raws
    .into_iter()
    .map(|(p, r)| Ok(ResidentProfile { person: p.into_person()?, resident: r.into_resident()? }))
    .collect()
}

fn select_stays(conn: &Connection, tail: &str, params: impl Params) -> Result<Vec<Stay>> {
  let sql = format!("SELECT {STAY_COLS} FROM stays y {tail}");
  rows(conn, &sql, params, read_stay)?.into_iter().map(RawStay::into_stay).collect()
}

fn select_family_contacts(
  conn: &Connection,
  tail: &str,
  params: impl Params,
) -> Result<Vec<FamilyContact>> {
  let sql = format!("SELECT {CONTACT_COLS} FROM family_contacts f {tail}");
  Ok(rows(conn, &sql, params, family_contact_from_row)?)
}

// ─── Lookups by key ──────────────────────────────────────────────────────────

pub fn person(conn: &Connection, id: i64) -> Result<Option<Person>> {
  Ok(select_persons(conn, "WHERE p.person_id = ?1", [id])?.into_iter().next())
}

pub fn person_by_tax_id(conn: &Connection, tax_id: &str) -> Result<Option<Person>> {
  Ok(select_persons(conn, "WHERE p.tax_id = ?1", [tax_id])?.into_iter().next())
}

pub fn shelter(conn: &Connection, id: i64) -> Result<Option<Shelter>> {
  Ok(select_shelters(conn, "WHERE sh.shelter_id = ?1", [id])?.into_iter().next())
}

pub fn shelter_by_registration(conn: &Connection, value: &str) -> Result<Option<Shelter>> {
  Ok(
    select_shelters(conn, "WHERE sh.tax_registration_id = ?1", [value])?
      .into_iter()
      .next(),
  )
}

pub fn staff(conn: &Connection, id: i64) -> Result<Option<Staff>> {
  Ok(select_staff(conn, "WHERE st.staff_id = ?1", [id])?.into_iter().next())
}

pub fn staff_profile(conn: &Connection, id: i64) -> Result<Option<StaffProfile>> {
  Ok(select_staff_profiles(conn, "WHERE st.staff_id = ?1", [id])?.into_iter().next())
}

pub fn staff_profile_by_registration(
  conn: &Connection,
  registration_number: &str,
) -> Result<Option<StaffProfile>> {
  Ok(
    select_staff_profiles(conn, "WHERE st.registration_number = ?1", [registration_number])?
      .into_iter()
      .next(),
  )
}

pub fn resident(conn: &Connection, id: i64) -> Result<Option<Resident>> {
  Ok(select_residents(conn, "WHERE r.resident_id = ?1", [id])?.into_iter().next())
}

pub fn resident_profile(conn: &Connection, id: i64) -> Result<Option<ResidentProfile>> {
  Ok(select_resident_profiles(conn, "WHERE r.resident_id = ?1", [id])?.into_iter().next())
}

pub fn resident_profile_by_record(
  conn: &Connection,
  record_number: &str,
) -> Result<Option<ResidentProfile>> {
  Ok(
    select_resident_profiles(conn, "WHERE r.record_number = ?1", [record_number])?
      .into_iter()
      .next(),
  )
}

pub fn stay(conn: &Connection, id: i64) -> Result<Option<Stay>> {
  Ok(select_stays(conn, "WHERE y.stay_id = ?1", [id])?.into_iter().next())
}

pub fn active_stay_of(conn: &Connection, resident_id: i64) -> Result<Option<Stay>> {
  Ok(
    select_stays(conn, "WHERE y.resident_id = ?1 AND y.active = 1", [resident_id])?
      .into_iter()
      .next(),
  )
}

pub fn family_contact(conn: &Connection, id: i64) -> Result<Option<FamilyContact>> {
  Ok(select_family_contacts(conn, "WHERE f.contact_id = ?1", [id])?.into_iter().next())
}

/// Id of the row holding `value` in the `key` column, other than `exclude`.
pub fn holder_of(
  conn: &Connection,
  key: UniqueKey,
  value: &str,
  exclude: Option<i64>,
) -> Result<Option<i64>> {
  let (table, id, column) = match key {
    UniqueKey::TaxId => ("persons", "person_id", "tax_id"),
    UniqueKey::Email => ("persons", "person_id", "email"),
    UniqueKey::RegistrationNumber => ("staff", "staff_id", "registration_number"),
    UniqueKey::RecordNumber => ("residents", "resident_id", "record_number"),
    UniqueKey::ShelterRegistration => ("shelters", "shelter_id", "tax_registration_id"),
  };
  let sql =
    format!("SELECT {id} FROM {table} WHERE {column} = ?1 AND (?2 IS NULL OR {id} != ?2)");
  Ok(conn.query_row(&sql, params![value, exclude], |r| r.get(0)).optional()?)
}

// ─── Listings ────────────────────────────────────────────────────────────────

pub fn all_shelters(conn: &Connection) -> Result<Vec<Shelter>> {
  select_shelters(conn, "ORDER BY sh.name, sh.shelter_id", [])
}

pub fn all_staff_profiles(conn: &Connection) -> Result<Vec<StaffProfile>> {
  select_staff_profiles(conn, "ORDER BY p.name, st.staff_id", [])
}

pub fn all_resident_profiles(conn: &Connection) -> Result<Vec<ResidentProfile>> {
  select_resident_profiles(conn, "ORDER BY p.name, r.resident_id", [])
}

/// Stays ordered by entry date, newest first.
pub fn all_stays(conn: &Connection) -> Result<Vec<Stay>> {
  select_stays(conn, "ORDER BY y.entry_date DESC, y.stay_id DESC", [])
}

/// Care logs ordered by date, newest first.
pub fn all_care_logs(conn: &Connection) -> Result<Vec<CareLog>> {
  let sql = format!("SELECT {CARE_LOG_COLS} FROM care_logs c ORDER BY c.date DESC, c.care_log_id DESC");
  rows(conn, &sql, [], read_care_log)?.into_iter().map(RawCareLog::into_care_log).collect()
}

/// Emergency contacts first, then by name.
pub fn family_contacts_of(
  conn: &Connection,
  resident_id: i64,
  emergency_only: bool,
) -> Result<Vec<FamilyContact>> {
  select_family_contacts(
    conn,
    "WHERE f.resident_id = ?1 AND (?2 = 0 OR f.emergency = 1)
     ORDER BY f.emergency DESC, f.name",
    params![resident_id, emergency_only],
  )
}

/// Oldest first.
pub fn transfers_of(conn: &Connection, staff_id: i64) -> Result<Vec<StaffTransfer>> {
  let sql = format!(
    "SELECT {TRANSFER_COLS} FROM staff_transfers t WHERE t.staff_id = ?1 ORDER BY t.transfer_id"
  );
  rows(conn, &sql, [staff_id], read_transfer)?
    .into_iter()
    .map(RawTransfer::into_transfer)
    .collect()
}

/// Ids of residents that currently hold an active stay.
pub fn admitted_residents(conn: &Connection) -> Result<HashSet<i64>> {
  let ids = rows(conn, "SELECT resident_id FROM stays WHERE active = 1", [], |r| r.get(0))?;
  Ok(ids.into_iter().collect())
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn active_stay_count(conn: &Connection, shelter_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM stays WHERE shelter_id = ?1 AND active = 1", shelter_id)
}

pub fn stay_count_of_shelter(conn: &Connection, shelter_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM stays WHERE shelter_id = ?1", shelter_id)
}

pub fn stay_count_of_resident(conn: &Connection, resident_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM stays WHERE resident_id = ?1", resident_id)
}

pub fn transfer_count_of_staff(conn: &Connection, staff_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM staff_transfers WHERE staff_id = ?1", staff_id)
}

pub fn care_log_count_of_staff(conn: &Connection, staff_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM care_logs WHERE staff_id = ?1", staff_id)
}

pub fn care_log_count_of_resident(conn: &Connection, resident_id: i64) -> Result<u32> {
  count(conn, "SELECT COUNT(*) FROM care_logs WHERE resident_id = ?1", resident_id)
}

pub fn total_active_stays(conn: &Connection) -> Result<u32> {
  Ok(conn.query_row("SELECT COUNT(*) FROM stays WHERE active = 1", [], |r| r.get(0))?)
}

pub fn total_care_logs(conn: &Connection) -> Result<u32> {
  Ok(conn.query_row("SELECT COUNT(*) FROM care_logs", [], |r| r.get(0))?)
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

pub fn insert_person(conn: &Connection, input: &NewPerson, role: PersonRole) -> Result<Person> {
  let a = &input.address;
  let role_str = role.as_str();
  conn.execute(
    "INSERT INTO persons (
       tax_id, name, birth_date, phone, secondary_phone, email,
       street, number, district, city, state, postal_code, role, active
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1)",
    params![
      input.tax_id,
      input.name,
      encode_date(input.birth_date),
      input.phone,
      input.secondary_phone,
      input.email,
      a.street,
      a.number,
      a.district,
      a.city,
      a.state,
      a.postal_code,
      role_str,
    ],
  )?;
  Ok(Person {
    person_id:       conn.last_insert_rowid(),
    tax_id:          input.tax_id.clone(),
    name:            input.name.clone(),
    birth_date:      input.birth_date,
    phone:           input.phone.clone(),
    secondary_phone: input.secondary_phone.clone(),
    email:           input.email.clone(),
    address:         input.address.clone(),
    role,
    active:          true,
  })
}

pub fn insert_shelter(conn: &Connection, input: &NewShelter) -> Result<Shelter> {
  let a = &input.address;
  let kind = input.kind.as_str();
  conn.execute(
    "INSERT INTO shelters (
       tax_registration_id, name, capacity, street, number, district, city, state,
       postal_code, phone, kind, legal_representative, active
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1)",
    params![
      input.tax_registration_id,
      input.name,
      input.capacity,
      a.street,
      a.number,
      a.district,
      a.city,
      a.state,
      a.postal_code,
      input.phone,
      kind,
      input.legal_representative,
    ],
  )?;
  Ok(Shelter {
    shelter_id:           conn.last_insert_rowid(),
    tax_registration_id:  input.tax_registration_id.clone(),
    name:                 input.name.clone(),
    capacity:             input.capacity,
    address:              input.address.clone(),
    phone:                input.phone.clone(),
    kind:                 input.kind,
    legal_representative: input.legal_representative.clone(),
    active:               true,
  })
}

pub fn insert_staff(conn: &Connection, staff: &Staff) -> Result<Staff> {
  let shift = staff.shift.as_str();
  let status = staff.status.as_str();
  conn.execute(
    "INSERT INTO staff (
       person_id, registration_number, job_title, hire_date, salary, shift, status, shelter_id
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    params![
      staff.person_id,
      staff.registration_number,
      staff.job_title,
      encode_date(staff.hire_date),
      encode_decimal(staff.salary),
      shift,
      status,
      staff.shelter_id,
    ],
  )?;
  Ok(Staff { staff_id: conn.last_insert_rowid(), ..staff.clone() })
}

pub fn insert_resident(conn: &Connection, resident: &Resident) -> Result<Resident> {
  let status = resident.status.as_str();
  conn.execute(
    "INSERT INTO residents (
       person_id, record_number, entry_date, exit_date, intake_reason,
       chemical_dependency, has_disability, disability_kind, status
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      resident.person_id,
      resident.record_number,
      encode_date(resident.entry_date),
      resident.exit_date.map(encode_date),
      resident.intake_reason,
      resident.chemical_dependency,
      resident.has_disability,
      resident.disability_kind,
      status,
    ],
  )?;
  Ok(Resident { resident_id: conn.last_insert_rowid(), ..resident.clone() })
}

pub fn insert_stay(conn: &Connection, admission: &Admission) -> Result<Stay> {
  conn.execute(
    "INSERT INTO stays (resident_id, shelter_id, entry_date, slot, active)
     VALUES (?1, ?2, ?3, ?4, 1)",
    params![
      admission.resident_id,
      admission.shelter_id,
      encode_date(admission.entry_date),
      admission.slot,
    ],
  )?;
  Ok(Stay {
    stay_id:     conn.last_insert_rowid(),
    resident_id: admission.resident_id,
    shelter_id:  admission.shelter_id,
    entry_date:  admission.entry_date,
    exit_date:   None,
    slot:        admission.slot.clone(),
    active:      true,
    exit_reason: None,
    notes:       None,
  })
}

pub fn insert_care_log(conn: &Connection, log: &NewCareLog) -> Result<CareLog> {
  conn.execute(
    "INSERT INTO care_logs (resident_id, staff_id, date, category, description, notes)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      log.resident_id,
      log.staff_id,
      encode_date(log.date),
      log.category,
      log.description,
      log.notes,
    ],
  )?;
  Ok(CareLog {
    care_log_id: conn.last_insert_rowid(),
    resident_id: log.resident_id,
    staff_id:    log.staff_id,
    date:        log.date,
    category:    log.category.clone(),
    description: log.description.clone(),
    notes:       log.notes.clone(),
  })
}

pub fn insert_family_contact(
  conn: &Connection,
  resident_id: i64,
  contact: &NewFamilyContact,
) -> Result<FamilyContact> {
  conn.execute(
    "INSERT INTO family_contacts (resident_id, name, relationship, phone, emergency)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![resident_id, contact.name, contact.relationship, contact.phone, contact.emergency],
  )?;
  Ok(FamilyContact {
    contact_id: conn.last_insert_rowid(),
    resident_id,
    name: contact.name.clone(),
    relationship: contact.relationship.clone(),
    phone: contact.phone.clone(),
    emergency: contact.emergency,
  })
}

pub fn append_transfer(
  conn: &Connection,
  staff_id: i64,
  from: Option<i64>,
  to: Option<i64>,
  at: DateTime<Utc>,
) -> Result<StaffTransfer> {
  conn.execute(
    "INSERT INTO staff_transfers (staff_id, from_shelter_id, to_shelter_id, recorded_at)
     VALUES (?1, ?2, ?3, ?4)",
    params![staff_id, from, to, encode_dt(at)],
  )?;
  Ok(StaffTransfer {
    transfer_id: conn.last_insert_rowid(),
    staff_id,
    from_shelter_id: from,
    to_shelter_id: to,
    recorded_at: at,
  })
}

// ─── Updates ─────────────────────────────────────────────────────────────────

pub fn update_person(conn: &Connection, p: &Person) -> Result<()> {
  let a = &p.address;
  conn.execute(
    "UPDATE persons SET
       tax_id = ?2, name = ?3, birth_date = ?4, phone = ?5, secondary_phone = ?6,
       email = ?7, street = ?8, number = ?9, district = ?10, city = ?11, state = ?12,
       postal_code = ?13, active = ?14
     WHERE person_id = ?1",
    params![
      p.person_id,
      p.tax_id,
      p.name,
      encode_date(p.birth_date),
      p.phone,
      p.secondary_phone,
      p.email,
      a.street,
      a.number,
      a.district,
      a.city,
      a.state,
      a.postal_code,
      p.active,
    ],
  )?;
  Ok(())
}

pub fn update_shelter(conn: &Connection, s: &Shelter) -> Result<()> {
  let a = &s.address;
  let kind = s.kind.as_str();
  conn.execute(
    "UPDATE shelters SET
       tax_registration_id = ?2, name = ?3, capacity = ?4, street = ?5, number = ?6,
       district = ?7, city = ?8, state = ?9, postal_code = ?10, phone = ?11, kind = ?12,
       legal_representative = ?13, active = ?14
     WHERE shelter_id = ?1",
    params![
      s.shelter_id,
      s.tax_registration_id,
      s.name,
      s.capacity,
      a.street,
      a.number,
      a.district,
      a.city,
      a.state,
      a.postal_code,
      s.phone,
      kind,
      s.legal_representative,
      s.active,
    ],
  )?;
  Ok(())
}

pub fn update_staff(conn: &Connection, s: &Staff) -> Result<()> {
  let shift = s.shift.as_str();
  let status = s.status.as_str();
  conn.execute(
    "UPDATE staff SET
       registration_number = ?2, job_title = ?3, hire_date = ?4, salary = ?5, shift = ?6,
       status = ?7, shelter_id = ?8
     WHERE staff_id = ?1",
    params![
      s.staff_id,
      s.registration_number,
      s.job_title,
      encode_date(s.hire_date),
      encode_decimal(s.salary),
      shift,
      status,
      s.shelter_id,
    ],
  )?;
  Ok(())
}

pub fn update_resident(conn: &Connection, r: &Resident) -> Result<()> {
  let status = r.status.as_str();
  conn.execute(
    "UPDATE residents SET
       record_number = ?2, entry_date = ?3, exit_date = ?4, intake_reason = ?5,
       chemical_dependency = ?6, has_disability = ?7, disability_kind = ?8, status = ?9
     WHERE resident_id = ?1",
    params![
      r.resident_id,
      r.record_number,
      encode_date(r.entry_date),
      r.exit_date.map(encode_date),
      r.intake_reason,
      r.chemical_dependency,
      r.has_disability,
      r.disability_kind,
      status,
    ],
  )?;
  Ok(())
}

pub fn update_stay(conn: &Connection, s: &Stay) -> Result<()> {
  conn.execute(
    "UPDATE stays SET
       exit_date = ?2, slot = ?3, active = ?4, exit_reason = ?5, notes = ?6
     WHERE stay_id = ?1",
    params![s.stay_id, s.exit_date.map(encode_date), s.slot, s.active, s.exit_reason, s.notes],
  )?;
  Ok(())
}

pub fn update_family_contact(conn: &Connection, c: &FamilyContact) -> Result<()> {
  conn.execute(
    "UPDATE family_contacts SET name = ?2, relationship = ?3, phone = ?4, emergency = ?5
     WHERE contact_id = ?1",
    params![c.contact_id, c.name, c.relationship, c.phone, c.emergency],
  )?;
  Ok(())
}

pub fn detach_staff_from(conn: &Connection, shelter_id: i64) -> Result<u32> {
  let n = conn.execute("UPDATE staff SET shelter_id = NULL WHERE shelter_id = ?1", [shelter_id])?;
  Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

pub fn delete_person(conn: &Connection, id: i64) -> Result<()> {
  conn.execute("DELETE FROM persons WHERE person_id = ?1", [id])?;
  Ok(())
}

pub fn delete_shelter(conn: &Connection, id: i64) -> Result<()> {
  conn.execute("DELETE FROM shelters WHERE shelter_id = ?1", [id])?;
  Ok(())
}

pub fn delete_staff(conn: &Connection, id: i64) -> Result<()> {
  conn.execute("DELETE FROM staff WHERE staff_id = ?1", [id])?;
  Ok(())
}

pub fn delete_resident(conn: &Connection, id: i64) -> Result<()> {
  conn.execute("DELETE FROM residents WHERE resident_id = ?1", [id])?;
  Ok(())
}

pub fn delete_family_contacts_of(conn: &Connection, resident_id: i64) -> Result<()> {
  conn.execute("DELETE FROM family_contacts WHERE resident_id = ?1", [resident_id])?;
  Ok(())
}
