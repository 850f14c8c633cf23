//! The rule engine: one function per state transition.
//!
//! Each function runs against a [`UnitOfWork`] that the caller has opened
//! for exactly this operation. On `Err` the caller must roll back, so a
//! function may fail after it has started writing without leaving partial
//! state behind.
//!
//! Invariants maintained here:
//!
//! - tax id, email, staff registration number, resident record number and
//!   shelter tax registration id are unique among stored rows;
//! - active stays at a shelter never exceed its capacity;
//! - a resident holds at most one active stay;
//! - stays, care logs and family contacts reference existing rows;
//! - a person carries exactly one specialised record matching its role;
//! - history (stays, care logs, transfers) is never deleted: entities that
//!   own history are deactivated instead.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    CareLog, FamilyContact, Person, Resident, ResidentProfile, Shelter, Staff,
    StaffProfile, StaffTransfer, Stay,
  },
  error::{Entity, Error, Result},
  input::{
    Admission, Discharge, FamilyContactPatch, NewCareLog, NewFamilyContact, NewPerson,
    NewResident, NewShelter, NewStaff, PersonPatch, ResidentPatch, ShelterPatch, StaffPatch,
  },
  tags::{EmploymentStatus, PersonRole, ResidencyStatus},
  uow::{UniqueKey, UnitOfWork},
  validate,
};

/// What a removal request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
  /// The rows are gone.
  Deleted,
  /// History prevented deletion; the entity was soft-deactivated.
  Deactivated,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn found<T>(row: Option<T>, entity: Entity, id: i64) -> Result<T> {
  row.ok_or_else(|| Error::not_found(entity, id))
}

fn ensure_unique<U: UnitOfWork + ?Sized>(
  uow: &U,
  key: UniqueKey,
  value: &str,
  exclude: Option<i64>,
) -> Result<()> {
  if uow.holder_of(key, value, exclude)?.is_some() {
    return Err(Error::DuplicateKey { field: key.field(), value: value.to_owned() });
  }
  Ok(())
}

fn active_shelter<U: UnitOfWork + ?Sized>(uow: &U, id: i64) -> Result<Shelter> {
  let shelter = found(uow.shelter(id)?, Entity::Shelter, id)?;
  if !shelter.active {
    return Err(Error::invalid(format!("shelter {id} is inactive")));
  }
  Ok(shelter)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn draft_person(input: &NewPerson, role: PersonRole) -> Person {
  Person {
    person_id:       0,
    tax_id:          input.tax_id.clone(),
    name:            input.name.clone(),
    birth_date:      input.birth_date,
    phone:           input.phone.clone(),
    secondary_phone: input.secondary_phone.clone(),
    email:           input.email.clone(),
    address:         input.address.clone(),
    role,
    active:          true,
  }
}

/// Validate a new person and check its unique columns.
fn check_new_person<U: UnitOfWork + ?Sized>(
  uow: &U,
  input: &NewPerson,
  role: PersonRole,
) -> Result<()> {
  validate::person(&draft_person(input, role))?;
  ensure_unique(uow, UniqueKey::TaxId, &input.tax_id, None)?;
  if let Some(email) = &input.email {
    ensure_unique(uow, UniqueKey::Email, email, None)?;
  }
  Ok(())
}

// ─── Shelters ────────────────────────────────────────────────────────────────

pub fn create_shelter<U: UnitOfWork + ?Sized>(uow: &mut U, input: NewShelter) -> Result<Shelter> {
  validate::shelter(&Shelter {
    shelter_id:           0,
    tax_registration_id:  input.tax_registration_id.clone(),
    name:                 input.name.clone(),
    capacity:             input.capacity,
    address:              input.address.clone(),
    phone:                input.phone.clone(),
    kind:                 input.kind,
    legal_representative: input.legal_representative.clone(),
    active:               true,
  })?;
  ensure_unique(uow, UniqueKey::ShelterRegistration, &input.tax_registration_id, None)?;

  let shelter = uow.insert_shelter(&input)?;
  tracing::debug!(shelter_id = shelter.shelter_id, "shelter created");
  Ok(shelter)
}

pub fn update_shelter<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  patch: ShelterPatch,
) -> Result<Shelter> {
  let mut shelter = found(uow.shelter(id)?, Entity::Shelter, id)?;
  if let Some(reg) = &patch.tax_registration_id
    && *reg != shelter.tax_registration_id
  {
    ensure_unique(uow, UniqueKey::ShelterRegistration, reg, Some(id))?;
  }
  patch.apply(&mut shelter);
  validate::shelter(&shelter)?;

  // Lowering capacity must not strand current occupants over the limit.
  if uow.active_stay_count(id)? > shelter.capacity {
    return Err(Error::CapacityExceeded { shelter_id: id, capacity: shelter.capacity });
  }

  uow.update_shelter(&shelter)?;
  tracing::debug!(shelter_id = id, "shelter updated");
  Ok(shelter)
}

/// Hard-delete a shelter, or deactivate it when deletion is not allowed.
///
/// - With active occupants: fails with [`Error::HasActiveOccupants`] unless
///   `force`, in which case the shelter is deactivated.
/// - Without occupants but with past stays: deactivated, keeping history.
/// - Otherwise: staff assigned to it are detached and the shelter deleted.
pub fn remove_shelter<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  force: bool,
) -> Result<Removal> {
  let mut shelter = found(uow.shelter(id)?, Entity::Shelter, id)?;
  let occupants = uow.active_stay_count(id)?;

  if occupants > 0 && !force {
    return Err(Error::HasActiveOccupants { shelter_id: id, occupants });
  }

  if occupants > 0 || uow.stay_count_of_shelter(id)? > 0 {
    shelter.active = false;
    uow.update_shelter(&shelter)?;
    tracing::info!(shelter_id = id, occupants, "shelter deactivated");
    return Ok(Removal::Deactivated);
  }

  let detached = uow.detach_staff_from(id)?;
  uow.delete_shelter(id)?;
  tracing::info!(shelter_id = id, detached, "shelter deleted");
  Ok(Removal::Deleted)
}

// ─── People ──────────────────────────────────────────────────────────────────

pub fn create_staff<U: UnitOfWork + ?Sized>(uow: &mut U, input: NewStaff) -> Result<StaffProfile> {
  check_new_person(uow, &input.person, PersonRole::Staff)?;

  let draft = Staff {
    staff_id:            0,
    person_id:           0,
    registration_number: input.registration_number,
    job_title:           input.job_title,
    hire_date:           input.hire_date,
    salary:              input.salary,
    shift:               input.shift,
    status:              EmploymentStatus::Active,
    shelter_id:          input.shelter_id,
  };
  validate::staff(&draft)?;
  ensure_unique(uow, UniqueKey::RegistrationNumber, &draft.registration_number, None)?;
  if let Some(shelter_id) = draft.shelter_id {
    active_shelter(uow, shelter_id)?;
  }

  let person = uow.insert_person(&input.person, PersonRole::Staff)?;
  let staff = uow.insert_staff(&Staff { person_id: person.person_id, ..draft })?;
  tracing::debug!(staff_id = staff.staff_id, person_id = person.person_id, "staff created");
  Ok(StaffProfile { person, staff })
}

pub fn create_resident<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  input: NewResident,
) -> Result<ResidentProfile> {
  check_new_person(uow, &input.person, PersonRole::Resident)?;

  let draft = Resident {
    resident_id:         0,
    person_id:           0,
    record_number:       input.record_number,
    entry_date:          input.entry_date,
    exit_date:           None,
    intake_reason:       input.intake_reason,
    chemical_dependency: input.chemical_dependency,
    has_disability:      input.has_disability,
    disability_kind:     blank_to_none(input.disability_kind),
    status:              ResidencyStatus::Active,
  };
  validate::resident(&draft)?;
  ensure_unique(uow, UniqueKey::RecordNumber, &draft.record_number, None)?;

  let person = uow.insert_person(&input.person, PersonRole::Resident)?;
  let resident = uow.insert_resident(&Resident { person_id: person.person_id, ..draft })?;
  tracing::debug!(resident_id = resident.resident_id, person_id = person.person_id, "resident created");
  Ok(ResidentProfile { person, resident })
}

pub fn update_person<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  patch: PersonPatch,
) -> Result<Person> {
  let mut person = found(uow.person(id)?, Entity::Person, id)?;
  if let Some(Some(email)) = &patch.email
    && person.email.as_ref() != Some(email)
  {
    ensure_unique(uow, UniqueKey::Email, email, Some(id))?;
  }
  patch.apply(&mut person);
  validate::person(&person)?;

  uow.update_person(&person)?;
  tracing::debug!(person_id = id, "person updated");
  Ok(person)
}

pub fn update_staff<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  patch: StaffPatch,
) -> Result<Staff> {
  let mut staff = found(uow.staff(id)?, Entity::Staff, id)?;
  if let Some(reg) = &patch.registration_number
    && *reg != staff.registration_number
  {
    ensure_unique(uow, UniqueKey::RegistrationNumber, reg, Some(id))?;
  }
  patch.apply(&mut staff);
  validate::staff(&staff)?;

  uow.update_staff(&staff)?;
  tracing::debug!(staff_id = id, "staff updated");
  Ok(staff)
}

/// Reassign a staff member and append the move to the transfer trail.
/// `None` leaves the staff member unassigned.
pub fn transfer_staff<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  staff_id: i64,
  to: Option<i64>,
) -> Result<StaffTransfer> {
  let mut staff = found(uow.staff(staff_id)?, Entity::Staff, staff_id)?;
  if let Some(shelter_id) = to {
    active_shelter(uow, shelter_id)?;
  }
  if staff.shelter_id == to {
    return Err(Error::invalid(format!(
      "staff {staff_id} is already assigned there"
    )));
  }

  let from = staff.shelter_id;
  staff.shelter_id = to;
  uow.update_staff(&staff)?;
  let transfer = uow.append_transfer(staff_id, from, to, Utc::now())?;
  tracing::info!(staff_id, ?from, ?to, "staff transferred");
  Ok(transfer)
}

/// Hard-delete a staff member and its person. Fails with
/// [`Error::HasHistory`] if any care log or transfer references it.
pub fn purge_staff<U: UnitOfWork + ?Sized>(uow: &mut U, id: i64) -> Result<()> {
  let staff = found(uow.staff(id)?, Entity::Staff, id)?;
  if uow.care_log_count_of_staff(id)? > 0 || uow.transfer_count_of_staff(id)? > 0 {
    return Err(Error::HasHistory { entity: Entity::Staff, id });
  }
  uow.delete_staff(id)?;
  uow.delete_person(staff.person_id)?;
  tracing::info!(staff_id = id, "staff deleted");
  Ok(())
}

/// Delete a staff member, or deactivate it if it has history.
pub fn remove_staff<U: UnitOfWork + ?Sized>(uow: &mut U, id: i64) -> Result<Removal> {
  match purge_staff(uow, id) {
    Ok(()) => Ok(Removal::Deleted),
    Err(Error::HasHistory { .. }) => {
      let mut staff = found(uow.staff(id)?, Entity::Staff, id)?;
      let mut person = found(uow.person(staff.person_id)?, Entity::Person, staff.person_id)?;
      staff.status = EmploymentStatus::Inactive;
      person.active = false;
      uow.update_staff(&staff)?;
      uow.update_person(&person)?;
      tracing::info!(staff_id = id, "staff deactivated");
      Ok(Removal::Deactivated)
    }
    Err(e) => Err(e),
  }
}

pub fn update_resident<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  patch: ResidentPatch,
) -> Result<Resident> {
  let mut resident = found(uow.resident(id)?, Entity::Resident, id)?;
  if let Some(rec) = &patch.record_number
    && *rec != resident.record_number
  {
    ensure_unique(uow, UniqueKey::RecordNumber, rec, Some(id))?;
  }
  patch.apply(&mut resident);
  resident.disability_kind = blank_to_none(resident.disability_kind.take());
  validate::resident(&resident)?;

  uow.update_resident(&resident)?;
  tracing::debug!(resident_id = id, status = %resident.status, "resident updated");
  Ok(resident)
}

/// Hard-delete a resident, its family contacts and its person.
///
/// Fails with [`Error::AlreadyAdmitted`] while the resident holds an active
/// stay and with [`Error::HasHistory`] if any stay or care log exists.
pub fn purge_resident<U: UnitOfWork + ?Sized>(uow: &mut U, id: i64) -> Result<()> {
  let resident = found(uow.resident(id)?, Entity::Resident, id)?;
  if let Some(stay) = uow.active_stay_of(id)? {
    return Err(Error::AlreadyAdmitted { resident_id: id, stay_id: stay.stay_id });
  }
  if uow.stay_count_of_resident(id)? > 0 || uow.care_log_count_of_resident(id)? > 0 {
    return Err(Error::HasHistory { entity: Entity::Resident, id });
  }
  uow.delete_family_contacts_of(id)?;
  uow.delete_resident(id)?;
  uow.delete_person(resident.person_id)?;
  tracing::info!(resident_id = id, "resident deleted");
  Ok(())
}

/// Delete a resident, or mark it discharged and inactive if it has history.
pub fn remove_resident<U: UnitOfWork + ?Sized>(uow: &mut U, id: i64) -> Result<Removal> {
  match purge_resident(uow, id) {
    Ok(()) => Ok(Removal::Deleted),
    Err(Error::HasHistory { .. }) => {
      let mut resident = found(uow.resident(id)?, Entity::Resident, id)?;
      let mut person =
        found(uow.person(resident.person_id)?, Entity::Person, resident.person_id)?;
      let today = Utc::now().date_naive();
      resident.status = ResidencyStatus::Discharged;
      resident.exit_date = Some(resident.exit_date.unwrap_or(today.max(resident.entry_date)));
      person.active = false;
      uow.update_resident(&resident)?;
      uow.update_person(&person)?;
      tracing::info!(resident_id = id, "resident deactivated");
      Ok(Removal::Deactivated)
    }
    Err(e) => Err(e),
  }
}

// ─── Admission ───────────────────────────────────────────────────────────────

/// Admit a resident to a shelter bed.
///
/// Capacity and the single-active-stay rule are checked inside the same
/// unit of work that inserts the stay.
pub fn admit<U: UnitOfWork + ?Sized>(uow: &mut U, admission: Admission) -> Result<Stay> {
  let Admission { resident_id, shelter_id, .. } = admission;

  let resident = found(uow.resident(resident_id)?, Entity::Resident, resident_id)?;
  let shelter = found(uow.shelter(shelter_id)?, Entity::Shelter, shelter_id)?;

  let occupied = uow.active_stay_count(shelter_id)?;
  if occupied >= shelter.capacity {
    return Err(Error::CapacityExceeded { shelter_id, capacity: shelter.capacity });
  }
  if let Some(stay) = uow.active_stay_of(resident_id)? {
    return Err(Error::AlreadyAdmitted { resident_id, stay_id: stay.stay_id });
  }

  if !shelter.active {
    return Err(Error::invalid(format!("shelter {shelter_id} is inactive")));
  }
  let person = found(uow.person(resident.person_id)?, Entity::Person, resident.person_id)?;
  if !person.active || resident.status != ResidencyStatus::Active {
    return Err(Error::invalid(format!(
      "resident {resident_id} is not active (status {})",
      resident.status
    )));
  }

  let admission = Admission { slot: blank_to_none(admission.slot), ..admission };
  let stay = uow.insert_stay(&admission)?;
  tracing::info!(
    stay_id = stay.stay_id,
    resident_id,
    shelter_id,
    occupied = occupied + 1,
    capacity = shelter.capacity,
    "resident admitted"
  );
  Ok(stay)
}

/// Close an active stay. A discharged stay is never reopened.
pub fn discharge<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  stay_id: i64,
  input: Discharge,
) -> Result<Stay> {
  let mut stay = found(uow.stay(stay_id)?, Entity::Stay, stay_id)?;
  if !stay.active {
    return Err(Error::AlreadyDischarged(stay_id));
  }

  let exit = input.exit_date.unwrap_or_else(|| Utc::now().date_naive());
  if exit < stay.entry_date {
    return Err(Error::invalid(format!(
      "exit date {exit} precedes entry date {}",
      stay.entry_date
    )));
  }

  stay.exit_date = Some(exit);
  stay.active = false;
  stay.exit_reason = blank_to_none(input.reason);
  stay.notes = blank_to_none(input.notes);
  uow.update_stay(&stay)?;
  tracing::info!(stay_id, resident_id = stay.resident_id, shelter_id = stay.shelter_id, "stay discharged");
  Ok(stay)
}

// ─── Care and contacts ───────────────────────────────────────────────────────

pub fn record_care_log<U: UnitOfWork + ?Sized>(uow: &mut U, input: NewCareLog) -> Result<CareLog> {
  validate::care_log(&CareLog {
    care_log_id: 0,
    resident_id: input.resident_id,
    staff_id:    input.staff_id,
    date:        input.date,
    category:    input.category.clone(),
    description: input.description.clone(),
    notes:       input.notes.clone(),
  })?;
  found(uow.resident(input.resident_id)?, Entity::Resident, input.resident_id)?;
  found(uow.staff(input.staff_id)?, Entity::Staff, input.staff_id)?;

  let log = uow.insert_care_log(&input)?;
  tracing::debug!(care_log_id = log.care_log_id, "care log recorded");
  Ok(log)
}

pub fn add_family_contact<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  resident_id: i64,
  input: NewFamilyContact,
) -> Result<FamilyContact> {
  validate::family_contact(&FamilyContact {
    contact_id:   0,
    resident_id,
    name:         input.name.clone(),
    relationship: input.relationship.clone(),
    phone:        input.phone.clone(),
    emergency:    input.emergency,
  })?;
  found(uow.resident(resident_id)?, Entity::Resident, resident_id)?;

  let contact = uow.insert_family_contact(resident_id, &input)?;
  tracing::debug!(contact_id = contact.contact_id, resident_id, "family contact added");
  Ok(contact)
}

pub fn update_family_contact<U: UnitOfWork + ?Sized>(
  uow: &mut U,
  id: i64,
  patch: FamilyContactPatch,
) -> Result<FamilyContact> {
  let mut contact = found(uow.family_contact(id)?, Entity::FamilyContact, id)?;
  patch.apply(&mut contact);
  validate::family_contact(&contact)?;
  uow.update_family_contact(&contact)?;
  Ok(contact)
}

// ─── Availability ────────────────────────────────────────────────────────────

/// Whether `value` is free in the `key` column, ignoring the row `exclude`.
pub fn is_available<U: UnitOfWork + ?Sized>(
  uow: &U,
  key: UniqueKey,
  value: &str,
  exclude: Option<i64>,
) -> Result<bool> {
  Ok(uow.holder_of(key, value, exclude)?.is_none())
}
