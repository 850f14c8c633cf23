//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`, timestamps as RFC 3339 strings
//! and money as canonical decimal strings. Tags use their SCREAMING_SNAKE_CASE
//! names. Booleans are stored as `0`/`1` integers and read back by rusqlite.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use refuge_core::entity::{
  Address, CareLog, FamilyContact, Person, Resident, Shelter, Staff, StaffTransfer, Stay,
};
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.normalize().to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── Tags ────────────────────────────────────────────────────────────────────

/// Parse a tag column through the tag's `FromStr`.
pub fn decode_tag<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::UnknownTag { column, value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Address columns as read from `persons` or `shelters`.
pub struct RawAddress {
  pub street:      String,
  pub number:      Option<String>,
  pub district:    String,
  pub city:        String,
  pub state:       String,
  pub postal_code: Option<String>,
}

impl RawAddress {
  pub fn into_address(self) -> Address {
    Address {
      street:      self.street,
      number:      self.number,
      district:    self.district,
      city:        self.city,
      state:       self.state,
      postal_code: self.postal_code,
    }
  }
}

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:       i64,
  pub tax_id:          String,
  pub name:            String,
  pub birth_date:      String,
  pub phone:           String,
  pub secondary_phone: Option<String>,
  pub email:           Option<String>,
  pub address:         RawAddress,
  pub role:            String,
  pub active:          bool,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:       self.person_id,
      tax_id:          self.tax_id,
      name:            self.name,
      birth_date:      decode_date(&self.birth_date)?,
      phone:           self.phone,
      secondary_phone: self.secondary_phone,
      email:           self.email,
      address:         self.address.into_address(),
      role:            decode_tag("persons.role", &self.role)?,
      active:          self.active,
    })
  }
}

/// Raw values read directly from a `shelters` row.
pub struct RawShelter {
  pub shelter_id:           i64,
  pub tax_registration_id:  String,
  pub name:                 String,
  pub capacity:             u32,
  pub address:              RawAddress,
  pub phone:                String,
  pub kind:                 String,
  pub legal_representative: String,
  pub active:               bool,
}

impl RawShelter {
  pub fn into_shelter(self) -> Result<Shelter> {
    Ok(Shelter {
      shelter_id:           self.shelter_id,
      tax_registration_id:  self.tax_registration_id,
      name:                 self.name,
      capacity:             self.capacity,
      address:              self.address.into_address(),
      phone:                self.phone,
      kind:                 decode_tag("shelters.kind", &self.kind)?,
      legal_representative: self.legal_representative,
      active:               self.active,
    })
  }
}

/// Raw values read directly from a `staff` row.
pub struct RawStaff {
  pub staff_id:            i64,
  pub person_id:           i64,
  pub registration_number: String,
  pub job_title:           String,
  pub hire_date:           String,
  pub salary:              String,
  pub shift:               String,
  pub status:              String,
  pub shelter_id:          Option<i64>,
}

impl RawStaff {
  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      staff_id:            self.staff_id,
      person_id:           self.person_id,
      registration_number: self.registration_number,
      job_title:           self.job_title,
      hire_date:           decode_date(&self.hire_date)?,
      salary:              decode_decimal(&self.salary)?,
      shift:               decode_tag("staff.shift", &self.shift)?,
      status:              decode_tag("staff.status", &self.status)?,
      shelter_id:          self.shelter_id,
    })
  }
}

/// Raw values read directly from a `residents` row.
pub struct RawResident {
  pub resident_id:         i64,
  pub person_id:           i64,
  pub record_number:       String,
  pub entry_date:          String,
  pub exit_date:           Option<String>,
  pub intake_reason:       String,
  pub chemical_dependency: bool,
  pub has_disability:      bool,
  pub disability_kind:     Option<String>,
  pub status:              String,
}

impl RawResident {
  pub fn into_resident(self) -> Result<Resident> {
    Ok(Resident {
      resident_id:         self.resident_id,
      person_id:           self.person_id,
      record_number:       self.record_number,
      entry_date:          decode_date(&self.entry_date)?,
      exit_date:           decode_opt_date(self.exit_date)?,
      intake_reason:       self.intake_reason,
      chemical_dependency: self.chemical_dependency,
      has_disability:      self.has_disability,
      disability_kind:     self.disability_kind,
      status:              decode_tag("residents.status", &self.status)?,
    })
  }
}

/// Raw values read directly from a `stays` row.
pub struct RawStay {
  pub stay_id:     i64,
  pub resident_id: i64,
  pub shelter_id:  i64,
  pub entry_date:  String,
  pub exit_date:   Option<String>,
  pub slot:        Option<String>,
  pub active:      bool,
  pub exit_reason: Option<String>,
  pub notes:       Option<String>,
}

impl RawStay {
  pub fn into_stay(self) -> Result<Stay> {
    Ok(Stay {
      stay_id:     self.stay_id,
      resident_id: self.resident_id,
      shelter_id:  self.shelter_id,
      entry_date:  decode_date(&self.entry_date)?,
      exit_date:   decode_opt_date(self.exit_date)?,
      slot:        self.slot,
      active:      self.active,
      exit_reason: self.exit_reason,
      notes:       self.notes,
    })
  }
}

/// Raw values read directly from a `care_logs` row.
pub struct RawCareLog {
  pub care_log_id: i64,
  pub resident_id: i64,
  pub staff_id:    i64,
  pub date:        String,
  pub category:    String,
  pub description: String,
  pub notes:       Option<String>,
}

impl RawCareLog {
  pub fn into_care_log(self) -> Result<CareLog> {
    Ok(CareLog {
      care_log_id: self.care_log_id,
      resident_id: self.resident_id,
      staff_id:    self.staff_id,
      date:        decode_date(&self.date)?,
      category:    self.category,
      description: self.description,
      notes:       self.notes,
    })
  }
}

/// Raw values read directly from a `staff_transfers` row.
pub struct RawTransfer {
  pub transfer_id:     i64,
  pub staff_id:        i64,
  pub from_shelter_id: Option<i64>,
  pub to_shelter_id:   Option<i64>,
  pub recorded_at:     String,
}

impl RawTransfer {
  pub fn into_transfer(self) -> Result<StaffTransfer> {
    Ok(StaffTransfer {
      transfer_id:     self.transfer_id,
      staff_id:        self.staff_id,
      from_shelter_id: self.from_shelter_id,
      to_shelter_id:   self.to_shelter_id,
      recorded_at:     decode_dt(&self.recorded_at)?,
    })
  }
}

// `family_contacts` holds no encoded columns; rows map straight to the entity.
pub fn family_contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FamilyContact> {
  Ok(FamilyContact {
    contact_id:   row.get(0)?,
    resident_id:  row.get(1)?,
    name:         row.get(2)?,
    relationship: row.get(3)?,
    phone:        row.get(4)?,
    emergency:    row.get(5)?,
  })
}

#[cfg(test)]
mod tests {
  use refuge_core::tags::{EmploymentStatus, ShelterKind};

  use super::*;

  #[test]
  fn date_round_trips_iso() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(encode_date(d), "2024-03-09");
    assert_eq!(decode_date("2024-03-09").unwrap(), d);
  }

  #[test]
  fn malformed_date_is_reported() {
    assert!(matches!(decode_date("09/03/2024"), Err(Error::DateParse(_))));
  }

  #[test]
  fn decimal_is_stored_canonically() {
    let salary = Decimal::from_str("2500.50").unwrap();
    assert_eq!(encode_decimal(salary), "2500.5");
    assert_eq!(decode_decimal("2500.5").unwrap(), salary);
  }

  #[test]
  fn tags_decode_from_screaming_snake_case() {
    let kind: ShelterKind = decode_tag("shelters.kind", "FEMALE_ONLY").unwrap();
    assert_eq!(kind, ShelterKind::FemaleOnly);
    let status: EmploymentStatus = decode_tag("staff.status", "ON_LEAVE").unwrap();
    assert_eq!(status, EmploymentStatus::OnLeave);
  }

  #[test]
  fn unknown_tag_names_the_column() {
    let err = decode_tag::<ShelterKind>("shelters.kind", "CASTLE").unwrap_err();
    assert!(matches!(err, Error::UnknownTag { column: "shelters.kind", .. }));
  }
}
