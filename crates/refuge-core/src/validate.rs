//! Field-level validation shared by create and update paths.

use rust_decimal::Decimal;

use crate::{
  entity::{Address, CareLog, FamilyContact, Person, Resident, Shelter, Staff},
  error::{Error, Result},
};

pub(crate) fn required(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::invalid(format!("{field} must not be blank")));
  }
  Ok(())
}

fn optional_email(email: Option<&str>) -> Result<()> {
  match email {
    Some(e) if !e.contains('@') => Err(Error::invalid(format!("email {e:?} is malformed"))),
    _ => Ok(()),
  }
}

pub(crate) fn address(address: &Address) -> Result<()> {
  required("street", &address.street)?;
  required("district", &address.district)?;
  required("city", &address.city)?;
  let state = address.state.trim();
  if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
    return Err(Error::invalid(format!(
      "state must be a two-letter code, got {:?}",
      address.state
    )));
  }
  Ok(())
}

pub(crate) fn person(person: &Person) -> Result<()> {
  required("tax id", &person.tax_id)?;
  required("name", &person.name)?;
  required("phone", &person.phone)?;
  optional_email(person.email.as_deref())?;
  address(&person.address)
}

pub(crate) fn shelter(shelter: &Shelter) -> Result<()> {
  required("tax registration id", &shelter.tax_registration_id)?;
  required("name", &shelter.name)?;
  required("phone", &shelter.phone)?;
  required("legal representative", &shelter.legal_representative)?;
  if shelter.capacity == 0 {
    return Err(Error::invalid("capacity must be at least 1"));
  }
  address(&shelter.address)
}

pub(crate) fn staff(staff: &Staff) -> Result<()> {
  required("registration number", &staff.registration_number)?;
  required("job title", &staff.job_title)?;
  salary(staff.salary)
}

pub(crate) fn salary(salary: Decimal) -> Result<()> {
  if salary <= Decimal::ZERO {
    return Err(Error::invalid(format!("salary must be positive, got {salary}")));
  }
  Ok(())
}

pub(crate) fn resident(resident: &Resident) -> Result<()> {
  required("record number", &resident.record_number)?;
  required("intake reason", &resident.intake_reason)?;
  if let Some(exit) = resident.exit_date
    && exit < resident.entry_date
  {
    return Err(Error::invalid("exit date precedes entry date"));
  }
  Ok(())
}

pub(crate) fn care_log(log: &CareLog) -> Result<()> {
  required("category", &log.category)?;
  required("description", &log.description)
}

pub(crate) fn family_contact(contact: &FamilyContact) -> Result<()> {
  required("contact name", &contact.name)?;
  required("relationship", &contact.relationship)?;
  required("contact phone", &contact.phone)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn addr(state: &str) -> Address {
    Address {
      street:      "Rua das Flores".into(),
      number:      Some("123".into()),
      district:    "Centro".into(),
      city:        "Fortaleza".into(),
      state:       state.into(),
      postal_code: None,
    }
  }

  #[test]
  fn blank_required_field_is_rejected() {
    assert!(matches!(required("name", "   "), Err(Error::Validation(_))));
    assert!(required("name", "Ana").is_ok());
  }

  #[test]
  fn state_code_must_be_two_letters() {
    assert!(address(&addr("CE")).is_ok());
    assert!(address(&addr("Ceará")).is_err());
    assert!(address(&addr("C1")).is_err());
  }

  #[test]
  fn salary_must_be_positive() {
    assert!(salary(Decimal::new(250000, 2)).is_ok());
    assert!(salary(Decimal::ZERO).is_err());
    assert!(salary(Decimal::new(-1, 0)).is_err());
  }
}
