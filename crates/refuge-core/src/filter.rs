//! Structured filters for the listing operations.
//!
//! Every field is optional; an unset field places no constraint on that
//! dimension. Where an entity can be inactive, listings are active-only
//! unless `include_inactive` is set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  entity::{CareLog, ResidentProfile, Shelter, StaffProfile, Stay},
  tags::{EmploymentStatus, ResidencyStatus, ShelterKind, Shift},
};

fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
  from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelterFilter {
  /// Case-insensitive substring of the shelter name.
  pub name:             Option<String>,
  pub kind:             Option<ShelterKind>,
  pub city:             Option<String>,
  pub include_inactive: bool,
}

impl ShelterFilter {
  pub fn matches(&self, shelter: &Shelter) -> bool {
    (self.include_inactive || shelter.active)
      && self.name.as_deref().is_none_or(|n| contains_ci(&shelter.name, n))
      && self.kind.is_none_or(|k| shelter.kind == k)
      && self
        .city
        .as_deref()
        .is_none_or(|c| shelter.address.city.eq_ignore_ascii_case(c))
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffFilter {
  pub name:             Option<String>,
  pub job_title:        Option<String>,
  pub shift:            Option<Shift>,
  pub status:           Option<EmploymentStatus>,
  pub shelter_id:       Option<i64>,
  /// Also return staff that are not employed-and-active.
  pub include_inactive: bool,
}

impl StaffFilter {
  pub fn matches(&self, profile: &StaffProfile) -> bool {
    let staff = &profile.staff;
    (self.include_inactive || profile.is_active())
      && self.name.as_deref().is_none_or(|n| contains_ci(&profile.person.name, n))
      && self.job_title.as_deref().is_none_or(|t| contains_ci(&staff.job_title, t))
      && self.shift.is_none_or(|s| staff.shift == s)
      && self.status.is_none_or(|s| staff.status == s)
      && self.shelter_id.is_none_or(|id| staff.shelter_id == Some(id))
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentFilter {
  pub name:             Option<String>,
  /// Exact record number.
  pub record_number:    Option<String>,
  pub status:           Option<ResidencyStatus>,
  pub entered_from:     Option<NaiveDate>,
  pub entered_to:       Option<NaiveDate>,
  pub include_inactive: bool,
}

impl ResidentFilter {
  pub fn matches(&self, profile: &ResidentProfile) -> bool {
    let resident = &profile.resident;
    (self.include_inactive || profile.is_active())
      && self.name.as_deref().is_none_or(|n| contains_ci(&profile.person.name, n))
      && self
        .record_number
        .as_deref()
        .is_none_or(|r| resident.record_number == r)
      && self.status.is_none_or(|s| resident.status == s)
      && within(resident.entry_date, self.entered_from, self.entered_to)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StayFilter {
  pub shelter_id:   Option<i64>,
  pub resident_id:  Option<i64>,
  /// `Some(true)` for open stays, `Some(false)` for discharged ones.
  /// Overrides `include_inactive` when set.
  pub active:           Option<bool>,
  pub entered_from:     Option<NaiveDate>,
  pub entered_to:       Option<NaiveDate>,
  /// Discharged stays are left out unless this is set.
  pub include_inactive: bool,
}

impl StayFilter {
  pub fn matches(&self, stay: &Stay) -> bool {
    self.shelter_id.is_none_or(|id| stay.shelter_id == id)
      && self.resident_id.is_none_or(|id| stay.resident_id == id)
      && self.active.map_or(self.include_inactive || stay.active, |a| stay.active == a)
      && within(stay.entry_date, self.entered_from, self.entered_to)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareLogFilter {
  pub resident_id: Option<i64>,
  pub staff_id:    Option<i64>,
  pub category:    Option<String>,
  pub from:        Option<NaiveDate>,
  pub to:          Option<NaiveDate>,
  pub limit:       Option<usize>,
}

impl CareLogFilter {
  /// Per-row predicate; `limit` is applied by the caller.
  pub fn matches(&self, log: &CareLog) -> bool {
    self.resident_id.is_none_or(|id| log.resident_id == id)
      && self.staff_id.is_none_or(|id| log.staff_id == id)
      && self
        .category
        .as_deref()
        .is_none_or(|c| log.category.eq_ignore_ascii_case(c))
      && within(log.date, self.from, self.to)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn stay(shelter_id: i64, active: bool, entry: NaiveDate) -> Stay {
    Stay {
      stay_id: 1,
      resident_id: 7,
      shelter_id,
      entry_date: entry,
      exit_date: None,
      slot: None,
      active,
      exit_reason: None,
      notes: None,
    }
  }

  #[test]
  fn empty_stay_filter_matches_open_stays_only() {
    let f = StayFilter::default();
    assert!(f.matches(&stay(1, true, date(2024, 1, 1))));
    assert!(!f.matches(&stay(2, false, date(2020, 6, 1))));
  }

  #[test]
  fn stay_filter_can_include_discharged() {
    let all = StayFilter { include_inactive: true, ..Default::default() };
    assert!(all.matches(&stay(1, true, date(2024, 1, 1))));
    assert!(all.matches(&stay(2, false, date(2020, 6, 1))));

    let discharged = StayFilter { active: Some(false), ..Default::default() };
    assert!(discharged.matches(&stay(2, false, date(2020, 6, 1))));
    assert!(!discharged.matches(&stay(1, true, date(2024, 1, 1))));
  }

  #[test]
  fn stay_filter_date_range_is_inclusive() {
    let f = StayFilter {
      entered_from: Some(date(2024, 1, 1)),
      entered_to: Some(date(2024, 1, 31)),
      ..Default::default()
    };
    assert!(f.matches(&stay(1, true, date(2024, 1, 1))));
    assert!(f.matches(&stay(1, true, date(2024, 1, 31))));
    assert!(!f.matches(&stay(1, true, date(2024, 2, 1))));
  }

  #[test]
  fn stay_filter_combines_dimensions() {
    let f = StayFilter { shelter_id: Some(1), active: Some(true), ..Default::default() };
    assert!(f.matches(&stay(1, true, date(2024, 1, 1))));
    assert!(!f.matches(&stay(1, false, date(2024, 1, 1))));
    assert!(!f.matches(&stay(2, true, date(2024, 1, 1))));
  }
}
