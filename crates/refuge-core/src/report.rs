//! Derived values computed from stored entities.
//!
//! Nothing here touches storage or enforces invariants; these are pure
//! functions over data a backend has already loaded.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  entity::{ResidentProfile, Shelter, StaffProfile},
  tags::Shift,
};

/// Percentage of beds taken. Zero when `capacity` is zero.
pub fn occupancy_rate(occupied: u32, capacity: u32) -> f64 {
  if capacity == 0 {
    return 0.0;
  }
  f64::from(occupied) / f64::from(capacity) * 100.0
}

/// Whole days from `entry` until `exit`, or until `as_of` while still open.
/// Never negative.
pub fn tenure_days(entry: NaiveDate, exit: Option<NaiveDate>, as_of: NaiveDate) -> i64 {
  let end = exit.unwrap_or(as_of);
  (end - entry).num_days().max(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterOccupancy {
  pub shelter_id:       i64,
  pub name:             String,
  pub capacity:         u32,
  /// Active stays.
  pub occupied:         u32,
  pub available:        u32,
  /// `occupied / capacity * 100`.
  pub rate:             f64,
  /// Every stay ever recorded at this shelter, open or closed.
  pub total_admissions: u32,
}

impl ShelterOccupancy {
  pub fn new(shelter: &Shelter, occupied: u32, total_admissions: u32) -> Self {
    Self {
      shelter_id: shelter.shelter_id,
      name: shelter.name.clone(),
      capacity: shelter.capacity,
      occupied,
      available: shelter.capacity.saturating_sub(occupied),
      rate: occupancy_rate(occupied, shelter.capacity),
      total_admissions,
    }
  }
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatistics {
  pub active_shelters:  u32,
  pub active_staff:     u32,
  pub active_residents: u32,
  pub active_stays:     u32,
  pub care_logs:        u32,
}

/// Count active staff per shift. Every shift appears, with zero if empty.
pub fn count_by_shift<'a>(
  staff: impl IntoIterator<Item = &'a StaffProfile>,
) -> BTreeMap<Shift, u32> {
  let mut counts: BTreeMap<Shift, u32> = Shift::ALL.iter().map(|&s| (s, 0)).collect();
  for profile in staff.into_iter().filter(|p| p.is_active()) {
    *counts.entry(profile.staff.shift).or_default() += 1;
  }
  counts
}

/// Active residents that hold no active stay.
pub fn awaiting_admission(
  residents: Vec<ResidentProfile>,
  admitted: &HashSet<i64>,
) -> Vec<ResidentProfile> {
  residents
    .into_iter()
    .filter(|p| p.is_active() && !admitted.contains(&p.resident.resident_id))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn rate_guards_zero_capacity() {
    assert_eq!(occupancy_rate(0, 0), 0.0);
    assert_eq!(occupancy_rate(3, 0), 0.0);
  }

  #[test]
  fn rate_is_a_percentage() {
    assert_eq!(occupancy_rate(1, 1), 100.0);
    assert_eq!(occupancy_rate(1, 4), 25.0);
    assert_eq!(occupancy_rate(0, 10), 0.0);
  }

  #[test]
  fn tenure_uses_exit_when_present() {
    let entry = date(2024, 1, 1);
    assert_eq!(tenure_days(entry, Some(date(2024, 1, 11)), date(2025, 1, 1)), 10);
    assert_eq!(tenure_days(entry, None, date(2024, 2, 1)), 31);
  }

  #[test]
  fn tenure_never_negative() {
    assert_eq!(tenure_days(date(2024, 5, 1), None, date(2024, 4, 1)), 0);
  }
}
