//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use refuge_core::{
  Error,
  engine::Removal,
  entity::Address,
  filter::{CareLogFilter, ResidentFilter, ShelterFilter, StaffFilter, StayFilter},
  input::{
    Admission, Discharge, FamilyContactPatch, NewCareLog, NewFamilyContact, NewPerson,
    NewResident, NewShelter, NewStaff, PersonPatch, ResidentPatch, ShelterPatch,
  },
  store::ShelterStore,
  tags::{EmploymentStatus, ResidencyStatus, ShelterKind, Shift},
  uow::UniqueKey,
};
use rust_decimal::Decimal;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn address() -> Address {
  Address {
    street:      "Rua Senador Pompeu".into(),
    number:      Some("100".into()),
    district:    "Centro".into(),
    city:        "Fortaleza".into(),
    state:       "CE".into(),
    postal_code: Some("60025-000".into()),
  }
}

fn new_shelter(registration: &str, capacity: u32) -> NewShelter {
  NewShelter {
    tax_registration_id:  registration.into(),
    name:                 format!("Casa {registration}"),
    capacity,
    address:              address(),
    phone:                "85 3333-0000".into(),
    kind:                 ShelterKind::Mixed,
    legal_representative: "Maria Souza".into(),
  }
}

fn new_person(tax_id: &str, name: &str) -> NewPerson {
  NewPerson {
    tax_id:          tax_id.into(),
    name:            name.into(),
    birth_date:      date(1980, 5, 17),
    phone:           "85 99999-0000".into(),
    secondary_phone: None,
    email:           None,
    address:         address(),
  }
}

fn new_resident(tax_id: &str, record: &str) -> NewResident {
  NewResident {
    person:              new_person(tax_id, &format!("Resident {record}")),
    record_number:       record.into(),
    entry_date:          date(2024, 1, 10),
    intake_reason:       "eviction".into(),
    chemical_dependency: false,
    has_disability:      false,
    disability_kind:     None,
  }
}

fn new_staff(tax_id: &str, registration: &str) -> NewStaff {
  NewStaff {
    person:              new_person(tax_id, &format!("Staff {registration}")),
    registration_number: registration.into(),
    job_title:           "Social worker".into(),
    hire_date:           date(2023, 3, 1),
    salary:              Decimal::new(350000, 2),
    shift:               Shift::Morning,
    shelter_id:          None,
  }
}

fn admission(resident_id: i64, shelter_id: i64) -> Admission {
  Admission { resident_id, shelter_id, entry_date: date(2024, 2, 1), slot: None }
}

// ─── Capacity and admission ──────────────────────────────────────────────────

#[tokio::test]
async fn admissions_stop_at_capacity() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 3)).await.unwrap();

  for i in 0..3 {
    let r = s.create_resident(new_resident(&format!("t{i}"), &format!("R{i}"))).await.unwrap();
    s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();
  }

  let extra = s.create_resident(new_resident("t9", "R9")).await.unwrap();
  let err = s.admit(admission(extra.resident.resident_id, shelter.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { capacity: 3, .. }));

  let occ = s.shelter_occupancy(shelter.shelter_id).await.unwrap().unwrap();
  assert_eq!(occ.occupied, 3);
  assert_eq!(occ.available, 0);
}

#[tokio::test]
async fn resident_holds_one_active_stay() {
  let s = store().await;
  let a = s.create_shelter(new_shelter("A", 5)).await.unwrap();
  let b = s.create_shelter(new_shelter("B", 5)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let rid = r.resident.resident_id;

  let first = s.admit(admission(rid, a.shelter_id)).await.unwrap();
  let err = s.admit(admission(rid, b.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyAdmitted { stay_id, .. } if stay_id == first.stay_id));

  // The rejected admission left nothing behind.
  let b_occ = s.shelter_occupancy(b.shelter_id).await.unwrap().unwrap();
  assert_eq!(b_occ.occupied, 0);
  assert_eq!(b_occ.total_admissions, 0);
}

#[tokio::test]
async fn concurrent_admissions_never_overfill() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let mut residents = Vec::new();
  for i in 0..6 {
    let r = s.create_resident(new_resident(&format!("t{i}"), &format!("R{i}"))).await.unwrap();
    residents.push(r.resident.resident_id);
  }

  let tasks: Vec<_> = residents
    .into_iter()
    .map(|rid| {
      let s = s.clone();
      let sid = shelter.shelter_id;
      tokio::spawn(async move { s.admit(admission(rid, sid)).await })
    })
    .collect();

  let mut admitted = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(_) => admitted += 1,
      Err(e) => assert!(matches!(e, Error::CapacityExceeded { .. }), "unexpected {e:?}"),
    }
  }
  assert_eq!(admitted, 2);
  assert_eq!(s.shelter_occupancy(shelter.shelter_id).await.unwrap().unwrap().occupied, 2);
}

#[tokio::test]
async fn schema_guards_hold_without_the_engine() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let roomy = s.create_shelter(new_shelter("B", 5)).await.unwrap();
  let r1 = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let r2 = s.create_resident(new_resident("2", "R2")).await.unwrap();
  s.admit(admission(r1.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let (sid, bid) = (shelter.shelter_id, roomy.shelter_id);
  let (r1id, r2id) = (r1.resident.resident_id, r2.resident.resident_id);
  let (over_capacity, second_open_stay) = s
    .conn
    .call(move |conn| {
      let insert = "INSERT INTO stays (resident_id, shelter_id, entry_date) VALUES (?1, ?2, '2024-02-01')";
      Ok((
        conn.execute(insert, rusqlite::params![r2id, sid]),
        conn.execute(insert, rusqlite::params![r1id, bid]),
      ))
    })
    .await
    .unwrap();
  assert!(over_capacity.unwrap_err().to_string().contains("shelter capacity exceeded"));
  assert!(second_open_stay.unwrap_err().to_string().contains("UNIQUE constraint failed"));

  let staff = s.create_staff(new_staff("9", "M-9")).await.unwrap();
  s.transfer_staff(staff.staff.staff_id, Some(sid)).await.unwrap();
  let deleted = s
    .conn
    .call(|conn| Ok(conn.execute("DELETE FROM staff_transfers", [])))
    .await
    .unwrap();
  assert!(deleted.unwrap_err().to_string().contains("append-only"));
}

#[tokio::test]
async fn admit_unknown_ids_is_not_found() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let err = s.admit(admission(42, shelter.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 42, .. }));

  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let err = s.admit(admission(r.resident.resident_id, 99)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 99, .. }));
}

#[tokio::test]
async fn blank_slot_is_stored_as_none() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();

  let stay = s
    .admit(Admission { slot: Some("  ".into()), ..admission(r.resident.resident_id, shelter.shelter_id) })
    .await
    .unwrap();
  assert_eq!(stay.slot, None);
  assert_eq!(s.get_stay(stay.stay_id).await.unwrap().unwrap().slot, None);
}

#[tokio::test]
async fn admit_into_inactive_shelter_is_rejected() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let r1 = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let r2 = s.create_resident(new_resident("2", "R2")).await.unwrap();
  s.admit(admission(r1.resident.resident_id, shelter.shelter_id)).await.unwrap();
  assert_eq!(s.remove_shelter(shelter.shelter_id, true).await.unwrap(), Removal::Deactivated);

  let err = s.admit(admission(r2.resident.resident_id, shelter.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

// ─── Discharge ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn discharge_is_one_way() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let stay = s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let closed = s
    .discharge(stay.stay_id, Discharge {
      exit_date: Some(date(2024, 3, 1)),
      reason:    Some("housed".into()),
      notes:     None,
    })
    .await
    .unwrap();
  assert!(!closed.active);
  assert_eq!(closed.exit_date, Some(date(2024, 3, 1)));

  let err = s.discharge(stay.stay_id, Discharge::default()).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyDischarged(id) if id == stay.stay_id));

  let stored = s.get_stay(stay.stay_id).await.unwrap().unwrap();
  assert!(!stored.active);
  assert_eq!(stored.exit_reason.as_deref(), Some("housed"));
}

#[tokio::test]
async fn stay_listing_defaults_to_open_stays() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let r1 = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let r2 = s.create_resident(new_resident("2", "R2")).await.unwrap();
  let closed = s.admit(admission(r1.resident.resident_id, shelter.shelter_id)).await.unwrap();
  let open = s.admit(admission(r2.resident.resident_id, shelter.shelter_id)).await.unwrap();
  s.discharge(closed.stay_id, Discharge::default()).await.unwrap();

  let listed = s.list_stays(StayFilter::default()).await.unwrap();
  assert_eq!(listed.iter().map(|y| y.stay_id).collect::<Vec<_>>(), vec![open.stay_id]);

  let all = s
    .list_stays(StayFilter { include_inactive: true, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(all.len(), 2);

  let discharged = s
    .list_stays(StayFilter { active: Some(false), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(discharged.iter().map(|y| y.stay_id).collect::<Vec<_>>(), vec![closed.stay_id]);
}

#[tokio::test]
async fn discharge_before_entry_is_rejected() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let stay = s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let err = s
    .discharge(stay.stay_id, Discharge { exit_date: Some(date(2023, 12, 31)), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert!(s.get_stay(stay.stay_id).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn discharge_defaults_exit_to_today() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let stay = s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let closed = s.discharge(stay.stay_id, Discharge::default()).await.unwrap();
  assert_eq!(closed.exit_date, Some(chrono::Utc::now().date_naive()));
}

// ─── Concrete scenario ───────────────────────────────────────────────────────

#[tokio::test]
async fn single_bed_shelter_scenario() {
  let s = store().await;
  let s1 = s.create_shelter(new_shelter("S1", 1)).await.unwrap();
  let r1 = s.create_resident(new_resident("111", "R1")).await.unwrap();
  let r2 = s.create_resident(new_resident("222", "R2")).await.unwrap();

  let stay = s.admit(admission(r1.resident.resident_id, s1.shelter_id)).await.unwrap();
  let occ = s.shelter_occupancy(s1.shelter_id).await.unwrap().unwrap();
  assert_eq!(occ.rate, 100.0);

  let err = s.admit(admission(r2.resident.resident_id, s1.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { .. }));

  s.discharge(stay.stay_id, Discharge::default()).await.unwrap();
  let occ = s.shelter_occupancy(s1.shelter_id).await.unwrap().unwrap();
  assert_eq!(occ.rate, 0.0);

  s.admit(admission(r2.resident.resident_id, s1.shelter_id)).await.unwrap();
  let occ = s.shelter_occupancy(s1.shelter_id).await.unwrap().unwrap();
  assert_eq!(occ.occupied, 1);
  assert_eq!(occ.total_admissions, 2);
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn tax_id_is_unique_across_roles() {
  let s = store().await;
  s.create_staff(new_staff("123", "M-1")).await.unwrap();

  let err = s.create_resident(new_resident("123", "R1")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { field: "tax id", .. }));

  // Nothing from the failed registration was persisted.
  assert!(s.find_resident_by_record("R1".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn shelter_registration_is_reusable_after_hard_delete() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S1", 4)).await.unwrap();

  let err = s.create_shelter(new_shelter("S1", 2)).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { field: "tax registration id", .. }));

  assert_eq!(s.remove_shelter(shelter.shelter_id, false).await.unwrap(), Removal::Deleted);
  assert!(s.get_shelter(shelter.shelter_id).await.unwrap().is_none());

  let again = s.create_shelter(new_shelter("S1", 2)).await.unwrap();
  assert_eq!(again.capacity, 2);
}

#[tokio::test]
async fn updates_recheck_uniqueness() {
  let s = store().await;
  let a = s.create_staff(new_staff("1", "M-1")).await.unwrap();
  let mut b_input = new_staff("2", "M-2");
  b_input.person.email = Some("b@example.org".into());
  let b = s.create_staff(b_input).await.unwrap();

  let err = s
    .update_person(a.person.person_id, PersonPatch {
      email: Some(Some("b@example.org".into())),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { field: "email", .. }));

  // Re-submitting one's own value is not a conflict.
  let same = s
    .update_person(b.person.person_id, PersonPatch {
      email: Some(Some("b@example.org".into())),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(same.email.as_deref(), Some("b@example.org"));

  // An explicit null clears the nullable column.
  let cleared = s
    .update_person(b.person.person_id, PersonPatch { email: Some(None), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(cleared.email, None);
}

#[tokio::test]
async fn availability_reflects_stored_keys() {
  let s = store().await;
  let r = s.create_resident(new_resident("555", "R-7")).await.unwrap();

  assert!(!s.is_available(UniqueKey::TaxId, "555".into(), None).await.unwrap());
  assert!(s.is_available(UniqueKey::TaxId, "556".into(), None).await.unwrap());
  assert!(
    s.is_available(UniqueKey::RecordNumber, "R-7".into(), Some(r.resident.resident_id))
      .await
      .unwrap()
  );
}

// ─── Deletion safety ─────────────────────────────────────────────────────────

#[tokio::test]
async fn occupied_shelter_is_only_deactivated() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 10)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let stay = s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let err = s.remove_shelter(shelter.shelter_id, false).await.unwrap_err();
  assert!(matches!(err, Error::HasActiveOccupants { occupants: 1, .. }));

  assert_eq!(s.remove_shelter(shelter.shelter_id, true).await.unwrap(), Removal::Deactivated);

  let active = s.list_shelters(ShelterFilter::default()).await.unwrap();
  assert!(active.iter().all(|x| x.shelter_id != shelter.shelter_id));
  let all = s
    .list_shelters(ShelterFilter { include_inactive: true, ..Default::default() })
    .await
    .unwrap();
  assert!(all.iter().any(|x| x.shelter_id == shelter.shelter_id && !x.active));

  let kept = s.get_stay(stay.stay_id).await.unwrap().unwrap();
  assert_eq!(kept.shelter_id, shelter.shelter_id);
  let history = s
    .list_stays(StayFilter {
      shelter_id: Some(shelter.shelter_id),
      include_inactive: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn shelter_with_past_stays_keeps_history() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let stay = s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();
  s.discharge(stay.stay_id, Discharge::default()).await.unwrap();

  assert_eq!(s.remove_shelter(shelter.shelter_id, false).await.unwrap(), Removal::Deactivated);
  assert!(s.get_stay(stay.stay_id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_shelter_detaches_its_staff() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 2)).await.unwrap();
  let mut input = new_staff("1", "M-1");
  input.shelter_id = Some(shelter.shelter_id);
  let staff = s.create_staff(input).await.unwrap();

  assert_eq!(s.remove_shelter(shelter.shelter_id, false).await.unwrap(), Removal::Deleted);
  let after = s.get_staff(staff.staff.staff_id).await.unwrap().unwrap();
  assert_eq!(after.staff.shelter_id, None);
}

#[tokio::test]
async fn capacity_cannot_drop_below_occupancy() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 3)).await.unwrap();
  for i in 0..2 {
    let r = s.create_resident(new_resident(&format!("t{i}"), &format!("R{i}"))).await.unwrap();
    s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();
  }

  let err = s
    .update_shelter(shelter.shelter_id, ShelterPatch { capacity: Some(1), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { .. }));

  let ok = s
    .update_shelter(shelter.shelter_id, ShelterPatch { capacity: Some(2), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(ok.capacity, 2);
  assert_eq!(s.get_shelter(shelter.shelter_id).await.unwrap().unwrap().capacity, 2);
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_with_history_is_deactivated_not_deleted() {
  let s = store().await;
  let staff = s.create_staff(new_staff("1", "M-1")).await.unwrap();
  let r = s.create_resident(new_resident("2", "R1")).await.unwrap();
  s.record_care_log(NewCareLog {
    resident_id: r.resident.resident_id,
    staff_id:    staff.staff.staff_id,
    date:        date(2024, 2, 2),
    category:    "health".into(),
    description: "clinic visit".into(),
    notes:       None,
  })
  .await
  .unwrap();

  let err = s.purge_staff(staff.staff.staff_id).await.unwrap_err();
  assert!(matches!(err, Error::HasHistory { .. }));

  assert_eq!(s.remove_staff(staff.staff.staff_id).await.unwrap(), Removal::Deactivated);
  let after = s.get_staff(staff.staff.staff_id).await.unwrap().unwrap();
  assert_eq!(after.staff.status, EmploymentStatus::Inactive);
  assert!(!after.person.active);
  assert!(s.list_staff(StaffFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn staff_without_history_is_deleted() {
  let s = store().await;
  let staff = s.create_staff(new_staff("1", "M-1")).await.unwrap();

  assert_eq!(s.remove_staff(staff.staff.staff_id).await.unwrap(), Removal::Deleted);
  assert!(s.get_staff(staff.staff.staff_id).await.unwrap().is_none());
  assert!(s.get_person(staff.person.person_id).await.unwrap().is_none());
  // The tax id is free again.
  s.create_staff(new_staff("1", "M-1")).await.unwrap();
}

#[tokio::test]
async fn transfers_are_recorded_in_order() {
  let s = store().await;
  let a = s.create_shelter(new_shelter("A", 2)).await.unwrap();
  let b = s.create_shelter(new_shelter("B", 2)).await.unwrap();
  let staff = s.create_staff(new_staff("1", "M-1")).await.unwrap();
  let id = staff.staff.staff_id;

  s.transfer_staff(id, Some(a.shelter_id)).await.unwrap();
  let second = s.transfer_staff(id, Some(b.shelter_id)).await.unwrap();
  assert_eq!(second.from_shelter_id, Some(a.shelter_id));
  assert_eq!(second.to_shelter_id, Some(b.shelter_id));

  let err = s.transfer_staff(id, Some(b.shelter_id)).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let trail = s.list_transfers(id).await.unwrap();
  assert_eq!(trail.len(), 2);
  assert_eq!(trail[0].from_shelter_id, None);
  assert_eq!(s.get_staff(id).await.unwrap().unwrap().staff.shelter_id, Some(b.shelter_id));

  // A transfer trail is history.
  assert!(matches!(s.purge_staff(id).await.unwrap_err(), Error::HasHistory { .. }));
}

#[tokio::test]
async fn non_positive_salary_is_rejected() {
  let s = store().await;
  let mut input = new_staff("1", "M-1");
  input.salary = Decimal::ZERO;
  let err = s.create_staff(input).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn staff_lookup_by_registration_keeps_salary_exact() {
  let s = store().await;
  s.create_staff(new_staff("1", "M-77")).await.unwrap();
  let found = s.find_staff_by_registration("M-77".into()).await.unwrap().unwrap();
  assert_eq!(found.staff.salary, Decimal::new(350000, 2));
  assert_eq!(found.person.tax_id, "1");
}

// ─── Residents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn resident_with_active_stay_cannot_be_removed() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let err = s.remove_resident(r.resident.resident_id).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyAdmitted { .. }));
}

#[tokio::test]
async fn resident_with_past_stays_is_discharged_on_removal() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 1)).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let rid = r.resident.resident_id;
  let stay = s.admit(admission(rid, shelter.shelter_id)).await.unwrap();
  s.discharge(stay.stay_id, Discharge::default()).await.unwrap();

  assert_eq!(s.remove_resident(rid).await.unwrap(), Removal::Deactivated);
  let after = s.get_resident(rid).await.unwrap().unwrap();
  assert_eq!(after.resident.status, ResidencyStatus::Discharged);
  assert!(after.resident.exit_date.is_some());
  assert!(!after.person.active);
}

#[tokio::test]
async fn fresh_resident_is_purged_with_contacts() {
  let s = store().await;
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let rid = r.resident.resident_id;
  let contact = s
    .add_family_contact(rid, NewFamilyContact {
      name:         "Joana".into(),
      relationship: "sister".into(),
      phone:        "85 98888-0000".into(),
      emergency:    true,
    })
    .await
    .unwrap();

  s.purge_resident(rid).await.unwrap();
  assert!(s.get_resident(rid).await.unwrap().is_none());
  assert!(s.get_family_contact(contact.contact_id).await.unwrap().is_none());
  assert!(s.find_person_by_tax_id("1".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn resident_exit_before_entry_is_rejected() {
  let s = store().await;
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let err = s
    .update_resident(r.resident.resident_id, ResidentPatch {
      exit_date: Some(Some(date(2023, 1, 1))),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn awaiting_admission_excludes_admitted_and_inactive() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 5)).await.unwrap();
  let admitted = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let waiting = s.create_resident(new_resident("2", "R2")).await.unwrap();
  let gone = s.create_resident(new_resident("3", "R3")).await.unwrap();

  s.admit(admission(admitted.resident.resident_id, shelter.shelter_id)).await.unwrap();
  s.update_resident(gone.resident.resident_id, ResidentPatch {
    status: Some(ResidencyStatus::Absconded),
    ..Default::default()
  })
  .await
  .unwrap();

  let list = s.residents_awaiting_admission().await.unwrap();
  let ids: Vec<i64> = list.iter().map(|p| p.resident.resident_id).collect();
  assert_eq!(ids, vec![waiting.resident.resident_id]);
}

#[tokio::test]
async fn list_residents_filters_by_name() {
  let s = store().await;
  s.create_resident(new_resident("1", "A-1")).await.unwrap();
  s.create_resident(new_resident("2", "B-2")).await.unwrap();

  let hits = s
    .list_residents(ResidentFilter { name: Some("resident a".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].resident.record_number, "A-1");
}

// ─── Care logs and contacts ──────────────────────────────────────────────────

#[tokio::test]
async fn care_logs_are_newest_first_and_limited() {
  let s = store().await;
  let staff = s.create_staff(new_staff("1", "M-1")).await.unwrap();
  let r = s.create_resident(new_resident("2", "R1")).await.unwrap();
  for day in [3, 1, 2] {
    s.record_care_log(NewCareLog {
      resident_id: r.resident.resident_id,
      staff_id:    staff.staff.staff_id,
      date:        date(2024, 4, day),
      category:    "meal".into(),
      description: format!("day {day}"),
      notes:       None,
    })
    .await
    .unwrap();
  }

  let logs = s
    .list_care_logs(CareLogFilter {
      resident_id: Some(r.resident.resident_id),
      limit: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  let dates: Vec<NaiveDate> = logs.iter().map(|l| l.date).collect();
  assert_eq!(dates, vec![date(2024, 4, 3), date(2024, 4, 2)]);
}

#[tokio::test]
async fn care_log_for_unknown_staff_is_not_found() {
  let s = store().await;
  let r = s.create_resident(new_resident("2", "R1")).await.unwrap();
  let err = s
    .record_care_log(NewCareLog {
      resident_id: r.resident.resident_id,
      staff_id:    404,
      date:        date(2024, 4, 1),
      category:    "meal".into(),
      description: "lunch".into(),
      notes:       None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 404, .. }));
}

#[tokio::test]
async fn emergency_contacts_come_first() {
  let s = store().await;
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  let rid = r.resident.resident_id;
  let contact = |name: &str, emergency| NewFamilyContact {
    name: name.into(),
    relationship: "cousin".into(),
    phone: "85 90000-0000".into(),
    emergency,
  };
  let plain = s.add_family_contact(rid, contact("Ana", false)).await.unwrap();
  s.add_family_contact(rid, contact("Zeca", true)).await.unwrap();

  let all = s.list_family_contacts(rid, false).await.unwrap();
  assert_eq!(all[0].name, "Zeca");
  assert_eq!(s.list_family_contacts(rid, true).await.unwrap().len(), 1);

  let updated = s
    .update_family_contact(plain.contact_id, FamilyContactPatch {
      emergency: Some(true),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(updated.emergency);
  assert_eq!(s.list_family_contacts(rid, true).await.unwrap().len(), 2);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn statistics_count_active_rows() {
  let s = store().await;
  let shelter = s.create_shelter(new_shelter("S", 4)).await.unwrap();
  s.create_shelter(new_shelter("T", 4)).await.unwrap();
  let mut night = new_staff("10", "M-10");
  night.shift = Shift::Night;
  s.create_staff(night).await.unwrap();
  s.create_staff(new_staff("11", "M-11")).await.unwrap();
  let r = s.create_resident(new_resident("1", "R1")).await.unwrap();
  s.create_resident(new_resident("2", "R2")).await.unwrap();
  s.admit(admission(r.resident.resident_id, shelter.shelter_id)).await.unwrap();

  let stats = s.statistics().await.unwrap();
  assert_eq!(stats.active_shelters, 2);
  assert_eq!(stats.active_staff, 2);
  assert_eq!(stats.active_residents, 2);
  assert_eq!(stats.active_stays, 1);
  assert_eq!(stats.care_logs, 0);

  let shifts = s.staff_count_by_shift().await.unwrap();
  assert_eq!(shifts[&Shift::Night], 1);
  assert_eq!(shifts[&Shift::Morning], 1);
  assert_eq!(shifts[&Shift::Full], 0);

  let overview = s.occupancy_overview().await.unwrap();
  assert_eq!(overview.len(), 2);
  let s_occ = overview.iter().find(|o| o.shelter_id == shelter.shelter_id).unwrap();
  assert_eq!(s_occ.rate, 25.0);
}

#[tokio::test]
async fn occupancy_of_unknown_shelter_is_none() {
  let s = store().await;
  assert!(s.shelter_occupancy(7).await.unwrap().is_none());
}
