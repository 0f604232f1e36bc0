//! End-to-end properties of the desk, driven through its public API only.

use chrono::NaiveDate;
use clinic_desk::{
    AgendaQuery, ClinicDesk, ClinicPolicy, CollisionPolicy, DeskError, FixedClock, Removal, SortKey,
};
use proptest::prelude::*;
use rstest::{fixture, rstest};

/// Tuesday 10 March 2026, 10:00 local time
fn desk_with(policy: ClinicPolicy) -> ClinicDesk {
    let now = NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    ClinicDesk::with_clock(policy, FixedClock::at(now).unwrap().shared())
}

#[fixture]
fn desk() -> ClinicDesk {
    let mut desk = desk_with(ClinicPolicy::default());
    desk.register_patient("11111111111", "Alice Neves", "01/01/1990").unwrap();
    desk.register_patient("22222222222", "Bruno Reis", "15/06/1985").unwrap();
    desk
}

fn punctuate(digits: &str) -> String {
    format!("{}.{}.{}-{}", &digits[0..3], &digits[3..6], &digits[6..9], &digits[9..11])
}

// ============================================================================
// REGISTRATION
// ============================================================================

proptest! {
    #[test]
    fn test_register_then_find_punctuates(digits in "[0-9]{11}") {
        let mut desk = desk_with(ClinicPolicy::default());
        let patient = desk.register_patient(&digits, "Maria Silva", "01/01/1990").unwrap();

        prop_assert_eq!(&patient.id, &punctuate(&digits));
        prop_assert_eq!(desk.find_patient(&digits), Some(&patient));
    }
}

#[rstest]
fn test_duplicate_registration(mut desk: ClinicDesk) {
    let err = desk.register_patient("111.111.111-11", "Another Name", "01/01/1990").unwrap_err();

    assert_eq!(err, DeskError::DuplicateIdentifier("111.111.111-11".to_string()));
    assert_eq!(desk.patients().count(), 2);
}

#[rstest]
#[case::one_day_short("11/03/2013", false)]
#[case::exactly_thirteen("10/03/2013", true)]
fn test_age_boundary(#[case] birth: &str, #[case] accepted: bool) {
    let mut desk = desk_with(ClinicPolicy::default());
    let result = desk.register_patient("33333333333", "Carla Dias", birth);

    if accepted {
        assert!(result.is_ok());
    } else {
        assert_eq!(result.unwrap_err(), DeskError::UnderageWithoutGuardian { minimum_age: 13 });
    }
}

// ============================================================================
// BOOKING
// ============================================================================

#[rstest]
#[case::before_opening("0700", "0730", Err(DeskError::OutsideBusinessHours))]
#[case::off_grid("0810", "0825", Err(DeskError::InvalidTimeGranularity { granularity: 15 }))]
#[case::first_slot("0800", "0830", Ok(30))]
fn test_booking_window(
    mut desk: ClinicDesk,
    #[case] start: &str,
    #[case] end: &str,
    #[case] expected: Result<i64, DeskError>,
) {
    let result = desk
        .book_appointment("11111111111", "12/03/2026", start, end)
        .map(|c| c.duration_minutes);

    assert_eq!(result, expected);
}

#[rstest]
fn test_second_future_booking_rejected(mut desk: ClinicDesk) {
    desk.book_appointment("11111111111", "12/03/2026", "0800", "0830").unwrap();
    let err = desk.book_appointment("11111111111", "13/03/2026", "0900", "0930").unwrap_err();

    assert_eq!(err, DeskError::DuplicateFutureBooking);
    assert_eq!(desk.appointments().count(), 1);
}

#[rstest]
fn test_same_start_collides_exact_policy(mut desk: ClinicDesk) {
    desk.book_appointment("11111111111", "12/03/2026", "0800", "0900").unwrap();

    let err = desk.book_appointment("22222222222", "12/03/2026", "0800", "0830").unwrap_err();
    assert_eq!(err, DeskError::SlotAlreadyBooked);

    // Exact-start comparison lets a slot begin inside another one
    assert!(desk.book_appointment("22222222222", "12/03/2026", "0815", "0830").is_ok());
}

#[test]
fn test_overlap_policy_rejects_nested_slot() {
    let policy = ClinicPolicy {
        collision: CollisionPolicy::IntervalOverlap,
        ..ClinicPolicy::default()
    };
    let mut desk = desk_with(policy);
    desk.register_patient("11111111111", "Alice Neves", "01/01/1990").unwrap();
    desk.register_patient("22222222222", "Bruno Reis", "15/06/1985").unwrap();
    desk.book_appointment("11111111111", "12/03/2026", "0800", "0900").unwrap();

    let err = desk.book_appointment("22222222222", "12/03/2026", "0815", "0830").unwrap_err();
    assert_eq!(err, DeskError::SlotAlreadyBooked);
    assert!(desk.book_appointment("22222222222", "12/03/2026", "0900", "0930").is_ok());
}

// ============================================================================
// REMOVAL
// ============================================================================

#[rstest]
fn test_removal_blocked_until_cancelled(mut desk: ClinicDesk) {
    desk.book_appointment("11111111111", "12/03/2026", "0800", "0830").unwrap();

    match desk.remove_patient("11111111111").unwrap() {
        Removal::Blocked { pending } => assert_eq!(pending.patient_id, "111.111.111-11"),
        other => panic!("expected a blocked removal, got {other:?}"),
    }
    assert!(desk.find_patient("11111111111").is_some());

    assert!(desk.cancel_appointment("11111111111"));
    assert!(desk.remove_patient("11111111111").unwrap().is_removed());

    assert!(desk.find_patient("11111111111").is_none());
    assert!(desk
        .list_patients(SortKey::Name)
        .iter()
        .all(|p| p.id != "111.111.111-11"));
}

#[rstest]
fn test_remove_unknown_patient(mut desk: ClinicDesk) {
    assert_eq!(desk.remove_patient("99999999999").unwrap_err(), DeskError::PatientNotFound);
    assert_eq!(desk.remove_patient("999").unwrap_err(), DeskError::InvalidIdentifierFormat);
}

// ============================================================================
// AGENDA LISTING
// ============================================================================

#[rstest]
fn test_agenda_listings(mut desk: ClinicDesk) {
    desk.register_patient("33333333333", "Carla Dias", "02/02/1970").unwrap();
    desk.book_appointment("22222222222", "25/03/2026", "0900", "0930").unwrap();
    desk.book_appointment("11111111111", "12/03/2026", "1400", "1430").unwrap();
    desk.book_appointment("33333333333", "12/03/2026", "0800", "0830").unwrap();

    let all = desk.list_appointments(&AgendaQuery::All).unwrap();
    let order: Vec<_> = all.iter().map(|a| a.patient_id.as_str()).collect();
    assert_eq!(order, ["333.333.333-33", "111.111.111-11", "222.222.222-22"]);

    let range = desk
        .list_appointments(&AgendaQuery::DateRange {
            from: "12/03/2026".to_string(),
            to: "12/03/2026".to_string(),
        })
        .unwrap();
    assert_eq!(range.len(), 2);
    assert!(range.iter().all(|a| a.date == NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()));

    let inverted = desk
        .list_appointments(&AgendaQuery::DateRange {
            from: "31/03/2026".to_string(),
            to: "01/03/2026".to_string(),
        })
        .unwrap();
    assert!(inverted.is_empty());
}
