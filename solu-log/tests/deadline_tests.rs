use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::{New_York, Santiago};
use pretty_assertions::assert_eq;
use rstest::rstest;
use solu_log::{next_deadline, RotationPolicy};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

#[rstest]
#[case(utc(2024, 5, 1, 10, 0, 0))]
#[case(utc(2024, 5, 1, 10, 0, 1))]
#[case(utc(2024, 5, 1, 10, 30, 0))]
#[case(utc(2024, 5, 1, 10, 59, 59))]
fn test_hourly_ignores_minutes_and_seconds(#[case] now: DateTime<Utc>) {
    assert_eq!(
        next_deadline(&now, RotationPolicy::Hourly),
        Some(utc(2024, 5, 1, 11, 0, 0))
    );
}

#[test]
fn test_hourly_rolls_over_midnight() {
    assert_eq!(
        next_deadline(&utc(2024, 2, 29, 23, 15, 0), RotationPolicy::Hourly),
        Some(utc(2024, 3, 1, 0, 0, 0))
    );
}

#[rstest]
#[case::mid_month(utc(2024, 1, 15, 8, 0, 0), utc(2024, 2, 1, 0, 0, 0))]
#[case::leap_february(utc(2024, 2, 29, 23, 59, 59), utc(2024, 3, 1, 0, 0, 0))]
#[case::thirty_day_month(utc(2024, 4, 30, 12, 0, 0), utc(2024, 5, 1, 0, 0, 0))]
#[case::first_of_month(utc(2024, 6, 1, 0, 0, 0), utc(2024, 7, 1, 0, 0, 0))]
#[case::december(utc(2023, 12, 31, 23, 59, 59), utc(2024, 1, 1, 0, 0, 0))]
fn test_monthly(#[case] now: DateTime<Utc>, #[case] expected: DateTime<Utc>) {
    assert_eq!(next_deadline(&now, RotationPolicy::Monthly), Some(expected));
}

// 2024-05-05 is a Sunday.
#[rstest]
#[case::wednesday(utc(2024, 5, 1, 9, 0, 0), utc(2024, 5, 5, 0, 0, 0))]
#[case::saturday_night(utc(2024, 5, 4, 23, 59, 59), utc(2024, 5, 5, 0, 0, 0))]
#[case::sunday(utc(2024, 5, 5, 0, 0, 0), utc(2024, 5, 12, 0, 0, 0))]
#[case::across_year(utc(2024, 12, 30, 12, 0, 0), utc(2025, 1, 5, 0, 0, 0))]
fn test_weekly(#[case] now: DateTime<Utc>, #[case] expected: DateTime<Utc>) {
    assert_eq!(next_deadline(&now, RotationPolicy::Weekly), Some(expected));
}

// ===== Daylight saving =====

// New York falls back at 2024-11-03 02:00 EDT, repeating 01:00-02:00 local.
#[test]
fn test_hourly_first_pass_of_repeated_hour() {
    let now = New_York.with_ymd_and_hms(2024, 11, 3, 1, 30, 0).earliest().unwrap();
    let next = next_deadline(&now, RotationPolicy::Hourly).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 11, 3, 6, 0, 0));
    assert_eq!((next - now).num_seconds(), 1800);
    assert_eq!(next.format("%H:%M %Z").to_string(), "01:00 EST");
}

#[test]
fn test_hourly_second_pass_of_repeated_hour() {
    let now = New_York.with_ymd_and_hms(2024, 11, 3, 1, 30, 0).latest().unwrap();
    let next = next_deadline(&now, RotationPolicy::Hourly).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 11, 3, 7, 0, 0));
    assert_eq!((next - now).num_seconds(), 1800);
}

#[test]
fn test_hourly_before_repeated_hour() {
    let now = New_York.with_ymd_and_hms(2024, 11, 3, 0, 30, 0).unwrap();
    let next = next_deadline(&now, RotationPolicy::Hourly).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 11, 3, 5, 0, 0));
    assert_eq!(next.format("%H:%M %Z").to_string(), "01:00 EDT");
}

// New York springs forward at 2024-03-10 02:00 EST, skipping 02:00-03:00 local.
#[test]
fn test_hourly_across_skipped_hour() {
    let now = New_York.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap();
    let next = next_deadline(&now, RotationPolicy::Hourly).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 3, 10, 7, 0, 0));
    assert_eq!((next - now).num_seconds(), 1800);
    assert_eq!(next.format("%H:%M %Z").to_string(), "03:00 EDT");
}

// Santiago skips 2024-09-08 00:00-01:00 local, so that midnight never happens.
#[test]
fn test_daily_midnight_inside_gap() {
    let now = Santiago.with_ymd_and_hms(2024, 9, 7, 12, 0, 0).unwrap();
    let next = next_deadline(&now, RotationPolicy::Daily).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 9, 8, 4, 0, 0));
    assert_eq!(next.format("%Y-%m-%d %H:%M").to_string(), "2024-09-08 01:00");
}

// Santiago repeats 2024-04-06 23:00-24:00 local.
#[test]
fn test_daily_from_repeated_hour() {
    let now = Santiago.with_ymd_and_hms(2024, 4, 6, 23, 30, 0).earliest().unwrap();
    let next = next_deadline(&now, RotationPolicy::Daily).unwrap();

    assert_eq!(next.with_timezone(&Utc), utc(2024, 4, 7, 4, 0, 0));
    assert_eq!((next - now).num_seconds(), 5400);
}

#[rstest]
#[case(RotationPolicy::Hourly)]
#[case(RotationPolicy::Daily)]
#[case(RotationPolicy::Weekly)]
#[case(RotationPolicy::Monthly)]
fn test_deadline_is_strictly_after_now(#[case] policy: RotationPolicy) {
    let now = Utc::now();
    assert!(next_deadline(&now, policy).unwrap() > now);
}

#[test]
fn test_policy_deserializes_lowercase() {
    let policy: RotationPolicy = serde_json::from_str("\"weekly\"").unwrap();
    assert_eq!(policy, RotationPolicy::Weekly);
    assert!(serde_json::from_str::<RotationPolicy>("\"Weekly\"").is_err());
}
