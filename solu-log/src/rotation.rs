//! Calendar rotation policies and the deadline calculator.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a file sink starts a new file regardless of its size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    None,
    Hourly,
    Daily,
    /// Rotates at midnight starting each Sunday.
    Weekly,
    Monthly,
}

impl fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RotationPolicy::None => "none",
            RotationPolicy::Hourly => "hourly",
            RotationPolicy::Daily => "daily",
            RotationPolicy::Weekly => "weekly",
            RotationPolicy::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

/// Smallest rotation boundary strictly after `now`, in `now`'s time zone.
///
/// Returns `None` for [`RotationPolicy::None`] (never rotate by time) and for
/// boundaries outside chrono's representable range.
pub fn next_deadline<Tz: TimeZone>(now: &DateTime<Tz>, policy: RotationPolicy) -> Option<DateTime<Tz>> {
    let local = now.naive_local();
    let today = local.date();

    let boundary: NaiveDateTime = match policy {
        RotationPolicy::None => return None,
        RotationPolicy::Hourly => return next_hour(now),
        RotationPolicy::Daily => midnight(today.succ_opt()?)?,
        RotationPolicy::Weekly => {
            let days = 7 - u64::from(today.weekday().num_days_from_sunday());
            midnight(today.checked_add_days(Days::new(days))?)?
        }
        RotationPolicy::Monthly => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            midnight(NaiveDate::from_ymd_opt(year, month, 1)?)?
        }
    };

    resolve_local(&now.timezone(), boundary)
}

/// Start of the hour containing `now`, plus one hour of elapsed time. Working
/// on the instant keeps both passes through a repeated hour.
fn next_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let local = now.naive_local();
    let hour_start = local.date().and_hms_opt(local.hour(), 0, 0)?;
    let start = match now.timezone().from_local_datetime(&hour_start) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, latest) => {
            if latest <= *now {
                latest
            } else {
                earliest
            }
        }
        LocalResult::None => return resolve_local(&now.timezone(), hour_start + Duration::hours(1)),
    };
    start.checked_add_signed(Duration::hours(1))
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

/// Map a wall-clock boundary onto the time zone. Ambiguous times take the
/// earlier instant; times inside a DST gap move to the first minute after it.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=24 * 60).find_map(|minutes| {
            tz.from_local_datetime(&(naive + Duration::minutes(minutes)))
                .earliest()
        }),
    }
}
