// Date utility functions
// Week boundaries, time-step snapping and display-zone conversion

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::error::{PlannerError, PlannerResult};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;
pub const DAYS_IN_WEEK: usize = 7;

/// First day of the week containing `date`, for a week that begins on `first_day`.
pub fn start_of_week(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let current = date.weekday().num_days_from_monday() as i64;
    let first = first_day.num_days_from_monday() as i64;
    let offset = (current - first).rem_euclid(7);
    date - Duration::days(offset)
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following the one containing `date`.
pub fn start_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Round a (possibly fractional) minute count to the nearest multiple of `step`.
pub fn snap_minutes(minutes: f64, step: u32) -> i64 {
    let step = f64::from(step.max(1));
    ((minutes / step).round() * step) as i64
}

/// Round `dt` up to the next multiple of `step` minutes. Values already on a
/// step boundary are returned unchanged.
pub fn round_up_to_step(dt: NaiveDateTime, step: u32) -> NaiveDateTime {
    let midnight = dt.date().and_time(NaiveTime::MIN);
    let step_secs = i64::from(step.max(1)) * 60;
    let secs = (dt - midnight).num_seconds();
    let rounded = (secs + step_secs - 1).div_euclid(step_secs) * step_secs;
    midnight + Duration::seconds(rounded)
}

/// `date` at `minutes` past midnight. 1440 yields midnight of the next day.
pub fn at_minute(date: NaiveDate, minutes: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(minutes)
}

pub fn minutes_of_day(dt: NaiveDateTime) -> i64 {
    (dt - dt.date().and_time(NaiveTime::MIN)).num_minutes()
}

/// Time zone the grid displays in. Timed events are stored with the offset
/// this zone has at their local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Resolve an optional IANA zone name; `None` means the system zone.
    pub fn parse(name: Option<&str>) -> PlannerResult<Self> {
        match name {
            None => Ok(DisplayZone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(DisplayZone::Named)
                .map_err(|e| PlannerError::TimeZone(format!("{}: {}", name, e))),
        }
    }

    /// Attach this zone's offset to a wall-clock time.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times that do not
    /// exist (DST spring-forward) are pushed forward by one hour.
    pub fn attach(&self, naive: NaiveDateTime) -> PlannerResult<DateTime<FixedOffset>> {
        let resolve = |value: NaiveDateTime| match self {
            DisplayZone::Local => Local
                .from_local_datetime(&value)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            DisplayZone::Named(tz) => tz
                .from_local_datetime(&value)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        };

        resolve(naive)
            .or_else(|| resolve(naive + Duration::hours(1)))
            .ok_or_else(|| PlannerError::TimeZone(format!("no local time for {}", naive)))
    }

    /// Wall-clock time of `dt` in this zone.
    pub fn to_naive(&self, dt: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            DisplayZone::Local => dt.with_timezone(&Local).naive_local(),
            DisplayZone::Named(tz) => dt.with_timezone(tz).naive_local(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            DisplayZone::Local => Local::now().naive_local(),
            DisplayZone::Named(tz) => Utc::now().with_timezone(tz).naive_local(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        date(2024, 1, 3).and_hms_opt(h, m, s).unwrap()
    }

    #[test_case(Weekday::Sun, date(2023, 12, 31) ; "sunday start")]
    #[test_case(Weekday::Mon, date(2024, 1, 1) ; "monday start")]
    #[test_case(Weekday::Wed, date(2024, 1, 3) ; "same day")]
    fn test_start_of_week(first_day: Weekday, expected: NaiveDate) {
        // 2024-01-03 is a Wednesday
        assert_eq!(start_of_week(date(2024, 1, 3), first_day), expected);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(start_of_month(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(start_of_next_month(date(2024, 12, 15)), date(2025, 1, 1));
    }

    #[test_case(52.0, 45 ; "rounds down")]
    #[test_case(53.0, 60 ; "rounds up")]
    #[test_case(-4.0, 0 ; "small negative")]
    fn test_snap_minutes(raw: f64, expected: i64) {
        assert_eq!(snap_minutes(raw, 15), expected);
    }

    #[test]
    fn test_round_up_to_step() {
        assert_eq!(round_up_to_step(dt(9, 1, 0), 15), dt(9, 15, 0));
        assert_eq!(round_up_to_step(dt(9, 15, 0), 15), dt(9, 15, 0));
        assert_eq!(round_up_to_step(dt(9, 14, 30), 15), dt(9, 15, 0));
        assert_eq!(
            round_up_to_step(dt(23, 50, 0), 15),
            date(2024, 1, 4).and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_at_minute_wraps_to_next_day() {
        assert_eq!(at_minute(date(2024, 1, 3), 90), dt(1, 30, 0));
        assert_eq!(
            at_minute(date(2024, 1, 3), MINUTES_PER_DAY),
            date(2024, 1, 4).and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(minutes_of_day(dt(14, 45, 0)), 14 * 60 + 45);
    }

    #[test]
    fn test_named_zone_attach_and_back() {
        let zone = DisplayZone::parse(Some("America/New_York")).unwrap();
        let local = dt(10, 0, 0);
        let stamped = zone.attach(local).unwrap();
        assert_eq!(stamped.to_rfc3339(), "2024-01-03T10:00:00-05:00");
        assert_eq!(zone.to_naive(&stamped), local);
    }

    #[test]
    fn test_spring_forward_gap_is_pushed_forward() {
        let zone = DisplayZone::parse(Some("Europe/Berlin")).unwrap();
        let gap = date(2024, 3, 31).and_hms_opt(2, 30, 0).unwrap();
        let stamped = zone.attach(gap).unwrap();
        assert_eq!(stamped.to_rfc3339(), "2024-03-31T03:30:00+02:00");
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        assert!(matches!(
            DisplayZone::parse(Some("Mars/Olympus")),
            Err(PlannerError::TimeZone(_))
        ));
    }
}
