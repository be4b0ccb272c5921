use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Unit used to derive the displayed time interval from a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    #[default]
    Day,
    Week,
    Month,
}

impl IntervalUnit {
    /// Parses a unit name, falling back to `Day` for unrecognized input.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Day,
        }
    }
}

/// First day of week, either an explicit weekday or the locale default.
///
/// The numeric convention is 0 = Sunday .. 6 = Saturday, with -1 selecting
/// the locale default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FirstDayOfWeek {
    #[default]
    LocaleDefault,
    Fixed(Weekday),
}

impl FirstDayOfWeek {
    /// Builds from the widget-level numeric convention.
    ///
    /// Values outside `[-1, 6]` fall back to 0 (Sunday).
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        match index {
            -1 => Self::LocaleDefault,
            1 => Self::Fixed(Weekday::Mon),
            2 => Self::Fixed(Weekday::Tue),
            3 => Self::Fixed(Weekday::Wed),
            4 => Self::Fixed(Weekday::Thu),
            5 => Self::Fixed(Weekday::Fri),
            6 => Self::Fixed(Weekday::Sat),
            _ => Self::Fixed(Weekday::Sun),
        }
    }

    /// Resolves the locale-default sentinel to a concrete weekday.
    ///
    /// Locale lookup is out of scope; the default resolves to Monday
    /// (ISO-8601 convention).
    #[must_use]
    pub fn resolve(self) -> Weekday {
        match self {
            Self::LocaleDefault => Weekday::Mon,
            Self::Fixed(day) => day,
        }
    }
}

/// Floors a date/time to the start of its day.
#[must_use]
pub fn floor_to_day(time: NaiveDateTime) -> NaiveDateTime {
    start_of_day(time.date())
}

/// Floors a date to the beginning of its week for the given first day of week.
#[must_use]
pub fn floor_to_week(date: NaiveDate, first_day: FirstDayOfWeek) -> NaiveDate {
    let first = first_day.resolve();
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - first.num_days_from_monday() as i64)
        % 7;
    date - Days::new(offset as u64)
}

/// Floors a date to the first day of its month.
#[must_use]
pub fn floor_to_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Adds `steps` intervals of `unit` to a date. Negative steps move backwards.
///
/// Out-of-range results saturate on the input date rather than wrapping.
#[must_use]
pub fn add_interval(date: NaiveDate, unit: IntervalUnit, steps: i64) -> NaiveDate {
    let shifted = match unit {
        IntervalUnit::Day => shift_days(date, steps),
        IntervalUnit::Week => shift_days(date, steps * 7),
        IntervalUnit::Month => {
            let months = steps.unsigned_abs().min(u64::from(u32::MAX)) as u32;
            if steps >= 0 {
                date.checked_add_months(Months::new(months))
            } else {
                date.checked_sub_months(Months::new(months))
            }
        }
    };
    shifted.unwrap_or(date)
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Number of whole days from `start` to `end` (negative when `end < start`).
#[must_use]
pub fn day_difference(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Returns the midnight instant of a date.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Whether the instant is exactly at the start of its day.
#[must_use]
pub fn is_start_of_day(time: NaiveDateTime) -> bool {
    time.num_seconds_from_midnight() == 0 && time.nanosecond() == 0
}

/// Whether the date falls on a Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether the date is the current local day.
#[must_use]
pub fn is_today(date: NaiveDate) -> bool {
    date == chrono::Local::now().date_naive()
}
