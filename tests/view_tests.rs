use calgrid_rs::api::view::{
    configure_view, go_to_day, next_range, previous_range, select_view,
};
use calgrid_rs::api::{ViewConfiguration, ViewKind};
use calgrid_rs::core::{DisplayInterval, FirstDayOfWeek, IntervalQuery, IntervalUnit};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_time(NaiveTime::MIN)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

#[test]
fn seven_days_still_fit_the_column_view() {
    let week = DisplayInterval::new(day(2024, 3, 11), day(2024, 3, 18));
    assert_eq!(select_view(week), ViewKind::Columns);

    let eight_days = DisplayInterval::new(day(2024, 3, 11), day(2024, 3, 19));
    assert_eq!(select_view(eight_days), ViewKind::Matrix);
}

#[test]
fn column_configuration_carries_day_count() {
    let interval = DisplayInterval::new(day(2024, 3, 13), day(2024, 3, 17));
    match configure_view(interval, FirstDayOfWeek::LocaleDefault) {
        ViewConfiguration::Columns {
            start_date,
            column_count,
        } => {
            assert_eq!(start_date, day(2024, 3, 13).date());
            assert_eq!(column_count, 4);
        }
        ViewConfiguration::Matrix { .. } => panic!("expected column view"),
    }
}

#[test]
fn matrix_configuration_shows_whole_weeks() {
    // A month starting mid-week pads out to full Monday-based weeks.
    let march = DisplayInterval::new(day(2024, 3, 1), day(2024, 4, 1));
    match configure_view(march, FirstDayOfWeek::Fixed(Weekday::Mon)) {
        ViewConfiguration::Matrix {
            start_date,
            column_count,
            row_count,
            ref_interval,
        } => {
            assert_eq!(start_date, day(2024, 2, 26).date());
            assert_eq!(column_count, 7);
            assert_eq!(row_count, 5);
            assert_eq!(ref_interval, Some(march));
        }
        ViewConfiguration::Columns { .. } => panic!("expected matrix view"),
    }
}

#[test]
fn reference_navigation_steps_by_unit() {
    let query = IntervalQuery::for_reference_date(day(2024, 3, 15), IntervalUnit::Week, 2);
    let forward = next_range(&query);
    assert_eq!(forward.reference_date, Some(day(2024, 3, 29)));
    let back = previous_range(&forward);
    assert_eq!(back.reference_date, query.reference_date);
}

#[test]
fn month_navigation_keeps_month_arithmetic() {
    let query = IntervalQuery::for_reference_date(day(2024, 1, 31), IntervalUnit::Month, 1);
    let forward = next_range(&query);
    // Chrono-clamped month addition.
    assert_eq!(forward.reference_date, Some(day(2024, 2, 29)));
}

#[test]
fn range_navigation_slides_past_the_window() {
    let query = IntervalQuery::for_range(day(2024, 3, 10), day(2024, 3, 13));
    let forward = next_range(&query);
    let interval = forward.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 14));
    assert_eq!(interval.duration_days(), 4);
}

#[test]
fn go_to_day_resets_to_single_day_mode() {
    let query = IntervalQuery {
        min_date: Some(day(2024, 1, 1)),
        ..IntervalQuery::for_range(day(2024, 3, 10), day(2024, 3, 13))
    };
    let today_query = go_to_day(&query, today());
    assert_eq!(today_query.reference_date, Some(day(2024, 3, 15)));
    assert_eq!(today_query.start_date, None);
    assert_eq!(today_query.end_date, None);
    assert_eq!(today_query.unit, IntervalUnit::Day);
    assert_eq!(today_query.steps, 1);
    // Bounds survive the reset.
    assert_eq!(today_query.min_date, Some(day(2024, 1, 1)));

    let interval = today_query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 15));
    assert_eq!(interval.end, day(2024, 3, 16));
}
