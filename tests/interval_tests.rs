use calgrid_rs::core::{DisplayInterval, FirstDayOfWeek, IntervalChange, IntervalQuery, IntervalUnit};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, min, 0)
        .expect("valid time")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_time(NaiveTime::MIN)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

#[test]
fn single_day_scenario() {
    // 2024-03-15 is a Friday.
    let query = IntervalQuery::for_reference_date(at(2024, 3, 15, 14, 30), IntervalUnit::Day, 1);
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 15));
    assert_eq!(interval.end, day(2024, 3, 16));
}

#[test]
fn week_interval_floors_to_first_day_of_week() {
    let mut query =
        IntervalQuery::for_reference_date(at(2024, 3, 15, 9, 0), IntervalUnit::Week, 1);
    query.first_day_of_week = FirstDayOfWeek::Fixed(Weekday::Mon);

    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 11));
    assert_eq!(interval.end, day(2024, 3, 18));
    assert_eq!(interval.duration_days(), 7);
}

#[test]
fn month_interval_anchors_on_day_one() {
    let query = IntervalQuery::for_reference_date(at(2024, 3, 15, 0, 0), IntervalUnit::Month, 2);
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 1));
    assert_eq!(interval.end, day(2024, 5, 1));
}

#[test]
fn non_positive_steps_fall_back_to_one() {
    let query = IntervalQuery {
        steps: -4,
        ..IntervalQuery::for_reference_date(day(2024, 3, 15), IntervalUnit::Day, 1)
    };
    let interval = query.resolve_at(today());
    assert_eq!(interval.duration_days(), 1);
}

#[test]
fn min_bound_replaces_with_anchored_interval() {
    let mut query =
        IntervalQuery::for_reference_date(day(2024, 1, 1), IntervalUnit::Week, 1);
    query.first_day_of_week = FirstDayOfWeek::Fixed(Weekday::Mon);
    query.min_date = Some(day(2024, 3, 13));

    let interval = query.resolve_at(today());
    // The interval containing the minimum date wins.
    assert_eq!(interval.start, day(2024, 3, 11));
    assert_eq!(interval.end, day(2024, 3, 18));
}

#[test]
fn max_bound_replaces_with_anchored_interval() {
    let query = IntervalQuery {
        max_date: Some(day(2024, 2, 10)),
        ..IntervalQuery::for_reference_date(day(2024, 6, 1), IntervalUnit::Month, 1)
    };
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 2, 1));
    assert_eq!(interval.end, day(2024, 3, 1));
}

#[test]
fn clamped_interval_is_never_inverted() {
    let units = [IntervalUnit::Day, IntervalUnit::Week, IntervalUnit::Month];
    for unit in units {
        for steps in [1, 3, 12] {
            for reference_month in 1..=12 {
                let query = IntervalQuery {
                    min_date: Some(day(2024, 3, 4)),
                    max_date: Some(day(2024, 5, 20)),
                    ..IntervalQuery::for_reference_date(
                        day(2024, reference_month, 15),
                        unit,
                        steps,
                    )
                };
                let interval = query.resolve_at(today());
                assert!(
                    interval.start <= interval.end,
                    "inverted interval for unit {unit:?} steps {steps} month {reference_month}"
                );
            }
        }
    }
}

#[test]
fn range_mode_includes_end_date() {
    let query = IntervalQuery::for_range(day(2024, 3, 10), day(2024, 3, 13));
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 10));
    assert_eq!(interval.end, day(2024, 3, 14));
}

#[test]
fn inverted_range_collapses_to_one_day_window() {
    let query = IntervalQuery::for_range(day(2024, 3, 13), day(2024, 3, 10));
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 13));
    assert_eq!(interval.end, day(2024, 3, 15));
}

#[test]
fn range_clamp_preserves_duration_by_shifting() {
    let query = IntervalQuery {
        min_date: Some(day(2024, 3, 12)),
        ..IntervalQuery::for_range(day(2024, 3, 10), day(2024, 3, 13))
    };
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 12));
    assert_eq!(interval.end, day(2024, 3, 16));
    assert_eq!(interval.duration_days(), 4);
}

#[test]
fn impossible_range_clamp_collapses_to_bounds() {
    let query = IntervalQuery {
        min_date: Some(day(2024, 3, 12)),
        max_date: Some(day(2024, 3, 14)),
        ..IntervalQuery::for_range(day(2024, 3, 1), day(2024, 3, 25))
    };
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 12));
    assert_eq!(interval.end, day(2024, 3, 14));
}

#[test]
fn missing_range_endpoints_default_to_today() {
    let query = IntervalQuery::default();
    let interval = query.resolve_at(today());
    assert_eq!(interval.start, day(2024, 3, 15));
    assert_eq!(interval.end, day(2024, 3, 16));
}

#[test]
fn unchanged_window_is_suppressed() {
    let mut query =
        IntervalQuery::for_reference_date(at(2024, 3, 13, 0, 0), IntervalUnit::Week, 1);
    query.first_day_of_week = FirstDayOfWeek::Fixed(Weekday::Mon);
    let first = query.resolve_at(today());

    // Moving the reference within the same week does not move the window.
    query.reference_date = Some(at(2024, 3, 15, 18, 45));
    assert_eq!(
        query.resolve_change(Some(&first), today()),
        IntervalChange::Unchanged
    );

    // Moving it to the next week does.
    query.reference_date = Some(at(2024, 3, 19, 8, 0));
    match query.resolve_change(Some(&first), today()) {
        IntervalChange::Changed { old, new } => {
            assert_eq!(old, Some(first));
            assert_eq!(new.start, day(2024, 3, 18));
        }
        IntervalChange::Unchanged => panic!("expected a changed interval"),
    }
}

#[test]
fn resolve_is_idempotent_through_its_own_output() {
    let query = IntervalQuery {
        first_day_of_week: FirstDayOfWeek::Fixed(Weekday::Mon),
        ..IntervalQuery::for_reference_date(at(2024, 3, 15, 11, 11), IntervalUnit::Week, 3)
    };
    let first = query.resolve_at(today());
    let fed_back = IntervalQuery {
        reference_date: Some(first.start),
        ..query
    }
    .resolve_at(today());
    assert_eq!(first, fed_back);
}

#[test]
fn display_interval_is_a_plain_value() {
    let interval = DisplayInterval::new(day(2024, 3, 11), day(2024, 3, 18));
    let copy = interval;
    assert_eq!(interval, copy);
    assert_eq!(interval.duration_days(), 7);
}
