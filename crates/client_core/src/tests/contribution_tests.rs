use super::*;

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

#[test]
fn counts_multiple_entries_per_day() {
    let calendar = ContributionCalendar::from_dates([d(3, 1), d(3, 1), d(3, 2)]);
    assert_eq!(calendar.count_on(d(3, 1)), 2);
    assert_eq!(calendar.count_on(d(3, 3)), 0);
    assert_eq!(calendar.total(), 3);
    assert_eq!(calendar.active_days(), 2);
}

#[test]
fn timestamps_bucket_by_utc_day() {
    let calendar = ContributionCalendar::from_timestamps([
        "2024-03-01T23:59:00Z".parse().expect("timestamp"),
        "2024-03-02T00:01:00Z".parse().expect("timestamp"),
    ]);
    assert_eq!(calendar.count_on(d(3, 1)), 1);
    assert_eq!(calendar.count_on(d(3, 2)), 1);
}

#[test]
fn current_streak_counts_back_from_today() {
    let calendar = ContributionCalendar::from_dates([d(3, 8), d(3, 9), d(3, 10)]);
    assert_eq!(calendar.current_streak(d(3, 10)), 3);
}

#[test]
fn current_streak_survives_an_idle_today() {
    let calendar = ContributionCalendar::from_dates([d(3, 8), d(3, 9)]);
    assert_eq!(calendar.current_streak(d(3, 10)), 2);
    assert_eq!(calendar.current_streak(d(3, 11)), 0);
}

#[test]
fn longest_streak_spans_month_boundaries() {
    let calendar = ContributionCalendar::from_dates([
        d(1, 5),
        d(2, 28),
        d(2, 29),
        d(3, 1),
        d(3, 2),
        d(3, 10),
    ]);
    assert_eq!(calendar.longest_streak(), 4);
    assert_eq!(ContributionCalendar::default().longest_streak(), 0);
}

#[test]
fn weeks_grid_ends_on_the_week_of_end_date() {
    // 2024-03-13 is a Wednesday; its week starts Sunday 2024-03-10.
    let calendar = ContributionCalendar::from_dates([d(3, 3), d(3, 10), d(3, 13), d(3, 13)]);
    let grid = calendar.weeks(d(3, 13), 2);

    assert_eq!(grid.len(), 2);
    assert_eq!(grid[0], [1, 0, 0, 0, 0, 0, 0]);
    assert_eq!(grid[1], [1, 0, 0, 2, 0, 0, 0]);
    assert!(calendar.weeks(d(3, 13), 0).is_empty());
}

#[test]
fn weeks_beyond_the_calendar_range_yield_no_rows() {
    let calendar = ContributionCalendar::from_dates([d(3, 13)]);
    assert!(calendar.weeks(d(3, 13), usize::MAX).is_empty());
    assert!(calendar.weeks(d(3, 13), 100_000_000).is_empty());
    assert_eq!(calendar.weeks(d(3, 13), 1), vec![[0, 0, 0, 1, 0, 0, 0]]);
}
