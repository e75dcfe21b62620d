use chrono::{Datelike, Days, NaiveDate, Weekday};
use dayplan::models::{at_noon, Repeat, Task, TaskUpdate};
use dayplan::recurrence::{apply_update, next_occurrence, regenerate_series};
use proptest::prelude::*;
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    // 1970-01-01 .. 2100-01-01
    (0u64..47_482).prop_map(|n| day(1970, 1, 1) + Days::new(n))
}

fn series_template(start: NaiveDate, repeat: Repeat, until: Option<NaiveDate>) -> Task {
    let mut t = Task::new("Review", "alice", at_noon(start));
    t.repeat = repeat;
    t.repeat_until = until;
    t.series_id = Some(Uuid::new_v4());
    t
}

proptest! {
    #[test]
    fn daily_is_next_day(d in any_date()) {
        prop_assert_eq!(next_occurrence(d, Repeat::Daily), d.succ_opt());
    }

    #[test]
    fn weekdays_never_land_on_weekend(d in any_date()) {
        let next = next_occurrence(d, Repeat::Weekdays).unwrap();
        prop_assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
        if d.weekday() == Weekday::Fri {
            prop_assert_eq!(next, d + Days::new(3));
            prop_assert_eq!(next.weekday(), Weekday::Mon);
        } else if d.weekday() != Weekday::Sat {
            prop_assert_eq!(next, d + Days::new(1));
        }
    }

    #[test]
    fn every_rule_strictly_advances(d in any_date(), rule in prop_oneof![
        Just(Repeat::Daily), Just(Repeat::Weekdays), Just(Repeat::Monthly), Just(Repeat::Yearly)
    ]) {
        prop_assert!(next_occurrence(d, rule).unwrap() > d);
    }

    #[test]
    fn monthly_keeps_or_clamps_day(d in any_date()) {
        let next = next_occurrence(d, Repeat::Monthly).unwrap();
        prop_assert!(next.day() <= d.day());
        prop_assert_eq!((next.year() * 12 + next.month() as i32) - (d.year() * 12 + d.month() as i32), 1);
    }

    #[test]
    fn generated_dates_stay_in_bounds(start in any_date(), span in 0u64..120) {
        let until = start + Days::new(span);
        let template = series_template(start, Repeat::Daily, Some(until));
        let out = regenerate_series(vec![template.clone()], template);
        prop_assert_eq!(out.len() as u64, span + 1);
        prop_assert!(out.iter().all(|t| t.date() >= start && t.date() <= until));
    }
}

#[test]
fn saturday_weekdays_goes_to_monday() {
    assert_eq!(next_occurrence(day(2024, 1, 27), Repeat::Weekdays), Some(day(2024, 1, 29)));
}

#[test]
fn daily_boundary_produces_two_occurrences() {
    let template = series_template(day(2024, 1, 26), Repeat::Daily, Some(day(2024, 1, 28)));
    let out = regenerate_series(vec![template.clone()], template.clone());
    let generated: Vec<NaiveDate> = out.iter().filter(|t| t.id != template.id).map(Task::date).collect();
    assert_eq!(generated.len(), 2);
    assert!(generated.contains(&day(2024, 1, 27)));
    assert!(generated.contains(&day(2024, 1, 28)));
    assert!(!generated.contains(&day(2024, 1, 29)));
}

#[test]
fn end_date_before_start_keeps_only_template() {
    let template = series_template(day(2024, 1, 26), Repeat::Weekdays, Some(day(2024, 1, 1)));
    let out = regenerate_series(vec![template.clone()], template.clone());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].series_id, template.series_id);
}

#[test]
fn yearly_series_over_leap_day() {
    let start = day(2024, 2, 29);
    let task = Task::new("Anniversary", "alice", at_noon(start));
    let task_id = task.id;
    let update = TaskUpdate {
        repeat: Some(Repeat::Yearly),
        repeat_until: Some(Some(day(2027, 12, 31))),
        ..TaskUpdate::default()
    };
    let out = apply_update(vec![task], task_id, &update).unwrap();
    let mut dates: Vec<NaiveDate> = out.iter().map(Task::date).collect();
    dates.sort();
    assert_eq!(dates, vec![start, day(2025, 2, 28), day(2026, 2, 28), day(2027, 2, 28)]);
}
