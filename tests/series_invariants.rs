use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use dayplan::models::{at_noon, Repeat, SeriesRole, Task, TaskUpdate};
use dayplan::recurrence::apply_update;
use dayplan::tasks::{self, Frequency};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use uuid::Uuid;

fn base() -> NaiveDate {
    // Friday
    NaiveDate::from_ymd_opt(2024, 1, 26).unwrap()
}

fn offset(days: u64) -> NaiveDate {
    base() + Days::new(days)
}

#[derive(Debug, Clone)]
enum Op {
    Edit {
        target: usize,
        repeat: Option<Repeat>,
        until: Option<Option<u64>>,
        rename: bool,
    },
    Fill {
        target: usize,
        from: u64,
        len: u64,
        weekdays: bool,
    },
    Move {
        target: usize,
        to: u64,
    },
    Duplicate {
        target: usize,
    },
    Delete {
        target: usize,
    },
    Toggle {
        target: usize,
    },
}

fn any_repeat() -> impl Strategy<Value = Option<Repeat>> {
    prop_oneof![
        Just(None),
        Just(Some(Repeat::None)),
        Just(Some(Repeat::Daily)),
        Just(Some(Repeat::Weekdays)),
        Just(Some(Repeat::Monthly)),
    ]
}

fn any_until() -> impl Strategy<Value = Option<Option<u64>>> {
    prop_oneof![Just(None), Just(Some(None)), (0u64..20).prop_map(|d| Some(Some(d)))]
}

fn any_op() -> impl Strategy<Value = Op> {
    let target = 0usize..64;
    prop_oneof![
        4 => (target.clone(), any_repeat(), any_until(), any::<bool>())
            .prop_map(|(target, repeat, until, rename)| Op::Edit { target, repeat, until, rename }),
        1 => (target.clone(), 0u64..20, 0u64..5, any::<bool>())
            .prop_map(|(target, from, len, weekdays)| Op::Fill { target, from, len, weekdays }),
        1 => (target.clone(), 0u64..20).prop_map(|(target, to)| Op::Move { target, to }),
        1 => target.clone().prop_map(|target| Op::Duplicate { target }),
        1 => target.clone().prop_map(|target| Op::Delete { target }),
        1 => target.prop_map(|target| Op::Toggle { target }),
    ]
}

fn pick(tasks: &[Task], target: usize) -> Option<Uuid> {
    if tasks.is_empty() {
        None
    } else {
        Some(tasks[target % tasks.len()].id)
    }
}

fn run(mut tasks: Vec<Task>, op: &Op) -> Vec<Task> {
    match *op {
        Op::Edit { target, repeat, until, rename } => {
            let Some(id) = pick(&tasks, target) else { return tasks };
            let update = TaskUpdate {
                content: rename.then(|| "Renamed".to_string()),
                repeat,
                repeat_until: until.map(|u| u.map(offset)),
                ..TaskUpdate::default()
            };
            apply_update(tasks, id, &update).unwrap()
        }
        Op::Fill { target, from, len, weekdays } => {
            if let Some(id) = pick(&tasks, target) {
                let frequency = if weekdays { Frequency::Weekdays } else { Frequency::Daily };
                tasks::fill_period(&mut tasks, id, offset(from), offset(from + len), frequency).unwrap();
            }
            tasks
        }
        Op::Move { target, to } => {
            if let Some(id) = pick(&tasks, target) {
                tasks::move_task(&mut tasks, id, at_noon(offset(to))).unwrap();
            }
            tasks
        }
        Op::Duplicate { target } => {
            if let Some(id) = pick(&tasks, target) {
                tasks::duplicate_task(&mut tasks, id, "alice", at_noon(base())).unwrap();
            }
            tasks
        }
        Op::Delete { target } => {
            if let Some(id) = pick(&tasks, target) {
                tasks::delete_task(&mut tasks, id).unwrap();
            }
            tasks
        }
        Op::Toggle { target } => {
            if let Some(id) = pick(&tasks, target) {
                tasks::toggle_task(&mut tasks, id).unwrap();
            }
            tasks
        }
    }
}

fn check_invariants(tasks: &[Task]) -> Result<(), TestCaseError> {
    let mut templates: HashMap<Uuid, usize> = HashMap::new();
    for t in tasks {
        if t.repeat == Repeat::None {
            prop_assert_eq!(t.series_id, None, "single task {} kept a series id", t.id);
            prop_assert_eq!(t.repeat_until, None, "single task {} kept an end date", t.id);
        }
        prop_assert_eq!(t.series_id.is_some(), t.series_role.is_some());
        if let Some(series) = t.series_id {
            let count = templates.entry(series).or_default();
            if t.series_role == Some(SeriesRole::Template) {
                *count += 1;
            }
        }
    }
    for (series, count) in templates {
        prop_assert_eq!(count, 1, "series {} has {} templates", series, count);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_mutation_keeps_series_consistent(ops in prop::collection::vec(any_op(), 1..16)) {
        let mut tasks = vec![
            Task::new("Standup", "alice", at_noon(base())),
            Task::new("Invoice", "alice", at_noon(offset(3))),
        ];
        for op in &ops {
            tasks = run(tasks, op);
            check_invariants(&tasks)?;
        }
    }
}

#[test]
fn mixed_sequence_keeps_one_template() {
    let ops = [
        Op::Edit { target: 0, repeat: Some(Repeat::Daily), until: Some(Some(4)), rename: false },
        Op::Fill { target: 0, from: 10, len: 2, weekdays: false },
        Op::Edit { target: 2, repeat: None, until: Some(Some(6)), rename: true },
        Op::Delete { target: 0 },
        Op::Edit { target: 1, repeat: Some(Repeat::None), until: None, rename: false },
    ];
    let mut tasks = vec![Task::new("Standup", "alice", at_noon(base()))];
    for op in &ops {
        tasks = run(tasks, op);
        check_invariants(&tasks).unwrap();
    }
}
