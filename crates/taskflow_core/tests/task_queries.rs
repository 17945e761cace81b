use chrono::NaiveDate;
use taskflow_core::query::{filter_tasks, search_tasks, tasks_on};
use taskflow_core::seed::{demo_state, known_users};
use taskflow_core::{CalendarMonth, Category, SearchQuery, Task, TaskFilter};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id.clone()).collect()
}

#[test]
fn tasks_on_matches_calendar_day_only() {
    let state = demo_state(day(2024, 2, 28));

    assert_eq!(ids(&tasks_on(&state.tasks, day(2024, 2, 28))), ["t1", "t2"]);
    assert_eq!(ids(&tasks_on(&state.tasks, day(2024, 2, 29))), ["t3"]);
    assert!(tasks_on(&state.tasks, day(2025, 2, 28)).is_empty());
}

#[test]
fn search_matches_title_or_category_case_insensitively() {
    let state = demo_state(day(2024, 2, 28));

    let by_title = search_tasks(&state.tasks, &SearchQuery::text("  ux   RESEARCH "));
    assert_eq!(ids(&by_title), ["t2"]);

    let by_category = search_tasks(&state.tasks, &SearchQuery::text("design"));
    assert_eq!(ids(&by_category), ["t1"]);

    let everything = search_tasks(&state.tasks, &SearchQuery::default());
    assert_eq!(everything.len(), 3);
}

#[test]
fn search_category_filter_combines_with_text() {
    let state = demo_state(day(2024, 2, 28));
    let query = SearchQuery {
        text: "meeting".to_string(),
        category: Some(Category::Business),
    };
    assert_eq!(ids(&search_tasks(&state.tasks, &query)), ["t3"]);

    let mismatch = SearchQuery {
        text: "meeting".to_string(),
        category: Some(Category::Family),
    };
    assert!(search_tasks(&state.tasks, &mismatch).is_empty());
}

#[test]
fn list_filters_use_assignees_and_completion() {
    let mut state = demo_state(day(2024, 2, 28));
    state.tasks[1].completed = true;
    let all = state.tasks.iter().collect::<Vec<_>>();
    let owner = &known_users()[0];

    assert_eq!(filter_tasks(&all, TaskFilter::All, &owner.id).len(), 3);
    assert_eq!(ids(&filter_tasks(&all, TaskFilter::Mine, &owner.id)), ["t1", "t2"]);
    assert_eq!(ids(&filter_tasks(&all, TaskFilter::Mine, "u3")), ["t3"]);
    assert_eq!(ids(&filter_tasks(&all, TaskFilter::InProgress, &owner.id)), ["t1", "t3"]);
    assert_eq!(ids(&filter_tasks(&all, TaskFilter::Completed, &owner.id)), ["t2"]);
}

#[test]
fn month_agenda_groups_tasks_by_day() {
    let state = demo_state(day(2024, 1, 31));
    let january = CalendarMonth::containing(day(2024, 1, 15));
    assert_eq!(january.first_day(), day(2024, 1, 1));

    let agenda = january.agenda(&state.tasks);
    assert_eq!(agenda.keys().copied().collect::<Vec<_>>(), vec![31]);
    assert_eq!(agenda[&31].len(), 2);

    let february = january.next().unwrap();
    let agenda = february.agenda(&state.tasks);
    assert_eq!(ids(&agenda[&1]), ["t3"]);
    assert_eq!(february.day(1), Some(day(2024, 2, 1)));
}
