use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use taskflow_core::seed::{current_user, demo_state, empty_state};
use taskflow_core::{
    Category, MemoryStateGateway, Priority, StateGateway, TaskDraft, TaskPatch, TaskStore, User,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn empty_store(today: NaiveDate) -> TaskStore<MemoryStateGateway> {
    TaskStore::open_at(MemoryStateGateway::new(), today, empty_state)
}

fn memo_draft() -> TaskDraft {
    TaskDraft::new("Draft memo", day(2024, 1, 10), Category::Business, Priority::Low)
}

#[test]
fn add_task_fills_store_managed_fields() {
    let mut store = empty_store(day(2024, 1, 10));

    let id = store.add_task(memo_draft());

    assert_eq!(store.tasks().len(), 1);
    let task = store.task(&id).unwrap();
    assert_eq!(task.title, "Draft memo");
    assert_eq!(task.date, day(2024, 1, 10));
    assert_eq!(task.category, Category::Business);
    assert_eq!(task.priority, Priority::Low);
    assert_eq!(task.progress, 0);
    assert!(!task.completed);
    assert_eq!(task.assignees, vec![current_user()]);
    assert!(id.len() >= 9);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn add_task_appends_in_insertion_order_with_distinct_ids() {
    let mut store = empty_store(day(2024, 1, 10));

    let ids = (0..50)
        .map(|i| {
            let mut draft = memo_draft();
            draft.title = format!("task {i}");
            store.add_task(draft)
        })
        .collect::<Vec<_>>();

    let unique = ids.iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), ids.len());
    let titles = store
        .tasks()
        .iter()
        .map(|task| task.title.clone())
        .collect::<Vec<_>>();
    assert_eq!(titles.first().map(String::as_str), Some("task 0"));
    assert_eq!(titles.last().map(String::as_str), Some("task 49"));
}

#[test]
fn delete_missing_id_leaves_collection_unchanged() {
    let gateway = MemoryStateGateway::new();
    let mut store = TaskStore::open_at(gateway.clone(), day(2024, 1, 10), empty_state);
    store.add_task(memo_draft());
    store.add_task(memo_draft());
    let saves_before = gateway.save_count();
    let before = store.tasks().to_vec();

    assert!(!store.delete_task("zzz"));

    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(gateway.save_count(), saves_before);
}

#[test]
fn delete_existing_id_removes_exactly_one() {
    let mut store = empty_store(day(2024, 1, 10));
    let first = store.add_task(memo_draft());
    let second = store.add_task(memo_draft());

    assert!(store.delete_task(&first));

    assert_eq!(store.tasks().len(), 1);
    assert!(store.task(&first).is_none());
    assert!(store.task(&second).is_some());
}

#[test]
fn toggle_moves_progress_in_lockstep_and_is_an_involution() {
    let today = day(2024, 3, 4);
    let mut store = TaskStore::open_at(MemoryStateGateway::new(), today, demo_state);
    let original = store.task("t1").unwrap().clone();
    assert_eq!(original.progress, 60);

    assert!(store.toggle_task_complete("t1"));
    let toggled = store.task("t1").unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.progress, 100);

    assert!(store.toggle_task_complete("t1"));
    let restored = store.task("t1").unwrap();
    assert!(!restored.completed);
    assert_eq!(restored.progress, 0);

    // From a consistent starting point the double toggle restores both fields.
    assert!(store.toggle_task_complete("t3"));
    assert!(store.toggle_task_complete("t3"));
    let t3 = store.task("t3").unwrap();
    assert!(!t3.completed);
    assert_eq!(t3.progress, 0);

    assert!(!store.toggle_task_complete("missing"));
}

#[test]
fn update_task_merges_fields_without_reconciling_progress() {
    let mut store = empty_store(day(2024, 1, 10));
    let id = store.add_task(memo_draft());

    let applied = store.update_task(
        &id,
        TaskPatch {
            title: Some("Final memo".to_string()),
            completed: Some(true),
            progress: Some(40),
            ..TaskPatch::default()
        },
    );

    assert!(applied);
    let task = store.task(&id).unwrap();
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Final memo");
    assert!(task.completed);
    assert_eq!(task.progress, 40);
    assert_eq!(task.category, Category::Business);

    assert!(!store.update_task("missing", TaskPatch::default()));
    assert!(TaskPatch::default().is_empty());
    assert!(!TaskPatch {
        progress: Some(0),
        ..TaskPatch::default()
    }
    .is_empty());
}

#[test]
fn set_user_keeps_existing_assignee_copies() {
    let mut store = empty_store(day(2024, 1, 10));
    let id = store.add_task(memo_draft());

    let renamed = User {
        name: "Renamed Owner".to_string(),
        ..current_user()
    };
    store.set_user(renamed.clone());

    assert_eq!(store.user(), &renamed);
    assert_eq!(store.task(&id).unwrap().assignees, vec![current_user()]);

    let next = store.add_task(memo_draft());
    assert_eq!(store.task(&next).unwrap().assignees, vec![renamed]);
}

#[test]
fn mutations_persist_but_selected_date_does_not() {
    let gateway = MemoryStateGateway::new();
    let mut store = TaskStore::open_at(gateway.clone(), day(2024, 1, 10), empty_state);

    store.add_task(memo_draft());
    let saved = gateway.document().unwrap();
    let saves = gateway.save_count();

    store.set_selected_date(day(2030, 6, 1));
    assert_eq!(gateway.save_count(), saves);

    store.persist().unwrap();
    assert_eq!(gateway.document().unwrap(), saved);
    assert!(!saved.contains("2030"));
}

#[test]
fn restart_resets_selected_date_to_rehydration_day() {
    let gateway = MemoryStateGateway::new();
    {
        let mut store = TaskStore::open_at(gateway.clone(), day(2024, 1, 10), empty_state);
        store.add_task(memo_draft());
        store.set_selected_date(day(2024, 1, 3));
    }

    let restart_day = day(2024, 2, 20);
    let reopened = TaskStore::open_at(gateway, restart_day, demo_state);

    assert_eq!(reopened.selected_date(), restart_day);
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].date, day(2024, 1, 10));
    assert_eq!(reopened.tasks()[0].title, "Draft memo");
}

#[test]
fn empty_storage_uses_fallback_without_saving() {
    let gateway = MemoryStateGateway::new();
    let today = day(2024, 8, 15);
    let store = TaskStore::open_at(gateway.clone(), today, demo_state);

    assert_eq!(store.tasks().len(), 3);
    assert_eq!(store.tasks_on_selected_date().len(), 2);
    assert_eq!(store.selected_date(), today);
    assert_eq!(gateway.save_count(), 0);
}

#[test]
fn unreadable_storage_falls_back_to_seed_without_overwriting_slot() {
    let gateway = MemoryStateGateway::with_document("{not json");
    let mut store = TaskStore::open_at(gateway.clone(), day(2024, 8, 15), demo_state);

    assert_eq!(store.tasks().len(), 3);
    assert!(gateway.load().is_err());
    assert!(store.storage_locked());

    let id = store.add_task(memo_draft());
    assert!(store.task(&id).is_some());
    assert_eq!(gateway.document().as_deref(), Some("{not json"));
    assert_eq!(gateway.save_count(), 0);
    assert!(store.last_persist_error().unwrap().contains("held"));
    assert!(store.persist().is_err());
    assert_eq!(gateway.document().as_deref(), Some("{not json"));

    store.reset_storage().unwrap();
    assert!(!store.storage_locked());
    assert!(store.last_persist_error().is_none());
    assert!(gateway.document().unwrap().contains(&id));
}

#[test]
fn odd_stored_task_fields_do_not_discard_stored_data() {
    let document = r#"{
        "state": {
            "tasks": [
                {"id": "keep1", "title": "Keep me", "date": "2024-08-01T00:00:00.000Z",
                 "category": "Gardening", "priority": "High", "progress": 12.5},
                {"id": "keep2", "date": "2024-08-02", "category": "Family"},
                42
            ],
            "user": {"id": "u9", "name": "Stored Owner", "email": "u9@example.com", "role": "Lead", "avatar": ""}
        },
        "version": 0
    }"#;
    let gateway = MemoryStateGateway::with_document(document);
    let mut store = TaskStore::open_at(gateway.clone(), day(2024, 8, 15), demo_state);

    let ids = store
        .tasks()
        .iter()
        .map(|task| task.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["keep1", "keep2"]);
    assert!(!store.storage_locked());
    assert_eq!(store.user().id, "u9");

    let keep1 = store.task("keep1").unwrap();
    assert_eq!(keep1.progress, 13);
    assert_eq!(keep1.category, Category::Designing);
    assert_eq!(keep1.priority, Priority::High);
    let keep2 = store.task("keep2").unwrap();
    assert_eq!(keep2.title, "");
    assert_eq!(keep2.priority, Priority::Medium);
    assert_eq!(keep2.date, day(2024, 8, 2));

    store.add_task(memo_draft());

    let saved = gateway.document().unwrap();
    assert!(saved.contains("keep1"));
    assert!(saved.contains("keep2"));
    assert!(saved.contains("u9"));
}

#[test]
fn failed_save_keeps_memory_state_and_records_error() {
    let gateway = MemoryStateGateway::new();
    let mut store = TaskStore::open_at(gateway.clone(), day(2024, 1, 10), empty_state);
    gateway.set_fail_writes(true);

    let id = store.add_task(memo_draft());

    assert!(store.task(&id).is_some());
    assert!(store
        .last_persist_error()
        .unwrap()
        .contains("rejects writes"));
    assert!(gateway.document().is_none());

    gateway.set_fail_writes(false);
    assert!(store.toggle_task_complete(&id));
    assert!(store.last_persist_error().is_none());
    assert!(gateway.document().unwrap().contains(&id));
}

#[test]
fn subscribers_see_only_their_projection_changes() {
    let mut store = empty_store(day(2024, 1, 10));
    let task_counts = Arc::new(Mutex::new(Vec::new()));
    let dates = Arc::new(Mutex::new(Vec::new()));

    let counts_sink = Arc::clone(&task_counts);
    let count_sub = store.subscribe(
        |state| state.tasks.len(),
        move |len| counts_sink.lock().unwrap().push(*len),
    );
    let dates_sink = Arc::clone(&dates);
    store.subscribe(
        |state| state.selected_date,
        move |date| dates_sink.lock().unwrap().push(*date),
    );

    let id = store.add_task(memo_draft());
    store.toggle_task_complete(&id);
    store.set_selected_date(day(2024, 1, 11));
    store.set_selected_date(day(2024, 1, 11));

    assert!(store.unsubscribe(count_sub));
    store.add_task(memo_draft());

    assert_eq!(*task_counts.lock().unwrap(), vec![1]);
    assert_eq!(*dates.lock().unwrap(), vec![day(2024, 1, 11)]);
}

#[test]
fn selected_day_progress_tracks_completion() {
    let today = day(2024, 3, 4);
    let mut store = TaskStore::open_at(MemoryStateGateway::new(), today, demo_state);
    assert_eq!(store.selected_day_progress(), 0);

    store.toggle_task_complete("t1");
    assert_eq!(store.selected_day_progress(), 50);

    store.set_selected_date(day(2024, 3, 5));
    assert_eq!(store.tasks_on_selected_date().len(), 1);
    assert_eq!(store.selected_day_progress(), 0);
}
