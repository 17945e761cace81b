use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;
use taskflow_core::codec::{deserialize, serialize};
use taskflow_core::seed::{demo_state, empty_state};
use taskflow_core::{Category, MemoryStateGateway, Priority, TaskDraft, TaskStore};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..80_000).prop_map(|offset| epoch().checked_add_days(Days::new(offset)).unwrap())
}

fn any_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn any_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(vec![Priority::High, Priority::Medium, Priority::Low])
}

fn any_draft() -> impl Strategy<Value = TaskDraft> {
    ("[a-zA-Z ]{0,16}", any_date(), any_category(), any_priority())
        .prop_map(|(title, date, category, priority)| TaskDraft::new(title, date, category, priority))
}

proptest! {
    #[test]
    fn added_task_ids_are_pairwise_distinct(drafts in prop::collection::vec(any_draft(), 1..40)) {
        let mut store = TaskStore::open_at(MemoryStateGateway::new(), epoch(), empty_state);
        let count = drafts.len();
        for draft in drafts {
            store.add_task(draft);
        }

        let ids = store.tasks().iter().map(|task| task.id.clone()).collect::<HashSet<_>>();
        prop_assert_eq!(ids.len(), count);
    }

    #[test]
    fn double_toggle_restores_consistent_task(draft in any_draft(), complete_first in any::<bool>()) {
        let mut store = TaskStore::open_at(MemoryStateGateway::new(), epoch(), empty_state);
        let id = store.add_task(draft);
        if complete_first {
            store.toggle_task_complete(&id);
        }
        let before = store.task(&id).unwrap().clone();

        store.toggle_task_complete(&id);
        store.toggle_task_complete(&id);

        prop_assert_eq!(store.task(&id).unwrap(), &before);
    }

    #[test]
    fn date_round_trip_preserves_calendar_day(date in any_date(), restart in any_date()) {
        let mut state = demo_state(epoch());
        for task in &mut state.tasks {
            task.date = date;
        }

        let rehydrated = deserialize(serialize(&state), restart);

        prop_assert!(rehydrated.repaired.is_empty());
        prop_assert!(rehydrated.state.tasks.iter().all(|task| task.date == date));
        prop_assert_eq!(rehydrated.state.selected_date, restart);
    }
}
