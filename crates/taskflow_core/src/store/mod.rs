//! Task store: the single source of truth for tasks, owner and selected day.
//!
//! # Responsibility
//! - Own the in-memory `AppState` and apply the six mutations to it.
//! - Notify selector subscribers after every state change.
//! - Save the persisted subset through a `StateGateway` after persisted
//!   mutations.
//!
//! # Invariants
//! - Task ids are unique within the collection.
//! - Lookup misses are silent no-ops: no notification, no save, no log.
//! - `set_selected_date` never saves.
//! - Save failures never reach callers; they are logged and kept in
//!   `last_persist_error`.
//! - After a failed load the slot is never written until `reset_storage`.

mod subscription;

pub use subscription::SubscriptionId;

use crate::codec;
use crate::gateway::{GatewayError, GatewayResult, StateGateway};
use crate::model::state::AppState;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::model::user::User;
use crate::query;
use crate::seed;
use chrono::{Local, NaiveDate};
use log::{debug, error, info, warn};
use subscription::Subscribers;
use uuid::Uuid;

/// Explicitly constructed task store over a persistence gateway.
pub struct TaskStore<G: StateGateway> {
    state: AppState,
    gateway: G,
    subscribers: Subscribers,
    last_persist_error: Option<String>,
    /// Load error that keeps saves away from the slot.
    load_failure: Option<String>,
}

impl<G: StateGateway> TaskStore<G> {
    /// Rehydrates from `gateway` with the local current day selected.
    ///
    /// Falls back to demo seed data when storage is empty or unreadable.
    pub fn open(gateway: G) -> Self {
        Self::open_at(gateway, Local::now().date_naive(), seed::demo_state)
    }

    /// Rehydrates from `gateway` as of `today`.
    ///
    /// `fallback` builds the initial state when the slot is empty or fails
    /// to load. `selected_date` is `today` in every case. After a failed
    /// load, saves are held back until `reset_storage` so the stored
    /// document is not replaced by the fallback.
    pub fn open_at(
        gateway: G,
        today: NaiveDate,
        fallback: impl FnOnce(NaiveDate) -> AppState,
    ) -> Self {
        let mut load_failure = None;
        let mut state = match gateway.load() {
            Ok(Some(persisted)) => {
                let rehydrated = codec::deserialize(persisted, today);
                info!(
                    "event=store_rehydrate module=store status=ok tasks={} repaired={}",
                    rehydrated.state.tasks.len(),
                    rehydrated.repaired.len()
                );
                rehydrated.state
            }
            Ok(None) => {
                info!("event=store_rehydrate module=store status=empty");
                fallback(today)
            }
            Err(err) => {
                error!(
                    "event=store_rehydrate module=store status=error error={}",
                    err
                );
                load_failure = Some(err.to_string());
                fallback(today)
            }
        };
        state.selected_date = today;

        Self {
            state,
            gateway,
            subscribers: Subscribers::default(),
            last_persist_error: None,
            load_failure,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.task(id)
    }

    pub fn user(&self) -> &User {
        &self.state.user
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.selected_date
    }

    /// Tasks scheduled on the selected day, in insertion order.
    pub fn tasks_on_selected_date(&self) -> Vec<&Task> {
        query::tasks_on(&self.state.tasks, self.state.selected_date)
    }

    /// Completion percentage of the selected day's tasks.
    pub fn selected_day_progress(&self) -> u8 {
        query::completion_percent(&self.tasks_on_selected_date())
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Whether saves are held back because the stored document failed to
    /// load.
    pub fn storage_locked(&self) -> bool {
        self.load_failure.is_some()
    }

    /// Creates a task from `draft` owned by the current user.
    ///
    /// The new task starts at `progress = 0`, not completed, and is appended
    /// to the end of the collection.
    pub fn add_task(&mut self, draft: TaskDraft) -> TaskId {
        let id = self.generate_task_id();
        let task = draft.into_task(id.clone(), self.state.user.clone());
        self.state.tasks.push(task);
        debug!(
            "event=task_add module=store status=ok task_id={} tasks={}",
            id,
            self.state.tasks.len()
        );
        self.commit(true);
        id
    }

    /// Removes the task with `id`. Returns whether a task was removed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|task| task.id != id);
        if self.state.tasks.len() == before {
            return false;
        }
        debug!(
            "event=task_delete module=store status=ok task_id={} tasks={}",
            id,
            self.state.tasks.len()
        );
        self.commit(true);
        true
    }

    /// Flips completion; progress follows (100 when completed, 0 otherwise).
    ///
    /// Returns whether the task exists.
    pub fn toggle_task_complete(&mut self, id: &str) -> bool {
        let Some(task) = self.state.task_mut(id) else {
            return false;
        };
        task.completed = !task.completed;
        task.progress = if task.completed { 100 } else { 0 };
        debug!(
            "event=task_toggle module=store status=ok task_id={} completed={}",
            id, task.completed
        );
        self.commit(true);
        true
    }

    /// Shallow-merges `patch` into the task with `id`.
    ///
    /// `progress` and `completed` are applied as given, without
    /// reconciliation. Returns whether the task exists.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> bool {
        let Some(task) = self.state.task_mut(id) else {
            return false;
        };
        patch.apply_to(task);
        debug!("event=task_update module=store status=ok task_id={id}");
        self.commit(true);
        true
    }

    /// Changes the focused day. Not persisted.
    pub fn set_selected_date(&mut self, date: NaiveDate) {
        self.state.selected_date = date;
        self.commit(false);
    }

    /// Replaces the current user record.
    ///
    /// Assignee copies already stored on tasks are left as they are.
    pub fn set_user(&mut self, user: User) {
        self.state.user = user;
        debug!(
            "event=user_set module=store status=ok user_id={}",
            self.state.user.id
        );
        self.commit(true);
    }

    /// Registers `listener` for changes of the projection chosen by
    /// `selector`.
    ///
    /// The listener is not called on registration; afterwards it is called
    /// once per mutation that changes the projection.
    pub fn subscribe<T, S, L>(&mut self, selector: S, listener: L) -> SubscriptionId
    where
        T: PartialEq + Send + 'static,
        S: Fn(&AppState) -> T + Send + 'static,
        L: FnMut(&T) + Send + 'static,
    {
        self.subscribers.add(&self.state, selector, listener)
    }

    /// Removes a subscription. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Saves the persisted subset now and reports the outcome.
    ///
    /// Mutations already save on their own; this is for callers that need
    /// to surface storage failures.
    ///
    /// # Errors
    /// - `GatewayError::Unavailable` while the store is locked after a failed
    ///   load; the slot is left untouched.
    /// - Any gateway save error.
    pub fn persist(&mut self) -> GatewayResult<()> {
        if let Some(cause) = &self.load_failure {
            let err = GatewayError::Unavailable(format!(
                "stored document could not be read ({cause}); saves are held until reset"
            ));
            warn!("event=store_persist module=store status=locked");
            self.last_persist_error = Some(err.to_string());
            return Err(err);
        }
        let snapshot = codec::serialize(&self.state);
        match self.gateway.save(&snapshot) {
            Ok(()) => {
                self.last_persist_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=store_persist module=store status=error tasks={} error={}",
                    snapshot.tasks.len(),
                    err
                );
                self.last_persist_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Unlocks storage after a failed load and saves the current state over
    /// the unreadable document.
    pub fn reset_storage(&mut self) -> GatewayResult<()> {
        if self.load_failure.take().is_some() {
            info!("event=store_reset module=store status=unlocked");
        }
        self.persist()
    }

    fn commit(&mut self, persist: bool) {
        self.subscribers.notify(&self.state);
        if persist {
            let _ = self.persist();
        }
    }

    fn generate_task_id(&self) -> TaskId {
        loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if !self.state.contains_id(&candidate) {
                return candidate;
            }
        }
    }
}
