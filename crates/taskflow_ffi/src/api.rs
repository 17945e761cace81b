//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task store to Dart through one explicit `TaskflowApp` handle.
//! - Translate core types into string-based DTOs.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.
//! - Labels (category, priority, filter) are matched case-insensitively.

use chrono::NaiveDate;
use log::error;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use taskflow_core::query::{filter_tasks, search_tasks, tasks_on};
use taskflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CalendarMonth, Category, CoreConfig, Priority, SearchQuery, SqliteStateGateway, Task,
    TaskDraft, TaskFilter, TaskPatch, TaskStore, User,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// User record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
}

/// Task record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub priority: String,
    pub progress: i32,
    pub assignees: Vec<UserItem>,
    pub completed: bool,
}

/// Create-task form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraftInput {
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub priority: String,
}

/// Partial task update payload; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatchInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub progress: Option<i32>,
    pub completed: Option<bool>,
}

/// Home screen projection for the selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAgenda {
    pub date: String,
    pub items: Vec<TaskItem>,
    /// Rounded completion percentage of every task on `date`.
    pub progress: u8,
}

/// One calendar cell that has tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: u32,
    pub items: Vec<TaskItem>,
}

/// Month grid projection for the calendar screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthView {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub leading_blank_days: u32,
    pub days: Vec<CalendarDay>,
}

/// Store handle owned by the Dart application root.
#[flutter_rust_bridge::frb(opaque)]
pub struct TaskflowApp {
    store: Mutex<TaskStore<SqliteStateGateway>>,
}

impl TaskflowApp {
    /// Opens the store at `db_path`, or at the configured default path when
    /// `db_path` is `None` or blank.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>) -> Result<TaskflowApp, String> {
        let path: PathBuf = match db_path.map(|raw| raw.trim().to_string()) {
            Some(path) if !path.is_empty() => path.into(),
            _ => CoreConfig::from_env()?.db_path,
        };
        let gateway = SqliteStateGateway::open(&path)
            .map_err(|err| format!("taskflow storage open failed: {err}"))?;
        Ok(Self {
            store: Mutex::new(TaskStore::open(gateway)),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn list_tasks(&self) -> Result<Vec<TaskItem>, String> {
        let store = self.lock()?;
        Ok(store.tasks().iter().map(to_task_item).collect())
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn get_task(&self, id: String) -> Result<Option<TaskItem>, String> {
        let store = self.lock()?;
        Ok(store.task(&id).map(to_task_item))
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn current_user(&self) -> Result<UserItem, String> {
        let store = self.lock()?;
        Ok(to_user_item(store.user()))
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn selected_date(&self) -> Result<String, String> {
        let store = self.lock()?;
        Ok(store.selected_date().format(DATE_FORMAT).to_string())
    }

    /// Tasks on the selected day, narrowed by a list tab label
    /// (`All`, `My tasks`, `In-progress`, `Completed`).
    #[flutter_rust_bridge::frb(sync)]
    pub fn day_agenda(&self, filter: Option<String>) -> Result<DayAgenda, String> {
        let filter = match filter.as_deref() {
            Some(label) => TaskFilter::from_label(label)
                .ok_or_else(|| format!("unknown task filter `{label}`"))?,
            None => TaskFilter::All,
        };
        let store = self.lock()?;
        let on_day = store.tasks_on_selected_date();
        let items = filter_tasks(&on_day, filter, &store.user().id);
        Ok(DayAgenda {
            date: store.selected_date().format(DATE_FORMAT).to_string(),
            items: items.iter().map(|task| to_task_item(task)).collect(),
            progress: store.selected_day_progress(),
        })
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn tasks_on(&self, date: String) -> Result<Vec<TaskItem>, String> {
        let date = parse_date(&date)?;
        let store = self.lock()?;
        Ok(tasks_on(store.tasks(), date)
            .into_iter()
            .map(to_task_item)
            .collect())
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn calendar_month(&self, year: i32, month: u32) -> Result<CalendarMonthView, String> {
        let calendar = CalendarMonth::new(year, month)
            .ok_or_else(|| format!("invalid calendar month {year}-{month}"))?;
        let store = self.lock()?;
        let days = calendar
            .agenda(store.tasks())
            .into_iter()
            .map(|(day, tasks)| CalendarDay {
                day,
                items: tasks.into_iter().map(to_task_item).collect(),
            })
            .collect();
        Ok(CalendarMonthView {
            year,
            month,
            days_in_month: calendar.days_in_month(),
            leading_blank_days: calendar.leading_blank_days(),
            days,
        })
    }

    /// Searches titles and category labels; `category = None` or `All`
    /// searches every category.
    #[flutter_rust_bridge::frb(sync)]
    pub fn search(&self, text: String, category: Option<String>) -> Result<Vec<TaskItem>, String> {
        let category = match category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) if label.eq_ignore_ascii_case("all") => None,
            Some(label) => Some(parse_category(label)?),
        };
        let store = self.lock()?;
        let query = SearchQuery { text, category };
        Ok(search_tasks(store.tasks(), &query)
            .into_iter()
            .map(to_task_item)
            .collect())
    }

    /// Creates a task and returns its id.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_task(&self, input: TaskDraftInput) -> Result<String, String> {
        let draft = TaskDraft {
            title: input.title,
            description: input.description,
            date: parse_date(&input.date)?,
            start_time: input.start_time,
            end_time: input.end_time,
            category: parse_category(&input.category)?,
            priority: parse_priority(&input.priority)?,
        };
        let mut store = self.lock()?;
        Ok(store.add_task(draft))
    }

    /// Returns whether a task was removed.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_task(&self, id: String) -> Result<bool, String> {
        Ok(self.lock()?.delete_task(&id))
    }

    /// Returns whether the task exists.
    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_task_complete(&self, id: String) -> Result<bool, String> {
        Ok(self.lock()?.toggle_task_complete(&id))
    }

    /// Returns whether the task exists. An empty patch is not saved.
    #[flutter_rust_bridge::frb(sync)]
    pub fn update_task(&self, id: String, input: TaskPatchInput) -> Result<bool, String> {
        let patch = TaskPatch {
            title: input.title,
            description: input.description,
            date: input.date.as_deref().map(parse_date).transpose()?,
            start_time: input.start_time,
            end_time: input.end_time,
            category: input.category.as_deref().map(parse_category).transpose()?,
            priority: input.priority.as_deref().map(parse_priority).transpose()?,
            progress: input.progress,
            assignees: None,
            completed: input.completed,
        };
        let mut store = self.lock()?;
        if patch.is_empty() {
            return Ok(store.task(&id).is_some());
        }
        Ok(store.update_task(&id, patch))
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn set_selected_date(&self, date: String) -> Result<(), String> {
        let date = parse_date(&date)?;
        self.lock()?.set_selected_date(date);
        Ok(())
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn set_user(&self, user: UserItem) -> Result<(), String> {
        self.lock()?.set_user(User {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
        });
        Ok(())
    }

    /// Whether saves are held because the stored document was unreadable.
    #[flutter_rust_bridge::frb(sync)]
    pub fn storage_locked(&self) -> Result<bool, String> {
        Ok(self.lock()?.storage_locked())
    }

    /// Replaces an unreadable stored document with the current state.
    #[flutter_rust_bridge::frb(sync)]
    pub fn reset_storage(&self) -> Result<(), String> {
        self.lock()?
            .reset_storage()
            .map_err(|err| format!("taskflow storage reset failed: {err}"))
    }

    /// Message of the most recent failed background save, if any.
    #[flutter_rust_bridge::frb(sync)]
    pub fn last_persist_error(&self) -> Result<Option<String>, String> {
        Ok(self.lock()?.last_persist_error().map(str::to_string))
    }

    fn lock(&self) -> Result<MutexGuard<'_, TaskStore<SqliteStateGateway>>, String> {
        self.store.lock().map_err(|_| {
            error!("event=ffi_lock module=ffi status=error error_code=store_poisoned");
            "taskflow store is unavailable after an earlier panic".to_string()
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{value}`; expected YYYY-MM-DD"))
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_label(value).ok_or_else(|| format!("unknown category `{value}`"))
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_label(value).ok_or_else(|| format!("unknown priority `{value}`"))
}

fn to_user_item(user: &User) -> UserItem {
    UserItem {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        avatar: user.avatar.clone(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        date: task.date.format(DATE_FORMAT).to_string(),
        start_time: task.start_time.clone(),
        end_time: task.end_time.clone(),
        category: task.category.label().to_string(),
        priority: task.priority.label().to_string(),
        progress: task.progress,
        assignees: task.assignees.iter().map(to_user_item).collect(),
        completed: task.completed,
    }
}
