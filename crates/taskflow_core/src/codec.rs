//! Persistence codec between in-memory state and the storage document.
//!
//! # Responsibility
//! - Project store state onto its persisted subset (`tasks`, `user`).
//! - Convert task dates to ISO-8601 text on save and back on load.
//! - Encode/decode the versioned JSON storage document.
//!
//! # Invariants
//! - `selected_date` is never part of the persisted form.
//! - Rehydration always sets `selected_date` to the caller-provided day.
//! - A missing or malformed task date is replaced by that same day and the
//!   task id is reported in `Rehydrated::repaired`.
//! - An unreadable category or priority is replaced by the create-form
//!   default (`Designing`, `Medium`) and reported the same way.
//! - A task entry that cannot be read at all is dropped with a warning; it
//!   never fails the whole document.

use crate::model::state::AppState;
use crate::model::task::{Category, Priority, Task, TaskId};
use crate::model::user::User;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the single durable storage slot.
pub const STORAGE_KEY: &str = "taskflow-storage";

/// Latest storage document version written by this build.
pub const STORAGE_VERSION: u32 = 0;

pub type CodecResult<T> = Result<T, CodecError>;

/// Storage document encode/decode failure.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    UnsupportedVersion { found: u32, latest_supported: u32 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid storage document: {err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "storage document version {found} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Task as stored: `Task` with ISO-8601 `date` text and optional labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTask {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `None` when the stored document has no usable date value.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    /// `None` when the stored label is missing or unknown.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
    /// `None` when the stored label is missing or unknown.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    /// Any JSON number is accepted and rounded.
    #[serde(default, deserialize_with = "lenient_progress")]
    pub progress: i32,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub completed: bool,
}

/// Persisted subset of store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(deserialize_with = "readable_tasks")]
    pub tasks: Vec<PersistedTask>,
    pub user: User,
}

/// Result of turning a persisted snapshot back into live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rehydrated {
    pub state: AppState,
    /// Ids of tasks whose stored date, category or priority was missing or
    /// unreadable, in collection order.
    pub repaired: Vec<TaskId>,
}

#[derive(Serialize)]
struct StorageDocumentRef<'a> {
    state: &'a PersistedState,
    version: u32,
}

#[derive(Deserialize)]
struct StorageDocument {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Projects `state` onto its persisted form.
pub fn serialize(state: &AppState) -> PersistedState {
    PersistedState {
        tasks: state.tasks.iter().map(persist_task).collect(),
        user: state.user.clone(),
    }
}

/// Rebuilds live state from a persisted snapshot.
///
/// `today` becomes the selected date and the substitute for unusable task
/// dates.
pub fn deserialize(persisted: PersistedState, today: NaiveDate) -> Rehydrated {
    let mut repaired = Vec::new();
    let tasks = persisted
        .tasks
        .into_iter()
        .map(|stored| {
            let date = stored.date.as_deref().and_then(parse_date);
            let category = stored.category;
            let priority = stored.priority;
            if date.is_none() || category.is_none() || priority.is_none() {
                warn!(
                    "event=rehydrate_task module=codec status=repaired task_id={} date_ok={} category_ok={} priority_ok={}",
                    stored.id,
                    date.is_some(),
                    category.is_some(),
                    priority.is_some()
                );
                repaired.push(stored.id.clone());
            }
            restore_task(
                stored,
                date.unwrap_or(today),
                category.unwrap_or_default(),
                priority.unwrap_or_default(),
            )
        })
        .collect();

    Rehydrated {
        state: AppState::new(tasks, persisted.user, today),
        repaired,
    }
}

/// Encodes a persisted snapshot as the versioned JSON storage document.
pub fn encode(persisted: &PersistedState) -> CodecResult<String> {
    let document = StorageDocumentRef {
        state: persisted,
        version: STORAGE_VERSION,
    };
    Ok(serde_json::to_string(&document)?)
}

/// Decodes a JSON storage document.
///
/// # Errors
/// - `CodecError::Json` for malformed or structurally invalid text.
/// - `CodecError::UnsupportedVersion` for documents written by a newer build.
pub fn decode(text: &str) -> CodecResult<PersistedState> {
    let document: StorageDocument = serde_json::from_str(text)?;
    if document.version > STORAGE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: document.version,
            latest_supported: STORAGE_VERSION,
        });
    }
    Ok(document.state)
}

/// Formats a day as an ISO-8601 UTC timestamp at midnight.
///
/// Example: `2024-01-10T00:00:00.000Z`.
pub fn format_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored date.
///
/// Accepts RFC 3339 timestamps (the calendar day is read in the timestamp's
/// own offset) and bare `YYYY-MM-DD` dates.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn persist_task(task: &Task) -> PersistedTask {
    PersistedTask {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        date: Some(format_date(task.date)),
        start_time: task.start_time.clone(),
        end_time: task.end_time.clone(),
        category: Some(task.category),
        priority: Some(task.priority),
        progress: task.progress,
        assignees: task.assignees.clone(),
        completed: task.completed,
    }
}

fn restore_task(
    stored: PersistedTask,
    date: NaiveDate,
    category: Category,
    priority: Priority,
) -> Task {
    Task {
        id: stored.id,
        title: stored.title,
        description: stored.description,
        date,
        start_time: stored.start_time,
        end_time: stored.end_time,
        category,
        priority,
        progress: stored.progress,
        assignees: stored.assignees,
        completed: stored.completed,
    }
}

fn readable_tasks<'de, D>(deserializer: D) -> Result<Vec<PersistedTask>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match PersistedTask::deserialize(entry) {
            Ok(task) => tasks.push(task),
            Err(err) => warn!(
                "event=rehydrate_task module=codec status=dropped index={} error={}",
                index, err
            ),
        }
    }
    Ok(tasks)
}

fn label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(label(deserializer)?.as_deref().and_then(Category::from_label))
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(label(deserializer)?.as_deref().and_then(Priority::from_label))
}

fn lenient_progress<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let progress = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };
    if !progress.is_finite() {
        return Ok(0);
    }
    // `as` saturates at the i32 bounds.
    Ok(progress.round() as i32)
}
