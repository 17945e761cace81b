//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by agenda, calendar and search
//!   projections.
//! - Provide creation (`TaskDraft`) and shallow-merge (`TaskPatch`) inputs.
//!
//! # Invariants
//! - `id` is assigned by the store and never rewritten by a patch.
//! - `date` carries day-level semantics only.
//! - `progress` and `completed` are independent fields; only
//!   `TaskStore::toggle_task_complete` moves them together.

use crate::model::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque task identifier.
///
/// Kept as a type alias because persisted ids from older storage documents
/// are arbitrary strings (`"t1"`), not only generated tokens.
pub type TaskId = String;

/// Fixed task category set.
///
/// The default matches the create-task form's preselected category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Marketing,
    Family,
    Sports,
    Academics,
    Entertainment,
    Art,
    Business,
    #[default]
    Designing,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Marketing,
        Category::Family,
        Category::Sports,
        Category::Academics,
        Category::Entertainment,
        Category::Art,
        Category::Business,
        Category::Designing,
    ];

    /// Display and storage label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Marketing => "Marketing",
            Self::Family => "Family",
            Self::Sports => "Sports",
            Self::Academics => "Academics",
            Self::Entertainment => "Entertainment",
            Self::Art => "Art",
            Self::Business => "Business",
            Self::Designing => "Designing",
        }
    }

    /// Parses a label case-insensitively.
    pub fn from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Canonical task record held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Store-generated identifier, unique within the collection.
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Calendar day the task is scheduled on.
    pub date: NaiveDate,
    /// Free-form display string, e.g. `10:00 AM`.
    pub start_time: String,
    /// Free-form display string, e.g. `12:30 PM`.
    pub end_time: String,
    pub category: Category,
    pub priority: Priority,
    /// Expected range is 0..=100; not validated.
    pub progress: i32,
    /// Value copies of the assigned users, in assignment order.
    pub assignees: Vec<User>,
    pub completed: bool,
}

impl Task {
    /// Whether this task is scheduled on `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Whether `user_id` is among the assignees.
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assignees.iter().any(|user| user.id == user_id)
    }
}

/// Caller-supplied fields for a new task.
///
/// The store fills in `id`, `progress`, `completed` and `assignees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub category: Category,
    pub priority: Priority,
}

impl TaskDraft {
    /// Builds a draft with empty description and time strings.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            date,
            start_time: String::new(),
            end_time: String::new(),
            category,
            priority,
        }
    }

    pub(crate) fn into_task(self, id: TaskId, owner: User) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            priority: self.priority,
            progress: 0,
            assignees: vec![owner],
            completed: false,
        }
    }
}

/// Partial update applied by `TaskStore::update_task`.
///
/// `None` leaves the field untouched. `id` is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub progress: Option<i32>,
    pub assignees: Option<Vec<User>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow-merges every present field into `task`.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(start_time) = self.start_time {
            task.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            task.end_time = end_time;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(progress) = self.progress {
            task.progress = progress;
        }
        if let Some(assignees) = self.assignees {
            task.assignees = assignees;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
