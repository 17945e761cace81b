//! Read-side task projections for agenda, calendar and search views.
//!
//! # Responsibility
//! - Filter tasks by day, month, text and list tab.
//! - Compute day completion percentage.
//!
//! # Invariants
//! - Every projection preserves store insertion order.
//! - Projections never mutate tasks.

use crate::model::task::{Category, Task};
use chrono::{Datelike, Days, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Tasks scheduled on `date`.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_on(date)).collect()
}

/// Share of completed tasks, as a percentage rounded half up.
///
/// Returns `0` for an empty slice.
pub fn completion_percent(tasks: &[&Task]) -> u8 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    let rounded = (completed * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Free-text and category search options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Matched case-insensitively against title and category label.
    /// Blank text matches everything.
    pub text: String,
    /// Exact category restriction; `None` means all categories.
    pub category: Option<Category>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }
}

/// Runs `query` over `tasks`.
pub fn search_tasks<'a>(tasks: &'a [Task], query: &SearchQuery) -> Vec<&'a Task> {
    let term = normalize_search_term(&query.text);
    tasks
        .iter()
        .filter(|task| query.category.map_or(true, |category| task.category == category))
        .filter(|task| {
            term.is_empty()
                || task.title.to_lowercase().contains(&term)
                || task.category.label().to_lowercase().contains(&term)
        })
        .collect()
}

fn normalize_search_term(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// List tabs shown above the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    /// Tasks where the given user is an assignee.
    Mine,
    /// Tasks not yet completed.
    InProgress,
    Completed,
}

impl TaskFilter {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "mine" | "my tasks" => Some(Self::Mine),
            "in-progress" | "in progress" | "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Applies a list tab to `tasks`; `user_id` is the viewer for `Mine`.
pub fn filter_tasks<'a>(tasks: &[&'a Task], filter: TaskFilter, user_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .copied()
        .filter(|task| match filter {
            TaskFilter::All => true,
            TaskFilter::Mine => task.is_assigned_to(user_id),
            TaskFilter::InProgress => !task.completed,
            TaskFilter::Completed => task.completed,
        })
        .collect()
}

/// One calendar month, identified by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// Returns `None` for an invalid month or an out-of-range year.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = date
            .checked_sub_days(Days::new(u64::from(date.day0())))
            .unwrap_or(date);
        Self { first }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-based.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn days_in_month(&self) -> u32 {
        match self.next() {
            Some(next) => u32::try_from((next.first - self.first).num_days()).unwrap_or(31),
            None => 31,
        }
    }

    /// Empty grid cells before day 1 in a Sunday-first week layout.
    pub fn leading_blank_days(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Returns the date for `day` in this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Groups the month's tasks by day of month.
    ///
    /// Days without tasks are absent from the map.
    pub fn agenda<'a>(&self, tasks: &'a [Task]) -> BTreeMap<u32, Vec<&'a Task>> {
        let mut by_day: BTreeMap<u32, Vec<&Task>> = BTreeMap::new();
        for task in tasks.iter().filter(|task| self.contains(task.date)) {
            by_day.entry(task.date.day()).or_default().push(task);
        }
        by_day
    }
}
