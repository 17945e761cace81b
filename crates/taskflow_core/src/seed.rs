//! Demo seed data used when durable storage is empty.
//!
//! Known users are static: they are never persisted or mutated on their own.

use crate::model::state::AppState;
use crate::model::task::{Category, Priority, Task};
use crate::model::user::User;
use chrono::{Days, NaiveDate};

const AVATAR_BASE: &str = "https://images.unsplash.com";

/// Default store owner.
pub fn current_user() -> User {
    User {
        id: "u1".to_string(),
        name: "Mclaren Audi".to_string(),
        email: "mclaren@gmail.com".to_string(),
        role: "UI/UX Designer".to_string(),
        avatar: format!("{AVATAR_BASE}/photo-1689600944138-da3b150d9cb8?w=256&h=256&q=80"),
    }
}

/// Static list of known users, owner first.
pub fn known_users() -> Vec<User> {
    vec![
        current_user(),
        User {
            id: "u2".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: "Developer".to_string(),
            avatar: format!("{AVATAR_BASE}/photo-1680104073282-8462cdf70b6a?w=256&h=256&q=80"),
        },
        User {
            id: "u3".to_string(),
            name: "Sarah Smith".to_string(),
            email: "sarah@example.com".to_string(),
            role: "Manager".to_string(),
            avatar: format!("{AVATAR_BASE}/photo-1494790108377-be9c29b29330?w=256&h=256&q=80"),
        },
    ]
}

/// Starter tasks: two on `today`, one on the following day.
pub fn initial_tasks(today: NaiveDate) -> Vec<Task> {
    let users = known_users();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    vec![
        Task {
            id: "t1".to_string(),
            title: "Web Designing".to_string(),
            description: "Design the new landing page for the marketing campaign.".to_string(),
            date: today,
            start_time: "10:00 AM".to_string(),
            end_time: "12:30 PM".to_string(),
            category: Category::Designing,
            priority: Priority::High,
            progress: 60,
            assignees: users[..2].to_vec(),
            completed: false,
        },
        Task {
            id: "t2".to_string(),
            title: "UX Research".to_string(),
            description: "Conduct user interviews and analyze feedback.".to_string(),
            date: today,
            start_time: "02:00 PM".to_string(),
            end_time: "04:00 PM".to_string(),
            category: Category::Academics,
            priority: Priority::Medium,
            progress: 30,
            assignees: users[..1].to_vec(),
            completed: false,
        },
        Task {
            id: "t3".to_string(),
            title: "Client Meeting".to_string(),
            description: "Discuss project requirements with the client.".to_string(),
            date: tomorrow,
            start_time: "09:00 AM".to_string(),
            end_time: "10:00 AM".to_string(),
            category: Category::Business,
            priority: Priority::High,
            progress: 0,
            assignees: users[2..].to_vec(),
            completed: false,
        },
    ]
}

/// Full demo state with `today` selected.
pub fn demo_state(today: NaiveDate) -> AppState {
    AppState::new(initial_tasks(today), current_user(), today)
}

/// Empty task list owned by the demo user.
pub fn empty_state(today: NaiveDate) -> AppState {
    AppState::new(Vec::new(), current_user(), today)
}
