//! Core domain logic for TaskFlow.
//! This crate owns the task store and everything it persists.

pub mod codec;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod query;
pub mod seed;
pub mod store;

pub use codec::{
    CodecError, CodecResult, PersistedState, PersistedTask, Rehydrated, STORAGE_KEY,
    STORAGE_VERSION,
};
pub use config::CoreConfig;
pub use gateway::memory::MemoryStateGateway;
pub use gateway::sqlite::SqliteStateGateway;
pub use gateway::{GatewayError, GatewayResult, StateGateway};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::state::AppState;
pub use model::task::{Category, Priority, Task, TaskDraft, TaskId, TaskPatch};
pub use model::user::User;
pub use query::{CalendarMonth, SearchQuery, TaskFilter};
pub use store::{SubscriptionId, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
