//! Domain model for tasks and their owners.
//!
//! # Responsibility
//! - Define the canonical task/user records held by the store.
//! - Define input shapes (`TaskDraft`, `TaskPatch`) used by store mutations.
//!
//! # Invariants
//! - Task ids are opaque strings and never change after creation.
//! - Assignees are value copies; no shared mutable ownership of users.

pub mod state;
pub mod task;
pub mod user;
