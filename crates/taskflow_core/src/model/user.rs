//! User profile model.

use serde::{Deserialize, Serialize};

/// Person that owns the store or appears as a task assignee.
///
/// Persisted verbatim as part of the storage document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Avatar image URI.
    pub avatar: String,
}
