//! Project domain model.
//!
//! Projects, and every entity hanging off them, are owned by the CRUD layer.
//! This crate only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A lean-startup project being validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Store identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Free-text summary of the idea.
    #[serde(default)]
    pub description: Option<String>,
    /// Problem the project sets out to solve.
    #[serde(default)]
    pub problem_statement: Option<String>,
    /// Who the project is for.
    #[serde(default)]
    pub customer_segments: Option<String>,
    /// Current validation stage (free text, e.g. "problem-validation").
    #[serde(default)]
    pub stage: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether the given user owns this project.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
