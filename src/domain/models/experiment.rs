//! Experiment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentStatus {
    /// Not started yet.
    #[default]
    Planned,
    /// Running.
    InProgress,
    /// Finished, with results recorded.
    Completed,
    /// Abandoned before completion.
    Cancelled,
}

impl ExperimentStatus {
    /// Wire name, kebab-case.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status name, accepting common aliases.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "planned" => Some(Self::Planned),
            "in-progress" | "running" | "active" => Some(Self::InProgress),
            "completed" | "complete" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Parse a stored status, mapping unknown values to `Planned`.
    pub fn from_stored(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Whether results are in.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// An experiment run against a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    /// Store identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Short name.
    pub title: String,
    /// Hypothesis under test.
    #[serde(default)]
    pub hypothesis: Option<String>,
    /// Validation method, e.g. `interview` or `landing-page`.
    #[serde(default)]
    pub method: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ExperimentStatus,
    /// Free-text grouping used in the pattern summary.
    #[serde(default)]
    pub category: Option<String>,
    /// What counts as a pass.
    #[serde(default)]
    pub success_criteria: Option<String>,
    /// Recorded outcome.
    #[serde(default)]
    pub results: Option<String>,
    /// What the team took away.
    #[serde(default)]
    pub learnings: Option<String>,
    /// Creation time; reads are newest first.
    pub created_at: DateTime<Utc>,
}
