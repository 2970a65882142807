//! Hypothesis, metric, MVP feature and pivot option records.
//!
//! These are flat rows read from the store and fed to the model as context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A falsifiable assumption about the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypothesis {
    /// Store identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// The assumption, stated so it can fail.
    pub statement: String,
    /// Problem, solution, customer and so on.
    #[serde(default)]
    pub category: Option<String>,
    /// What would validate it.
    #[serde(default)]
    pub criteria: Option<String>,
    /// Free-text validation status.
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Health of a tracked growth metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// On track.
    #[default]
    Success,
    /// At risk.
    Warning,
    /// Off track.
    Error,
}

impl MetricStatus {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse a status name, accepting the on/at-risk/off-track aliases.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "success" | "on-track" => Some(Self::Success),
            "warning" | "at-risk" => Some(Self::Warning),
            "error" | "off-track" => Some(Self::Error),
            _ => None,
        }
    }

    /// Metrics in error status are the "problematic" ones pivots are drawn from.
    pub fn is_problematic(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A tracked growth metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Store identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Metric name.
    pub name: String,
    /// Funnel stage, free text.
    #[serde(default)]
    pub category: Option<String>,
    /// Goal value.
    #[serde(default)]
    pub target: Option<f64>,
    /// Latest measured value.
    #[serde(default)]
    pub current: Option<f64>,
    /// Unit label, e.g. `%`.
    #[serde(default)]
    pub unit: Option<String>,
    /// Health status.
    #[serde(default)]
    pub status: MetricStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A candidate feature for the minimum viable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpFeature {
    /// Store identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Feature name.
    pub feature: String,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Effort label.
    #[serde(default)]
    pub effort: Option<String>,
    /// Build status.
    #[serde(default)]
    pub status: Option<String>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A pivot being considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotOption {
    /// Store identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Pivot category, e.g. `customer-segment`.
    pub pivot_type: String,
    /// What would change.
    pub description: String,
    /// Expected impact label.
    #[serde(default)]
    pub potential_impact: Option<String>,
    /// Effort label.
    #[serde(default)]
    pub implementation_effort: Option<String>,
    /// Data backing the pivot.
    #[serde(default)]
    pub evidence: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_status_parsing() {
        assert_eq!(MetricStatus::from_str("ERROR"), Some(MetricStatus::Error));
        assert_eq!(MetricStatus::from_str("at-risk"), Some(MetricStatus::Warning));
        assert_eq!(MetricStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_only_error_is_problematic() {
        assert!(MetricStatus::Error.is_problematic());
        assert!(!MetricStatus::Warning.is_problematic());
        assert!(!MetricStatus::Success.is_problematic());
    }

    #[test]
    fn test_metric_serializes_camel_case() {
        let metric = Metric {
            id: "m1".into(),
            project_id: "p1".into(),
            name: "Signups".into(),
            category: Some("acquisition".into()),
            target: Some(100.0),
            current: Some(12.0),
            unit: None,
            status: MetricStatus::Error,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["status"], "error");
    }
}
