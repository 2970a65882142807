//! Fixed-shape response envelopes.
//!
//! Every key is always present, whether the model succeeded, returned nothing,
//! or failed. `degraded` is set only when the model step failed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::insight::Insight;
use super::recommendation::{PatternSummary, Recommendation};
use super::template::Template;

/// Response of the smart-templates pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEnvelope {
    /// Decoded templates of the requested kind.
    pub templates: Vec<Template>,
    /// Field values the form should pre-fill.
    pub suggested_fields: Map<String, Value>,
    /// Why the templates fit this project.
    pub adaptation_reasoning: String,
    /// Set when the model step failed.
    pub degraded: bool,
}

impl TemplateEnvelope {
    /// Empty envelope for a failed model step.
    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }
}

/// Response of the recommendations pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEnvelope {
    /// Decoded recommendations.
    pub recommendations: Vec<Recommendation>,
    /// `None` below three experiments.
    pub patterns: Option<PatternSummary>,
    /// Set when the model step failed.
    #[serde(default)]
    pub degraded: bool,
}

/// Response of the insights pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightEnvelope {
    /// Decoded insights.
    pub insights: Vec<Insight>,
    /// Informational message; not a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the model step failed.
    #[serde(default)]
    pub degraded: bool,
}

impl InsightEnvelope {
    /// Message returned when no experiment has completed.
    pub const NO_COMPLETED_EXPERIMENTS: &'static str = "No completed experiments found";

    /// The 200 response for a project with nothing to learn from yet.
    pub fn no_completed_experiments() -> Self {
        Self {
            insights: Vec::new(),
            error: Some(Self::NO_COMPLETED_EXPERIMENTS.to_string()),
            degraded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_template_envelope_keys() {
        let json = serde_json::to_value(TemplateEnvelope::degraded()).unwrap();
        assert_eq!(json["templates"], json!([]));
        assert_eq!(json["suggestedFields"], json!({}));
        assert_eq!(json["adaptationReasoning"], json!(""));
        assert_eq!(json["degraded"], json!(true));
    }

    #[test]
    fn test_recommendation_envelope_null_patterns() {
        let json = serde_json::to_value(RecommendationEnvelope::default()).unwrap();
        assert_eq!(json["recommendations"], json!([]));
        assert!(json["patterns"].is_null());
    }

    #[test]
    fn test_no_completed_experiments_envelope() {
        let json = serde_json::to_value(InsightEnvelope::no_completed_experiments()).unwrap();
        assert_eq!(json["error"], "No completed experiments found");
        assert_eq!(json["insights"], json!([]));
    }
}
