//! Smart template shapes, one per artifact kind.
//!
//! Model output is decoded into these typed shapes before it reaches a caller.
//! Enum-valued fields parse case-insensitively; anything else fails the decode
//! and the item is dropped by the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::artifact::ArtifactKind;

/// Three-step scale used for priority, effort and impact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Level {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl Level {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" | "moderate" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("invalid level '{other}'")),
        }
    }
}

/// Pirate-metrics funnel stage a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MetricCategory {
    /// Getting users in.
    Acquisition,
    /// First value delivered.
    Activation,
    /// Users coming back.
    Retention,
    /// Users paying.
    Revenue,
    /// Users bringing others.
    Referral,
}

impl TryFrom<String> for MetricCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "acquisition" => Ok(Self::Acquisition),
            "activation" => Ok(Self::Activation),
            "retention" => Ok(Self::Retention),
            "revenue" => Ok(Self::Revenue),
            "referral" => Ok(Self::Referral),
            other => Err(format!("invalid metric category '{other}'")),
        }
    }
}

/// Suggested experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentTemplate {
    /// Short name.
    pub title: String,
    /// Hypothesis under test.
    pub hypothesis: String,
    /// Validation method.
    pub method: String,
    /// Metrics to watch.
    #[serde(default)]
    pub metrics: String,
    /// What counts as a pass.
    #[serde(default)]
    pub success_criteria: String,
    /// Suggested run length.
    #[serde(default)]
    pub duration: String,
}

/// Suggested hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisTemplate {
    /// The assumption.
    pub statement: String,
    /// Hypothesis category.
    #[serde(default)]
    pub category: String,
    /// Validation criteria.
    #[serde(default)]
    pub criteria: String,
    /// Experiment that would test it.
    #[serde(default)]
    pub experiment: String,
    /// Priority, when given.
    #[serde(default)]
    pub priority: Option<Level>,
}

/// Suggested growth metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTemplate {
    /// Metric name.
    pub name: String,
    /// Funnel stage.
    pub category: MetricCategory,
    /// Target value, number or text as the model gave it.
    #[serde(default)]
    pub target: Option<Value>,
    /// Unit label.
    #[serde(default)]
    pub unit: String,
    /// What the metric measures.
    #[serde(default)]
    pub description: String,
}

/// Suggested MVP feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpFeatureTemplate {
    /// Feature name.
    pub feature: String,
    /// Priority.
    pub priority: Level,
    /// Effort.
    pub effort: Level,
    /// Notes.
    #[serde(default)]
    pub notes: String,
}

/// Suggested pivot option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotOptionTemplate {
    /// Pivot category.
    pub pivot_type: String,
    /// What would change.
    pub description: String,
    /// Expected impact.
    #[serde(default)]
    pub potential_impact: Option<Level>,
    /// Effort to carry out.
    #[serde(default)]
    pub implementation_effort: Option<Level>,
    /// Data supporting the pivot.
    #[serde(default)]
    pub evidence: String,
}

/// A decoded template, serialized as the flat record of its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Template {
    /// Experiment shape.
    Experiment(ExperimentTemplate),
    /// Hypothesis shape.
    Hypothesis(HypothesisTemplate),
    /// Metric shape.
    Metric(MetricTemplate),
    /// MVP feature shape.
    MvpFeature(MvpFeatureTemplate),
    /// Pivot option shape.
    PivotOption(PivotOptionTemplate),
}

impl Template {
    /// Decode one model-produced item as the shape for `kind`.
    pub fn decode(kind: ArtifactKind, value: Value) -> Result<Self, String> {
        let template = match kind {
            ArtifactKind::Experiment => Self::Experiment(from_value(value)?),
            ArtifactKind::Hypothesis => Self::Hypothesis(from_value(value)?),
            ArtifactKind::Metric => Self::Metric(from_value(value)?),
            ArtifactKind::MvpFeature => Self::MvpFeature(from_value(value)?),
            ArtifactKind::PivotOption => Self::PivotOption(from_value(value)?),
        };
        let (label, text) = template.headline();
        if text.trim().is_empty() {
            return Err(format!("{label} is empty"));
        }
        Ok(template)
    }

    /// Artifact kind this template was decoded as.
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Experiment(_) => ArtifactKind::Experiment,
            Self::Hypothesis(_) => ArtifactKind::Hypothesis,
            Self::Metric(_) => ArtifactKind::Metric,
            Self::MvpFeature(_) => ArtifactKind::MvpFeature,
            Self::PivotOption(_) => ArtifactKind::PivotOption,
        }
    }

    /// The field that identifies the template, with its name.
    pub fn headline(&self) -> (&'static str, &str) {
        match self {
            Self::Experiment(t) => ("title", &t.title),
            Self::Hypothesis(t) => ("statement", &t.statement),
            Self::Metric(t) => ("name", &t.name),
            Self::MvpFeature(t) => ("feature", &t.feature),
            Self::PivotOption(t) => ("description", &t.description),
        }
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}
