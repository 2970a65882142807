//! Render state for a suggestion panel, and promotion of a suggestion into
//! a pre-filled create-flow draft.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ClientError;
use crate::domain::models::{
    ArtifactKind, InsightEnvelope, Recommendation, RecommendationEnvelope, Template, TemplateEnvelope,
};

/// Envelopes a panel can render.
pub trait PanelContent {
    fn is_empty(&self) -> bool;

    /// Whether the server emptied the result after a model failure.
    fn is_degraded(&self) -> bool;
}

impl PanelContent for TemplateEnvelope {
    fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl PanelContent for RecommendationEnvelope {
    fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl PanelContent for InsightEnvelope {
    fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// What a panel shows. A failed fetch stays in `Error` until the user asks again.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    /// Fetch in progress.
    Loading,
    /// Nothing to show; `degraded` separates a model outage from a genuine blank.
    Empty { degraded: bool },
    /// Fetch failed; the message is shown as is.
    Error(String),
    /// Content to render.
    Populated(T),
}

impl<T: PanelContent> PanelState<T> {
    /// State after a fetch resolves.
    pub fn from_outcome(outcome: Result<T, ClientError>) -> Self {
        match outcome {
            Ok(content) if content.is_empty() => Self::Empty {
                degraded: content.is_degraded(),
            },
            Ok(content) => Self::Populated(content),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

impl<T> PanelState<T> {
    /// Whether a fetch is in progress.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error message, in the `Error` state.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Rendered content, in the `Populated` state.
    pub fn content(&self) -> Option<&T> {
        match self {
            Self::Populated(content) => Some(content),
            _ => None,
        }
    }
}

/// Field values handed to the create form for one artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDraft {
    /// Kind of artifact the form creates.
    pub kind: ArtifactKind,
    /// Pre-filled values keyed by field name.
    pub fields: Map<String, Value>,
}

/// Draft from a template, with `suggested_fields` layered over its own fields.
pub fn promote_template(template: &Template, suggested_fields: &Map<String, Value>) -> ArtifactDraft {
    let mut fields = match serde_json::to_value(template) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in suggested_fields {
        fields.insert(key.clone(), value.clone());
    }
    ArtifactDraft {
        kind: template.kind(),
        fields,
    }
}

/// Experiment draft from a recommendation.
pub fn promote_recommendation(recommendation: &Recommendation) -> ArtifactDraft {
    let mut fields = Map::new();
    for (key, value) in [
        ("title", &recommendation.title),
        ("description", &recommendation.description),
        ("method", &recommendation.method),
        ("hypothesis", &recommendation.hypothesis),
        ("successCriteria", &recommendation.expected_outcome),
        ("duration", &recommendation.estimated_duration),
    ] {
        if !value.trim().is_empty() {
            fields.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    ArtifactDraft {
        kind: ArtifactKind::Experiment,
        fields,
    }
}
