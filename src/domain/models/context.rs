//! The per-request context bundle handed to the prompt builder.

use serde::Serialize;
use serde_json::{Map, Value};

use super::experiment::Experiment;
use super::project::Project;
use super::records::{Hypothesis, Metric, MvpFeature, PivotOption};

/// Read-only snapshot of project state assembled for one request.
///
/// Collections unrelated to the requested artifact stay empty. `overrides`
/// holds the caller-supplied context, applied last by [`ContextBundle::to_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBundle {
    /// Project name.
    pub project_name: String,
    /// Project description, empty when unset.
    pub project_description: String,
    /// Problem statement, empty when unset.
    pub problem_statement: String,
    /// Customer segments, empty when unset.
    pub customer_segments: String,
    /// Effective validation stage.
    pub stage: String,
    /// Newest experiments, bounded.
    pub recent_experiments: Vec<Experiment>,
    /// Newest hypotheses, bounded.
    pub recent_hypotheses: Vec<Hypothesis>,
    /// Newest metrics, bounded.
    pub recent_metrics: Vec<Metric>,
    /// Newest MVP features, bounded.
    pub recent_features: Vec<MvpFeature>,
    /// Newest pivot options, bounded.
    pub recent_pivot_options: Vec<PivotOption>,
    /// Metrics in error status.
    pub problematic_metrics: Vec<Metric>,
    /// Caller-supplied keys merged over the rendered bundle.
    #[serde(skip)]
    pub overrides: Map<String, Value>,
}

impl ContextBundle {
    /// Seed a bundle from the project row. An explicit stage wins over the stored one.
    pub fn for_project(project: &Project, stage: Option<&str>) -> Self {
        let stage = stage
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| project.stage.clone())
            .unwrap_or_default();

        Self {
            project_name: project.name.clone(),
            project_description: project.description.clone().unwrap_or_default(),
            problem_statement: project.problem_statement.clone().unwrap_or_default(),
            customer_segments: project.customer_segments.clone().unwrap_or_default(),
            stage,
            ..Self::default()
        }
    }

    /// Attach caller overrides.
    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Render as a JSON object, then shallow-merge the overrides on top.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (key, value) in &self.overrides {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}
