//! Domain models for lean-advisor.

pub mod artifact;
pub mod config;
pub mod context;
pub mod envelope;
pub mod experiment;
pub mod insight;
pub mod project;
pub mod recommendation;
pub mod records;
pub mod template;

pub use artifact::ArtifactKind;
pub use config::{
    Config, LoggingConfig, ModelConfig, PipelineConfig, ServerConfig, StoreBackend, StoreConfig,
};
pub use context::ContextBundle;
pub use envelope::{InsightEnvelope, RecommendationEnvelope, TemplateEnvelope};
pub use experiment::{Experiment, ExperimentStatus};
pub use insight::Insight;
pub use project::Project;
pub use recommendation::{Difficulty, PatternSummary, Recommendation};
pub use records::{Hypothesis, Metric, MetricStatus, MvpFeature, PivotOption};
pub use template::{
    ExperimentTemplate, HypothesisTemplate, Level, MetricCategory, MetricTemplate,
    MvpFeatureTemplate, PivotOptionTemplate, Template,
};
