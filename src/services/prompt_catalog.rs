//! Declarative prompt descriptors.
//!
//! One [`PromptDescriptor`] per output shape: the five template kinds, the
//! recommendation pipeline and the insight pipeline. The descriptor names
//! the context sources to fetch and the fields the model must return; a
//! single renderer in [`super::prompt_builder`] turns any of them into an
//! instruction.

use crate::domain::models::ArtifactKind;

/// A store collection that feeds the context bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSource {
    /// Newest experiments.
    Experiments,
    /// Newest completed experiments.
    CompletedExperiments,
    /// Newest hypotheses.
    Hypotheses,
    /// Newest metrics.
    Metrics,
    /// Metrics in error status.
    ProblematicMetrics,
    /// Newest MVP features.
    Features,
    /// Newest pivot options.
    PivotOptions,
}

/// One expected output field: name plus a type or enum description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key.
    pub name: &'static str,
    /// Type or allowed values, as shown to the model.
    pub hint: &'static str,
}

const fn field(name: &'static str, hint: &'static str) -> FieldSpec {
    FieldSpec { name, hint }
}

/// Everything the prompt builder needs to render one pipeline's prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptDescriptor {
    /// Short identifier used in logs and coalescing keys.
    pub name: &'static str,
    /// What the model is asked to produce.
    pub task: &'static str,
    /// Desired number of items.
    pub count: &'static str,
    /// Top-level key holding the item array.
    pub collection: &'static str,
    /// Collections read into the context bundle, in read order.
    pub sources: &'static [ContextSource],
    /// Fields of each item.
    pub fields: &'static [FieldSpec],
    /// Extra top-level keys expected next to the collection.
    pub envelope_fields: &'static [FieldSpec],
    /// Kind-specific advice appended to the instructions.
    pub guidance: &'static [&'static str],
}

const TEMPLATE_ENVELOPE_FIELDS: &[FieldSpec] = &[
    field("suggestedFields", "object: partial pre-fill values keyed by field name"),
    field("adaptationReasoning", "string: how the templates were tailored to this project"),
];

/// Experiment templates.
pub const EXPERIMENT_TEMPLATES: PromptDescriptor = PromptDescriptor {
    name: "experiment-templates",
    task: "experiment templates that test the riskiest open assumptions",
    count: "3-5",
    collection: "templates",
    sources: &[ContextSource::Experiments, ContextSource::Hypotheses],
    fields: &[
        field("title", "string"),
        field("hypothesis", "string: the belief under test"),
        field("method", "string: e.g. customer-interview, landing-page, smoke-test, concierge, a-b-test"),
        field("metrics", "string: what will be measured"),
        field("successCriteria", "string: the threshold that validates the hypothesis"),
        field("duration", "string: e.g. '2 weeks'"),
    ],
    envelope_fields: TEMPLATE_ENVELOPE_FIELDS,
    guidance: &[
        "Do not repeat experiments that already appear in the context.",
        "Prefer cheap, fast experiments before expensive ones.",
    ],
};

/// Hypothesis templates.
pub const HYPOTHESIS_TEMPLATES: PromptDescriptor = PromptDescriptor {
    name: "hypothesis-templates",
    task: "falsifiable hypothesis templates",
    count: "3-5",
    collection: "templates",
    sources: &[ContextSource::Hypotheses, ContextSource::Experiments],
    fields: &[
        field("statement", "string: 'We believe ... will ... because ...'"),
        field("category", "string: problem, solution, customer, value, growth"),
        field("criteria", "string: measurable validation criteria"),
        field("experiment", "string: the experiment that would test it"),
        field("priority", "low|medium|high"),
    ],
    envelope_fields: TEMPLATE_ENVELOPE_FIELDS,
    guidance: &["Each statement must be testable within a few weeks."],
};

/// Growth metric templates.
pub const METRIC_TEMPLATES: PromptDescriptor = PromptDescriptor {
    name: "metric-templates",
    task: "growth metric templates",
    count: "3-5",
    collection: "templates",
    sources: &[ContextSource::Metrics],
    fields: &[
        field("name", "string"),
        field("category", "acquisition|activation|retention|revenue|referral"),
        field("target", "number"),
        field("unit", "string: e.g. %, users, USD"),
        field("description", "string: why this metric matters now"),
    ],
    envelope_fields: TEMPLATE_ENVELOPE_FIELDS,
    guidance: &["Favour actionable metrics over vanity metrics."],
};

/// MVP feature templates.
pub const MVP_FEATURE_TEMPLATES: PromptDescriptor = PromptDescriptor {
    name: "mvp-feature-templates",
    task: "MVP feature templates",
    count: "3-5",
    collection: "templates",
    sources: &[ContextSource::Features, ContextSource::Hypotheses],
    fields: &[
        field("feature", "string"),
        field("priority", "high|medium|low"),
        field("effort", "low|medium|high"),
        field("notes", "string: which hypothesis the feature helps validate"),
    ],
    envelope_fields: TEMPLATE_ENVELOPE_FIELDS,
    guidance: &["Keep the scope minimal: only what is needed to learn."],
};

/// Pivot option templates, drawn from problematic metrics.
pub const PIVOT_OPTION_TEMPLATES: PromptDescriptor = PromptDescriptor {
    name: "pivot-option-templates",
    task: "pivot option templates",
    count: "3-4",
    collection: "templates",
    sources: &[
        ContextSource::PivotOptions,
        ContextSource::ProblematicMetrics,
        ContextSource::Experiments,
    ],
    fields: &[
        field("pivotType", "string: e.g. customer-segment, problem, channel, revenue-model, zoom-in, zoom-out"),
        field("description", "string"),
        field("potentialImpact", "low|medium|high"),
        field("implementationEffort", "low|medium|high"),
        field("evidence", "string: the data that motivates this pivot"),
    ],
    envelope_fields: TEMPLATE_ENVELOPE_FIELDS,
    guidance: &["Ground every option in the problematic metrics or failed experiments."],
};

/// Next-experiment recommendations.
pub const RECOMMENDATIONS: PromptDescriptor = PromptDescriptor {
    name: "experiment-recommendations",
    task: "recommendations for the next experiments to run",
    count: "3-5",
    collection: "recommendations",
    sources: &[ContextSource::Experiments, ContextSource::Hypotheses],
    fields: &[
        field("title", "string"),
        field("description", "string"),
        field("method", "string"),
        field("hypothesis", "string"),
        field("expectedOutcome", "string"),
        field("confidenceScore", "integer 1-10"),
        field("relevanceScore", "integer 1-10"),
        field("difficulty", "easy|medium|hard"),
        field("estimatedDuration", "string"),
        field("category", "string"),
    ],
    envelope_fields: &[],
    guidance: &[
        "Build on what worked in past experiments and avoid what failed.",
        "Score relevance against the current stage.",
    ],
};

/// Insights from completed experiments.
pub const INSIGHTS: PromptDescriptor = PromptDescriptor {
    name: "experiment-insights",
    task: "insights learned from the completed experiments",
    count: "3-5",
    collection: "insights",
    sources: &[ContextSource::CompletedExperiments],
    fields: &[
        field("title", "string"),
        field("description", "string"),
        field("category", "string: e.g. customer, product, market, process"),
        field("confidence", "number 0-100"),
        field("actionItems", "string[]"),
        field("relatedExperiments", "string[]: ids of the experiments the insight draws on"),
        field("tags", "string[]"),
    ],
    envelope_fields: &[],
    guidance: &[
        "Only state insights supported by the recorded results and learnings.",
        "When a focusExperiment is present, centre the analysis on it.",
    ],
};

/// Descriptor for a smart-templates request of `kind`.
pub fn template_descriptor(kind: ArtifactKind) -> &'static PromptDescriptor {
    match kind {
        ArtifactKind::Experiment => &EXPERIMENT_TEMPLATES,
        ArtifactKind::Hypothesis => &HYPOTHESIS_TEMPLATES,
        ArtifactKind::Metric => &METRIC_TEMPLATES,
        ArtifactKind::MvpFeature => &MVP_FEATURE_TEMPLATES,
        ArtifactKind::PivotOption => &PIVOT_OPTION_TEMPLATES,
    }
}

/// Advice for a validation stage; unknown stages get generic guidance.
pub fn stage_guidance(stage: &str) -> &'static str {
    match stage.trim().to_lowercase().replace('_', "-").as_str() {
        "ideation" | "idea" => "The team is still shaping the idea; focus on discovering whether the problem exists.",
        "problem-validation" | "problem" => {
            "Focus on confirming the problem is real and painful for the target segment."
        }
        "solution-validation" | "solution" => {
            "Focus on whether the proposed solution addresses the validated problem."
        }
        "mvp" | "build" => "Focus on the smallest product that delivers the core value and produces learning.",
        "product-market-fit" | "pmf" => "Focus on retention and willingness to pay across the core segment.",
        "scale" | "scaling" | "growth" => "Focus on repeatable acquisition channels and unit economics.",
        "acquisition" => "Focus on how users discover the product and which channels convert.",
        "activation" => "Focus on the first-use experience and the moment users reach value.",
        "retention" => "Focus on why users come back and what makes them churn.",
        "revenue" => "Focus on pricing, conversion to paid and revenue per user.",
        "referral" => "Focus on what makes users recommend the product.",
        _ => "Tailor the suggestions to the project's current validation stage.",
    }
}
