//! One-shot pipeline commands: `recommend`, `templates`, `insights`.

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value};

use super::build_advisor;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{ArtifactKind, Config, InsightEnvelope, RecommendationEnvelope, TemplateEnvelope};
use crate::services::{InsightRequest, RecommendationRequest, TemplateRequest};

const DEGRADED_NOTE: &str = "(model unavailable, showing empty result)";

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Project id
    #[arg(long)]
    pub project: String,

    /// Requesting user id
    #[arg(long)]
    pub user: String,

    /// Validation stage (defaults to the project's stage)
    #[arg(long)]
    pub stage: Option<String>,

    /// Answer the model call with empty output
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Project id
    #[arg(long)]
    pub project: String,

    /// Requesting user id
    #[arg(long)]
    pub user: String,

    /// experiment, hypothesis, metric, mvp-feature or pivot-option
    #[arg(short, long, value_parser = parse_kind)]
    pub kind: ArtifactKind,

    /// Validation stage (defaults to the project's stage)
    #[arg(long)]
    pub stage: Option<String>,

    /// JSON object merged over the fetched context
    #[arg(long, value_parser = parse_context)]
    pub context: Option<Map<String, Value>>,

    /// Answer the model call with empty output
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args, Debug)]
pub struct InsightsArgs {
    /// Project id
    #[arg(long)]
    pub project: String,

    /// Requesting user id
    #[arg(long)]
    pub user: String,

    /// Focus the analysis on one experiment
    #[arg(long)]
    pub experiment: Option<String>,

    /// Answer the model call with empty output
    #[arg(long)]
    pub offline: bool,
}

fn parse_kind(value: &str) -> Result<ArtifactKind, String> {
    ArtifactKind::from_str(value).ok_or_else(|| {
        let valid: Vec<&str> = ArtifactKind::ALL.iter().map(ArtifactKind::as_str).collect();
        format!("unknown kind '{value}', expected one of: {}", valid.join(", "))
    })
}

fn parse_context(value: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("context must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

impl CommandOutput for RecommendationEnvelope {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.recommendations.is_empty() {
            lines.push("No recommendations generated".to_string());
            if self.degraded {
                lines.push(DEGRADED_NOTE.to_string());
            }
        }
        for (i, rec) in self.recommendations.iter().enumerate() {
            lines.push(format!(
                "{}. {} [{}, {:?}, confidence {}/10]",
                i + 1,
                rec.title,
                rec.method,
                rec.difficulty,
                rec.confidence_score
            ));
            lines.push(format!("   {}", truncate(&rec.description, 100)));
        }
        match &self.patterns {
            Some(patterns) => lines.push(format!(
                "\nCompletion rate {}%; successful methods: {}",
                patterns.completion_rate,
                patterns.successful_methods.join(", ")
            )),
            None => lines.push("\nNot enough experiments for pattern analysis".to_string()),
        }
        lines.join("\n")
    }
}

impl CommandOutput for TemplateEnvelope {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.templates.is_empty() {
            lines.push("No templates generated".to_string());
            if self.degraded {
                lines.push(DEGRADED_NOTE.to_string());
            }
        }
        for (i, template) in self.templates.iter().enumerate() {
            let (_, headline) = template.headline();
            lines.push(format!("{}. [{}] {}", i + 1, template.kind(), truncate(headline, 100)));
        }
        if !self.suggested_fields.is_empty() {
            let keys: Vec<&str> = self.suggested_fields.keys().map(String::as_str).collect();
            lines.push(format!("\nSuggested fields: {}", keys.join(", ")));
        }
        if !self.adaptation_reasoning.is_empty() {
            lines.push(format!("\n{}", self.adaptation_reasoning));
        }
        lines.join("\n")
    }
}

impl CommandOutput for InsightEnvelope {
    fn to_human(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        if self.insights.is_empty() {
            return if self.degraded {
                format!("No insights generated {DEGRADED_NOTE}")
            } else {
                "No insights generated".to_string()
            };
        }
        self.insights
            .iter()
            .enumerate()
            .map(|(i, insight)| {
                let mut entry = format!("{}. {} ({:.0}% confidence)", i + 1, insight.title, insight.confidence);
                for item in &insight.action_items {
                    entry.push_str(&format!("\n   - {item}"));
                }
                entry
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run the recommendations pipeline once and print the envelope.
pub async fn recommend(args: RecommendArgs, config: &Config, json_mode: bool) -> Result<()> {
    let advisor = build_advisor(config, args.offline).await?;
    let envelope = advisor
        .recommendations
        .recommend(RecommendationRequest {
            project_id: args.project,
            user_id: args.user,
            current_stage: args.stage,
        })
        .await?;
    output(&envelope, json_mode);
    Ok(())
}

/// Run the smart-templates pipeline once and print the envelope.
pub async fn templates(args: TemplatesArgs, config: &Config, json_mode: bool) -> Result<()> {
    let advisor = build_advisor(config, args.offline).await?;
    let envelope = advisor
        .templates
        .generate(TemplateRequest {
            project_id: args.project,
            user_id: args.user,
            kind: args.kind,
            stage: args.stage,
            context: args.context.unwrap_or_default(),
        })
        .await?;
    output(&envelope, json_mode);
    Ok(())
}

/// Run the insights pipeline once and print the envelope.
pub async fn insights(args: InsightsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let advisor = build_advisor(config, args.offline).await?;
    let envelope = advisor
        .insights
        .analyze(InsightRequest {
            project_id: args.project,
            user_id: args.user,
            experiment_id: args.experiment,
        })
        .await?;
    output(&envelope, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PatternSummary;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("mvp-feature"), Ok(ArtifactKind::MvpFeature));
        assert!(parse_kind("persona").unwrap_err().contains("pivot-option"));
    }

    #[test]
    fn test_parse_context() {
        assert_eq!(parse_context(r#"{"audience":"agencies"}"#).unwrap()["audience"], "agencies");
        assert!(parse_context("[1,2]").is_err());
        assert!(parse_context("{").is_err());
    }

    #[test]
    fn test_human_output() {
        let degraded = TemplateEnvelope::degraded();
        assert!(degraded.to_human().contains("model unavailable"));

        let envelope = RecommendationEnvelope {
            recommendations: Vec::new(),
            patterns: Some(PatternSummary {
                successful_methods: vec!["interview".to_string()],
                common_categories: BTreeMap::new(),
                completion_rate: 66.7,
            }),
            degraded: false,
        };
        assert!(envelope.to_human().contains("Completion rate 66.7%"));

        assert_eq!(
            InsightEnvelope::no_completed_experiments().to_human(),
            "No completed experiments found"
        );
    }
}
