//! Renders a prompt descriptor and a context object into one instruction.

use serde_json::{Map, Value};

use crate::domain::ports::CompletionRequest;
use crate::services::prompt_catalog::{stage_guidance, FieldSpec, PromptDescriptor};

/// System message sent with every request.
pub const SYSTEM_MESSAGE: &str =
    "You are an experienced lean startup advisor. You always answer with a single valid JSON object.";

/// Build the user instruction for `descriptor`.
///
/// Deterministic: the same descriptor, stage and context always render the
/// same text.
pub fn render(descriptor: &PromptDescriptor, stage: &str, context: &Map<String, Value>) -> String {
    let context_text = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    let stage_text = if stage.trim().is_empty() { "unspecified" } else { stage };

    let guidance_text = descriptor
        .guidance
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate {count} {task} for the project below.

## Project Context
{context_text}

## Current Stage
{stage_text}: {stage_advice}

## Instructions
{guidance_text}

## Required Output Format (JSON)
{shape}

IMPORTANT: Output ONLY the JSON object, no other text."#,
        count = descriptor.count,
        task = descriptor.task,
        stage_advice = stage_guidance(stage),
        shape = render_shape(descriptor),
    )
}

/// Sampling temperature for every pipeline.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Full upstream request for one pipeline call.
pub fn build_request(descriptor: &PromptDescriptor, stage: &str, context: &Map<String, Value>) -> CompletionRequest {
    CompletionRequest::new(SYSTEM_MESSAGE, render(descriptor, stage, context), SAMPLING_TEMPERATURE)
}

fn render_shape(descriptor: &PromptDescriptor) -> String {
    let mut lines = vec!["{".to_string(), format!("  \"{}\": [", descriptor.collection), "    {".to_string()];
    lines.push(render_fields(descriptor.fields, "      "));
    lines.push("    }".to_string());

    if descriptor.envelope_fields.is_empty() {
        lines.push("  ]".to_string());
    } else {
        lines.push("  ],".to_string());
        lines.push(render_fields(descriptor.envelope_fields, "  "));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn render_fields(fields: &[FieldSpec], indent: &str) -> String {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let comma = if i + 1 < fields.len() { "," } else { "" };
            format!("{indent}\"{}\": \"<{}>\"{comma}", f.name, f.hint)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
