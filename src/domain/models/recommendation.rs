//! Experiment recommendations and the pattern summary computed alongside them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How hard a recommended experiment is to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    /// Days, little setup.
    Easy,
    /// Some build or recruiting effort.
    Medium,
    /// Significant investment.
    Hard,
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "low" => Ok(Self::Easy),
            "medium" | "moderate" => Ok(Self::Medium),
            "hard" | "high" => Ok(Self::Hard),
            other => Err(format!("invalid difficulty '{other}'")),
        }
    }
}

/// A model-suggested next experiment. Never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Short name.
    pub title: String,
    /// What to do.
    pub description: String,
    /// Validation method.
    #[serde(default)]
    pub method: String,
    /// Hypothesis it tests.
    #[serde(default)]
    pub hypothesis: String,
    /// Expected result; becomes the draft's success criteria.
    #[serde(default)]
    pub expected_outcome: String,
    /// Model confidence, within [`Self::SCORE_RANGE`].
    pub confidence_score: u8,
    /// Fit with the current stage, within [`Self::SCORE_RANGE`].
    pub relevance_score: u8,
    /// How hard it is to run.
    pub difficulty: Difficulty,
    /// Suggested run length.
    #[serde(default)]
    pub estimated_duration: String,
    /// Grouping label.
    #[serde(default)]
    pub category: String,
}

impl Recommendation {
    /// Valid range for both scores.
    pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

    /// Decode one model-produced item, rejecting empty titles and out-of-range scores.
    pub fn decode(value: serde_json::Value) -> Result<Self, String> {
        let rec: Self = serde_json::from_value(value).map_err(|e| e.to_string())?;
        if rec.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        for (label, score) in [
            ("confidenceScore", rec.confidence_score),
            ("relevanceScore", rec.relevance_score),
        ] {
            if !Self::SCORE_RANGE.contains(&score) {
                return Err(format!("{label} {score} outside 1-10"));
            }
        }
        Ok(rec)
    }
}

/// Counts derived from a project's recent experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    /// Methods of completed experiments, most frequent first.
    pub successful_methods: Vec<String>,
    /// Experiment count per category.
    pub common_categories: BTreeMap<String, u32>,
    /// Percentage of experiments in completed status, 0-100.
    pub completion_rate: f64,
}
