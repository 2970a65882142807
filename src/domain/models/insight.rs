//! Insights distilled from completed experiments.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A learning drawn from completed experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Assigned locally when the model omits one.
    #[serde(default)]
    pub id: String,
    /// Headline.
    pub title: String,
    /// Explanation.
    pub description: String,
    /// Grouping label.
    #[serde(default)]
    pub category: String,
    /// Confidence percentage, 0-100.
    pub confidence: f64,
    /// Concrete next steps.
    #[serde(default)]
    pub action_items: Vec<String>,
    /// Ids of the experiments it draws on.
    #[serde(default)]
    pub related_experiments: Vec<String>,
    /// Free tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Insight {
    /// Decode one model-produced item, filling in a missing id.
    pub fn decode(value: serde_json::Value) -> Result<Self, String> {
        let mut insight: Self = serde_json::from_value(value).map_err(|e| e.to_string())?;
        if insight.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if !(0.0..=100.0).contains(&insight.confidence) {
            return Err(format!("confidence {} outside 0-100", insight.confidence));
        }
        if insight.id.trim().is_empty() {
            insight.id = Uuid::new_v4().to_string();
        }
        Ok(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_assigns_id() {
        let insight = Insight::decode(json!({
            "title": "Price is not the blocker",
            "description": "Both pricing tests converted equally",
            "confidence": 72,
            "actionItems": ["Test onboarding instead"]
        }))
        .unwrap();
        assert!(Uuid::parse_str(&insight.id).is_ok());
        assert_eq!(insight.action_items.len(), 1);
        assert!(insight.tags.is_empty());
    }

    #[test]
    fn test_decode_keeps_model_id() {
        let insight = Insight::decode(json!({
            "id": "insight-1", "title": "t", "description": "d", "confidence": 50
        }))
        .unwrap();
        assert_eq!(insight.id, "insight-1");
    }

    #[test]
    fn test_decode_rejects_bad_confidence() {
        let result = Insight::decode(json!({"title": "t", "description": "d", "confidence": 140}));
        assert!(result.is_err());
    }
}
