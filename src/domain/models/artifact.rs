//! Artifact kinds a smart template can be generated for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of suggestion being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// An experiment to run.
    Experiment,
    /// A hypothesis to test.
    Hypothesis,
    /// A growth metric to track.
    Metric,
    /// A candidate MVP feature.
    MvpFeature,
    /// A pivot to consider.
    PivotOption,
}

impl ArtifactKind {
    /// Every kind, in prompt-catalog order.
    pub const ALL: [ArtifactKind; 5] = [
        Self::Experiment,
        Self::Hypothesis,
        Self::Metric,
        Self::MvpFeature,
        Self::PivotOption,
    ];

    /// Wire name, as accepted in `templateType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experiment => "experiment",
            Self::Hypothesis => "hypothesis",
            Self::Metric => "metric",
            Self::MvpFeature => "mvp-feature",
            Self::PivotOption => "pivot-option",
        }
    }

    /// Parse a `templateType` value. Short aliases `feature` and `pivot` are accepted.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "experiment" => Some(Self::Experiment),
            "hypothesis" => Some(Self::Hypothesis),
            "metric" => Some(Self::Metric),
            "mvp-feature" | "feature" => Some(Self::MvpFeature),
            "pivot-option" | "pivot" => Some(Self::PivotOption),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_aliases_and_unknown() {
        assert_eq!(ArtifactKind::from_str("MVP_FEATURE"), Some(ArtifactKind::MvpFeature));
        assert_eq!(ArtifactKind::from_str(" pivot "), Some(ArtifactKind::PivotOption));
        assert_eq!(ArtifactKind::from_str("persona"), None);
    }

    #[test]
    fn test_kind_serde_matches_as_str() {
        let json = serde_json::to_string(&ArtifactKind::PivotOption).unwrap();
        assert_eq!(json, "\"pivot-option\"");
    }
}
