//! Task classification → compute tier
//!
//! | label      | classification | tier   | default machine type |
//! |------------|----------------|--------|----------------------|
//! | `simple`   | `Simple`       | Small  | n1-standard-1        |
//! | `moderate` | `Moderate`     | Medium | n1-standard-4        |
//! | `complex`  | `Complex`      | Large  | n1-highmem-8         |
//!
//! Any other label falls back to `Simple`/`Small`. Classification never fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Coarse size of a compute task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskClassification {
    #[default]
    Simple,
    Moderate,
    Complex,
}

/// Label that is not one of `simple`, `moderate`, `complex`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized task classification: {0:?}")]
pub struct UnrecognizedClassification(pub String);

impl TaskClassification {
    /// Label as accepted by `FromStr`
    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }

    /// Tier provisioned for this classification
    pub fn tier(self) -> ComputeTier {
        match self {
            Self::Simple => ComputeTier::Small,
            Self::Moderate => ComputeTier::Medium,
            Self::Complex => ComputeTier::Large,
        }
    }
}

impl FromStr for TaskClassification {
    type Err = UnrecognizedClassification;

    /// Exact, case-sensitive match on the label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            other => Err(UnrecognizedClassification(other.to_string())),
        }
    }
}

impl fmt::Display for TaskClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Provisioning size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeTier {
    #[default]
    Small,
    Medium,
    Large,
}

impl fmt::Display for ComputeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeTier::Small => write!(f, "small"),
            ComputeTier::Medium => write!(f, "medium"),
            ComputeTier::Large => write!(f, "large"),
        }
    }
}

/// Machine type for each tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineTypes {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Default for MachineTypes {
    fn default() -> Self {
        Self {
            small: "n1-standard-1".to_string(),
            medium: "n1-standard-4".to_string(),
            large: "n1-highmem-8".to_string(),
        }
    }
}

impl MachineTypes {
    /// Machine type provisioned for `tier`
    pub fn for_tier(&self, tier: ComputeTier) -> &str {
        match tier {
            ComputeTier::Small => &self.small,
            ComputeTier::Medium => &self.medium,
            ComputeTier::Large => &self.large,
        }
    }
}

/// Parse a label leniently: unknown labels become the default classification.
pub fn classify_label(task_type: &str) -> TaskClassification {
    task_type.parse().unwrap_or_else(|e: UnrecognizedClassification| {
        warn!("{}; using {}", e, TaskClassification::default());
        TaskClassification::default()
    })
}

/// Compute tier for a task-size label. Never fails.
pub fn classify(task_type: &str) -> ComputeTier {
    classify_label(task_type).tier()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(classify("simple"), ComputeTier::Small);
        assert_eq!(classify("moderate"), ComputeTier::Medium);
        assert_eq!(classify("complex"), ComputeTier::Large);
    }

    #[test]
    fn test_unknown_labels_default_to_small() {
        for label in ["", "huge", "Moderate", " simple", "complex ", "🚀"] {
            assert_eq!(classify(label), ComputeTier::Small, "label {:?}", label);
        }
    }

    #[test]
    fn test_from_str_reports_label() {
        let err = "gigantic".parse::<TaskClassification>().unwrap_err();
        assert_eq!(err, UnrecognizedClassification("gigantic".to_string()));
    }

    #[test]
    fn test_label_roundtrip() {
        for class in [
            TaskClassification::Simple,
            TaskClassification::Moderate,
            TaskClassification::Complex,
        ] {
            assert_eq!(class.label().parse::<TaskClassification>().unwrap(), class);
        }
    }

    #[test]
    fn test_default_machine_types() {
        let types = MachineTypes::default();
        assert_eq!(types.for_tier(ComputeTier::Small), "n1-standard-1");
        assert_eq!(types.for_tier(classify("moderate")), "n1-standard-4");
        assert_eq!(types.for_tier(ComputeTier::Large), "n1-highmem-8");
    }

    #[test]
    fn test_machine_types_partial_override() {
        let types: MachineTypes = toml::from_str(r#"large = "n2-highmem-16""#).unwrap();
        assert_eq!(types.small, "n1-standard-1");
        assert_eq!(types.large, "n2-highmem-16");
    }
}
