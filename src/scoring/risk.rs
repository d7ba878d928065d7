use super::weights::{parse_label, Category, Sentiment, Severity};
use super::DEFAULT_URGENCY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub const MAX_RISK_SCORE: f64 = 100.0;
pub const URGENCY_WEIGHT: f64 = 30.0;

const HIGH_THRESHOLD: f64 = 70.0;
const MEDIUM_THRESHOLD: f64 = 40.0;

/// Discrete risk classification derived from a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Lower bound of each band is inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// Fuse report metadata and text signals into a risk score in [0, 100].
///
/// ```text
/// score = severity weight (High 40, Medium 25, Low 10, other 10)
///       + category weight (Health 30, Environmental 25, Safety 20,
///                          Infrastructure 15, Social 10, other 10)
///       + urgency * 30
///       + sentiment weight (negative 10, mixed 5, neutral 0, positive -5, other 0)
/// ```
///
/// Total over every input: urgency is clamped to [0, 1] (NaN reads as the
/// neutral default) and the sum is clamped to [0, 100].
pub fn calculate_risk_score(category: &str, severity: &str, urgency: f64, sentiment: &str) -> f64 {
    let urgency = if urgency.is_nan() {
        DEFAULT_URGENCY
    } else {
        urgency.clamp(0.0, 1.0)
    };

    let score = parse_label::<Severity>(severity).weight()
        + parse_label::<Category>(category).weight()
        + urgency * URGENCY_WEIGHT
        + parse_label::<Sentiment>(sentiment).weight();

    score.clamp(0.0, MAX_RISK_SCORE)
}

/// Round to two decimal places, the precision scores are stored and reported at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
