//! Rule-based risk scoring.
//!
//! Everything in here is synchronous and total: no function in this module
//! returns an error or touches I/O. The async pipeline in
//! [`crate::services::pipeline`] feeds it signals and persists what it returns.

pub mod risk;
pub mod urgency;
pub mod weights;

pub use risk::{calculate_risk_score, round2, RiskLevel};
pub use urgency::{urgency_from_confidence, ConfidenceScores};
pub use weights::{Category, Sentiment, Severity};

/// Keyword sentinel when the extraction pipeline failed before any analysis completed.
pub const KEYWORDS_ERROR: &str = "error_processing";
/// Keyword sentinel when analysis ran but found no phrases.
pub const KEYWORDS_NONE: &str = "no_keywords_detected";

pub const DEFAULT_SENTIMENT: &str = "neutral";
pub const DEFAULT_URGENCY: f64 = 0.50;
pub const DEFAULT_RISK_SCORE: f64 = 50.00;
pub const DEFAULT_RISK_LEVEL: RiskLevel = RiskLevel::Medium;
