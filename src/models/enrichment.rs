use crate::scoring::{
    RiskLevel, DEFAULT_RISK_LEVEL, DEFAULT_RISK_SCORE, DEFAULT_SENTIMENT, DEFAULT_URGENCY,
    KEYWORDS_ERROR,
};

/// Fields derived for a report by one pipeline run. Always fully populated.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichmentResult {
    pub keywords: String,
    pub sentiment: String,
    pub urgency_score: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

impl Default for EnrichmentResult {
    fn default() -> Self {
        Self {
            keywords: KEYWORDS_ERROR.to_string(),
            sentiment: DEFAULT_SENTIMENT.to_string(),
            urgency_score: DEFAULT_URGENCY,
            risk_score: DEFAULT_RISK_SCORE,
            risk_level: DEFAULT_RISK_LEVEL,
        }
    }
}
