use super::weights::Sentiment;
use serde::{Deserialize, Serialize};

/// Per-class confidence reported alongside a sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Map a sentiment label and its confidence scores to an urgency in [0, 1].
///
/// The label picks the band and the confidence picks the position inside it:
///
/// | label              | urgency                    |
/// |--------------------|----------------------------|
/// | negative           | 0.60 + 0.40 * P(negative)  |
/// | mixed              | 0.40 + 0.30 * P(negative)  |
/// | neutral / positive | 0.20 + 0.30 * P(positive)  |
///
/// Labels the provider invents are treated like neutral.
pub fn urgency_from_confidence(sentiment: Sentiment, scores: &ConfidenceScores) -> f64 {
    let urgency = match sentiment {
        Sentiment::Negative => 0.60 + 0.40 * unit(scores.negative),
        Sentiment::Mixed => 0.40 + 0.30 * unit(scores.negative),
        Sentiment::Neutral | Sentiment::Positive | Sentiment::Unrecognized => {
            0.20 + 0.30 * unit(scores.positive)
        }
    };
    urgency.clamp(0.0, 1.0)
}

// Confidence scores are probabilities; anything else is provider noise.
fn unit(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
