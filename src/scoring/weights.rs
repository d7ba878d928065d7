use std::str::FromStr;

/// Weight used for any category or severity outside the known tables.
pub const FALLBACK_WEIGHT: f64 = 10.0;

const SEVERITY_WEIGHTS: &[(Severity, f64)] = &[
    (Severity::High, 40.0),
    (Severity::Medium, 25.0),
    (Severity::Low, 10.0),
];

const CATEGORY_WEIGHTS: &[(Category, f64)] = &[
    (Category::Health, 30.0),
    (Category::Environmental, 25.0),
    (Category::Safety, 20.0),
    (Category::Infrastructure, 15.0),
    (Category::Social, 10.0),
];

const SENTIMENT_WEIGHTS: &[(Sentiment, f64)] = &[
    (Sentiment::Negative, 10.0),
    (Sentiment::Mixed, 5.0),
    (Sentiment::Neutral, 0.0),
    (Sentiment::Positive, -5.0),
];

fn lookup<K: PartialEq + Copy>(table: &[(K, f64)], key: K) -> Option<f64> {
    table.iter().find(|(k, _)| *k == key).map(|(_, w)| *w)
}

/// Report severity as submitted. Matching is exact, as stored by ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
    Unrecognized,
}

impl Severity {
    pub fn weight(self) -> f64 {
        lookup(SEVERITY_WEIGHTS, self).unwrap_or(FALLBACK_WEIGHT)
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            _ => Self::Unrecognized,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Health,
    Environmental,
    Safety,
    Infrastructure,
    Social,
    Unrecognized,
}

impl Category {
    pub fn weight(self) -> f64 {
        lookup(CATEGORY_WEIGHTS, self).unwrap_or(FALLBACK_WEIGHT)
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Health" => Self::Health,
            "Environmental" => Self::Environmental,
            "Safety" => Self::Safety,
            "Infrastructure" => Self::Infrastructure,
            "Social" => Self::Social,
            _ => Self::Unrecognized,
        })
    }
}

/// Sentiment label from the text-analysis provider. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Negative,
    Mixed,
    Neutral,
    Positive,
    Unrecognized,
}

impl Sentiment {
    /// Unrecognized labels contribute nothing, same as neutral.
    pub fn weight(self) -> f64 {
        lookup(SENTIMENT_WEIGHTS, self).unwrap_or(0.0)
    }
}

impl FromStr for Sentiment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "negative" => Self::Negative,
            "mixed" => Self::Mixed,
            "neutral" => Self::Neutral,
            "positive" => Self::Positive,
            _ => Self::Unrecognized,
        })
    }
}

/// Infallible parse helper so call sites read as `parse_label::<Category>(..)`.
pub fn parse_label<T: FromStr<Err = std::convert::Infallible>>(raw: &str) -> T {
    match raw.parse() {
        Ok(v) => v,
        Err(never) => match never {},
    }
}
