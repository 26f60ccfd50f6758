use serde::{Deserialize, Serialize};

pub const NEGATIVE_WORDS: [&str; 14] = [
    "stressed",
    "sad",
    "worried",
    "anxious",
    "depressed",
    "down",
    "overwhelmed",
    "tired",
    "failing",
    "struggle",
    "difficult",
    "hard",
    "problem",
    "issue",
];

pub const POSITIVE_WORDS: [&str; 10] = [
    "good",
    "great",
    "happy",
    "excited",
    "confident",
    "motivated",
    "better",
    "improved",
    "success",
    "grateful",
];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Coarse mood label for a visitor utterance.
///
/// Matching is plain substring containment on the lower-cased text, so
/// "downtown" counts as "down". A message hitting both word lists is neutral.
pub fn classify(text: &str) -> Sentiment {
    let lower = text.to_lowercase();

    let has_negative = NEGATIVE_WORDS.iter().any(|word| lower.contains(word));
    let has_positive = POSITIVE_WORDS.iter().any(|word| lower.contains(word));

    match (has_negative, has_positive) {
        (true, false) => Sentiment::Negative,
        (false, true) => Sentiment::Positive,
        _ => Sentiment::Neutral,
    }
}
