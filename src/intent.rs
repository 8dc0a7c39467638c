// Search-intent classification for keywords.
//
// Pattern banks per intent, scored by how many patterns match. Ties go
// to the intent with the stronger commercial signal: a keyword matching
// both "buy" and "best" is transactional, not commercial. Keywords
// matching nothing default to informational.

use std::fmt;
use std::str::FromStr;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// The five search-intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Informational,
    Commercial,
    Transactional,
    Navigational,
    Local,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Informational => "informational",
            Intent::Commercial => "commercial",
            Intent::Transactional => "transactional",
            Intent::Navigational => "navigational",
            Intent::Local => "local",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "informational" | "info" => Ok(Intent::Informational),
            "commercial" => Ok(Intent::Commercial),
            "transactional" => Ok(Intent::Transactional),
            "navigational" => Ok(Intent::Navigational),
            "local" => Ok(Intent::Local),
            other => anyhow::bail!("Unknown intent: {other}"),
        }
    }
}

const INFORMATIONAL_PATTERNS: &[&str] = &[
    r"\b(how|what|why|when|where|who|guide|tutorial|learn|explain|definition|meaning)\b",
    r"\b(vs|versus|compared?|difference|review)\b",
    r"\b(tips|ideas|examples|benefits|advantages|disadvantages)\b",
];

const COMMERCIAL_PATTERNS: &[&str] = &[
    r"\b(best|top|review|comparison|affordable|cheap|premium|quality)\b",
    r"\b(vs|versus|alternative|option|solution)\b",
    r"\b(price|cost|pricing|quote|estimate)\b",
];

const TRANSACTIONAL_PATTERNS: &[&str] = &[
    r"\b(buy|purchase|order|shop|sale|deal|discount|coupon|promo)\b",
    r"\b(for sale|to buy|online|store|cart|checkout)\b",
    r"\b(near me|delivery|shipping|book|hire|rent)\b",
];

const LOCAL_PATTERNS: &[&str] = &[
    r"\b(near me|nearby|local|in [A-Z]|around)\b",
    r"\b(directions|hours|location|address|phone|contact)\b",
    // Bare 4-5 digit runs read as zip/post codes
    r"\b(city|town|suburb|zip|postcode|\d{4,5})\b",
];

const NAVIGATIONAL_PATTERNS: &[&str] = &[
    r"\b(login|sign in|account|dashboard|portal|homepage|official)\b",
    // A brand-like word followed by a destination noun and nothing else:
    // "salesforce login" is navigational, "crm software platform" is not
    r"^[A-Z][a-z]+ (website|site|app|platform|login)$",
];

/// Tie-break priority: more specific (higher-commitment) intents win when
/// match counts are equal.
const TIE_BREAK_ORDER: [Intent; 5] = [
    Intent::Transactional,
    Intent::Local,
    Intent::Commercial,
    Intent::Navigational,
    Intent::Informational,
];

/// Regex-based intent classifier. Compile once, classify many.
pub struct IntentClassifier {
    banks: Vec<(Intent, Vec<Regex>)>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| -> Vec<Regex> {
            patterns
                .iter()
                .map(|p| {
                    // Patterns are compile-time constants; a failure here is
                    // a programming error, not an input error.
                    Regex::new(&format!("(?i){p}")).unwrap_or_else(|e| {
                        panic!("Invalid intent pattern {p}: {e}");
                    })
                })
                .collect()
        };

        Self {
            banks: vec![
                (Intent::Informational, compile(INFORMATIONAL_PATTERNS)),
                (Intent::Commercial, compile(COMMERCIAL_PATTERNS)),
                (Intent::Transactional, compile(TRANSACTIONAL_PATTERNS)),
                (Intent::Local, compile(LOCAL_PATTERNS)),
                (Intent::Navigational, compile(NAVIGATIONAL_PATTERNS)),
            ],
        }
    }

    /// Classify a keyword's intent.
    pub fn classify(&self, keyword: &str) -> Intent {
        let scores: Vec<(Intent, usize)> = self
            .banks
            .iter()
            .map(|(intent, patterns)| {
                let hits = patterns.iter().filter(|p| p.is_match(keyword)).count();
                (*intent, hits)
            })
            .collect();

        let max_score = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        if max_score == 0 {
            return Intent::Informational;
        }

        for intent in TIE_BREAK_ORDER {
            if scores.iter().any(|&(i, s)| i == intent && s == max_score) {
                return intent;
            }
        }

        Intent::Informational
    }

    /// Classify with a confidence value: the winning intent's share of
    /// all pattern hits (0.5 when nothing matched and the default wins).
    pub fn classify_with_confidence(&self, keyword: &str) -> (Intent, f64) {
        let scores: Vec<(Intent, usize)> = self
            .banks
            .iter()
            .map(|(intent, patterns)| {
                let hits = patterns.iter().filter(|p| p.is_match(keyword)).count();
                (*intent, hits)
            })
            .collect();

        let total: usize = scores.iter().map(|(_, s)| *s).sum();
        if total == 0 {
            return (Intent::Informational, 0.5);
        }

        let intent = self.classify(keyword);
        let winning = scores
            .iter()
            .find(|(i, _)| *i == intent)
            .map(|(_, s)| *s)
            .unwrap_or(0);

        (intent, winning as f64 / total as f64)
    }

    /// Whether a keyword reads as a question.
    pub fn is_question(&self, keyword: &str) -> bool {
        const QUESTION_WORDS: &[&str] = &[
            "how", "what", "why", "when", "where", "who", "which", "can", "is", "does", "do",
        ];

        if keyword.trim_end().ends_with('?') {
            return true;
        }

        keyword
            .split_whitespace()
            .next()
            .is_some_and(|first| QUESTION_WORDS.contains(&first.to_lowercase().as_str()))
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
