// Entity extraction from keywords.
//
// Shallow regex mining of the modifiers a keyword carries: what product
// category it names, who it's for, price pressure, locations, brand-like
// capitalized runs, years, and problem language. These ride along on the
// keyword record so downstream brief generation can see at a glance what
// a page group is actually about.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

const PRODUCT_MODIFIERS: &str =
    "software|tool|app|platform|service|product|system|solution|program|device|machine";

const AUDIENCE_MODIFIERS: &str = "for beginners|for students|for professionals|for kids\
    |for small business|for enterprise|for startups|for seniors|for women|for men";

const PRICE_MODIFIERS: &str =
    "free|cheap|affordable|expensive|premium|budget|low cost|high end|luxury|discount";

/// Entities mined from one keyword. Empty vectors mean nothing of that
/// kind was found; they are skipped in serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_signals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
            && self.locations.is_empty()
            && self.audience.is_empty()
            && self.price_signals.is_empty()
            && self.brands.is_empty()
            && self.years.is_empty()
            && self.problems.is_empty()
    }
}

/// Regex-based entity extractor. Compile once, extract many.
pub struct EntityExtractor {
    product: Regex,
    audience: Regex,
    price: Regex,
    currency: Regex,
    locations: Vec<Regex>,
    brand: Regex,
    year: Regex,
    problems: Vec<Regex>,
    core_strips: Vec<Regex>,
}

impl EntityExtractor {
    pub fn new() -> Self {
        let compile = |pattern: &str| -> Regex {
            Regex::new(pattern).unwrap_or_else(|e| {
                panic!("Invalid entity pattern {pattern}: {e}");
            })
        };

        Self {
            product: compile(&format!(r"(?i)\b({PRODUCT_MODIFIERS})\b")),
            audience: compile(&format!(r"(?i)\b({AUDIENCE_MODIFIERS})\b")),
            price: compile(&format!(r"(?i)\b({PRICE_MODIFIERS})\b")),
            currency: compile(r"[$£€¥]\s*\d+"),
            locations: vec![
                compile(r"(?i)\bin ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\b"),
                compile(r"(?i)\bnear ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\b"),
                compile(r"(?i)\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s+(?:area|region|city|suburb)\b"),
                compile(r"(?i)\b(near me|nearby|local)\b"),
            ],
            // Deliberately case-sensitive: a capitalized run is the signal
            brand: compile(r"\b[A-Z][a-z]*(?:\s+[A-Z][a-z]*)*\b"),
            year: compile(r"\b(19\d{2}|20\d{2})\b"),
            problems: vec![
                compile(r"(?i)\b(problem|issue|error|fail|broken|not working|fix|solve|resolve)\b"),
                compile(r"(?i)\bhow to (fix|repair|resolve|solve)\b"),
            ],
            core_strips: vec![
                compile(r"^\b(how|what|why|when|where|who|which)\b\s+"),
                compile(r"^\b(is|are|do|does|can|could|should|will)\b\s+"),
                compile(r"\b(best|top|good|great|cheap|free|affordable)\b\s+"),
                compile(r"\s+\b(review|reviews|guide|tutorial|tips)\b"),
                compile(r"\s+\b(near me|nearby|local)\b"),
            ],
        }
    }

    /// Extract every entity type from a keyword.
    pub fn extract(&self, keyword: &str) -> ExtractedEntities {
        ExtractedEntities {
            products: dedup(capture_all(&self.product, keyword)),
            locations: dedup(
                self.locations
                    .iter()
                    .flat_map(|p| capture_all(p, keyword))
                    .collect(),
            ),
            audience: dedup(capture_all(&self.audience, keyword)),
            price_signals: dedup(
                capture_all(&self.price, keyword)
                    .into_iter()
                    .chain(
                        self.currency
                            .find_iter(keyword)
                            .map(|m| m.as_str().to_string()),
                    )
                    .collect(),
            ),
            brands: self.extract_brands(keyword),
            years: capture_all(&self.year, keyword),
            problems: dedup(
                self.problems
                    .iter()
                    .flat_map(|p| capture_all(p, keyword))
                    .collect(),
            ),
        }
    }

    /// Capitalized runs that aren't common sentence-leading words.
    fn extract_brands(&self, keyword: &str) -> Vec<String> {
        const COMMON_WORDS: &[&str] = &["How", "What", "Why", "When", "Where", "Best", "Top", "The"];

        self.brand
            .find_iter(keyword)
            .map(|m| m.as_str().to_string())
            .filter(|b| !COMMON_WORDS.contains(&b.as_str()))
            .collect()
    }

    /// Strip question words, intent modifiers, and location modifiers to
    /// expose the keyword's core topic: "best crm software reviews" ->
    /// "crm software".
    pub fn core_topic(&self, keyword: &str) -> String {
        let mut text = keyword.to_lowercase();
        for pattern in &self.core_strips {
            text = pattern.replace_all(&text, "").into_owned();
        }
        text.trim().to_string()
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First capture group of every match, in match order.
fn capture_all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Remove duplicate values keeping the first occurrence.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}
