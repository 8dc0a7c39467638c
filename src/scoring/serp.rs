// Structured SERP observations.
//
// Providers return loosely-shaped JSON; by the time data reaches scoring
// it has been parsed into these records so every formula works over
// explicit fields instead of string-keyed lookups.

use serde::{Deserialize, Serialize};

/// SERP features a result page can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerpFeature {
    FeaturedSnippet,
    KnowledgeGraph,
    PeopleAlsoAsk,
    MapPack,
    Video,
    ImagePack,
    ShoppingResults,
    SiteLinks,
}

/// One organic result from the top of a SERP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Everything scoring needs to know about one keyword's SERP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpMetrics {
    /// Top organic results, best rank first
    pub organic_results: Vec<OrganicResult>,
    pub features: Vec<SerpFeature>,
    /// Share of the page occupied by ads, 0-1
    pub ads_density: f64,
}

impl SerpMetrics {
    pub fn has_feature(&self, feature: SerpFeature) -> bool {
        self.features.contains(&feature)
    }
}

/// Whether a URL points at a domain's homepage rather than an inner page.
pub fn is_homepage(url: &str) -> bool {
    let stripped = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    !stripped.contains('/')
}

/// Crude big-brand check by well-known domain substrings. Kept
/// deliberately simple: the difficulty formula only needs a rough
/// authority signal, not domain intelligence.
pub fn is_big_brand(url: &str) -> bool {
    const BIG_DOMAINS: &[&str] = &[
        "wikipedia",
        "youtube",
        "amazon",
        "facebook",
        "twitter",
        "linkedin",
        "reddit",
        "instagram",
        "tiktok",
        "forbes",
        "nytimes",
        "cnn",
        "bbc",
        "medium",
        "quora",
    ];

    let lower = url.to_lowercase();
    BIG_DOMAINS.iter().any(|domain| lower.contains(domain))
}
