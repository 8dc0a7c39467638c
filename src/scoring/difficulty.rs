// Keyword difficulty formula (0-100).
//
// Four weighted components:
//   SERP strength (40%) — homepages and big brands in the top results
//   Competition  (30%) — how many titles already target the phrase
//   SERP crowding (20%) — ads and feature clutter pushing organic down
//   Content depth (10%) — snippet length as a proxy for content weight
//
// A SERP with no organic results scores a flat 50 — unknown, assumed
// medium.

use serde::{Deserialize, Serialize};

use super::serp::{is_big_brand, is_homepage, OrganicResult, SerpFeature, SerpMetrics};

/// Component weights for the difficulty formula.
pub struct DifficultyWeights {
    pub serp_strength: f64,
    pub competition: f64,
    pub crowding: f64,
    pub content_depth: f64,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self {
            serp_strength: 0.4,
            competition: 0.3,
            crowding: 0.2,
            content_depth: 0.1,
        }
    }
}

/// Difficulty with its component breakdown, kept for reporting and for
/// tuning the weights against real SERPs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    /// Weighted total, 0-100, one decimal
    pub score: f64,
    pub serp_strength: f64,
    pub competition: f64,
    pub crowding: f64,
    pub content_depth: f64,
}

/// Compute difficulty for one keyword from its SERP observation.
pub fn calculate_difficulty(
    serp: &SerpMetrics,
    keyword: &str,
    weights: &DifficultyWeights,
) -> Difficulty {
    if serp.organic_results.is_empty() {
        return Difficulty {
            score: 50.0,
            serp_strength: 50.0,
            competition: 50.0,
            crowding: 50.0,
            content_depth: 50.0,
        };
    }

    let serp_strength = serp_strength(serp);
    let competition = competition(&serp.organic_results, keyword);
    let crowding = crowding(serp);
    let content_depth = content_depth(&serp.organic_results);

    let score = serp_strength * weights.serp_strength
        + competition * weights.competition
        + crowding * weights.crowding
        + content_depth * weights.content_depth;

    Difficulty {
        score: (score.clamp(0.0, 100.0) * 10.0).round() / 10.0,
        serp_strength,
        competition,
        crowding,
        content_depth,
    }
}

/// SERP authority: homepage ratio and brand ratio in the top 5, plus
/// flat bumps for the knowledge graph and featured snippet.
fn serp_strength(serp: &SerpMetrics) -> f64 {
    let top: Vec<&OrganicResult> = serp.organic_results.iter().take(5).collect();

    let homepage_ratio = top.iter().filter(|r| is_homepage(&r.link)).count() as f64 / 5.0;
    let brand_ratio = top.iter().filter(|r| is_big_brand(&r.link)).count() as f64 / 5.0;

    let mut score = homepage_ratio * 30.0 + brand_ratio * 40.0;
    if serp.has_feature(SerpFeature::KnowledgeGraph) {
        score += 15.0;
    }
    if serp.has_feature(SerpFeature::FeaturedSnippet) {
        score += 15.0;
    }

    score.min(100.0)
}

/// Title competition: exact phrase matches weigh double partial (all
/// words present) matches across the top 10.
fn competition(results: &[OrganicResult], keyword: &str) -> f64 {
    let keyword_lower = keyword.to_lowercase();
    let keyword_words: std::collections::HashSet<&str> =
        keyword_lower.split_whitespace().collect();

    let mut exact = 0u32;
    let mut partial = 0u32;

    for result in results.iter().take(10) {
        let title = result.title.to_lowercase();
        if title.contains(&keyword_lower) {
            exact += 1;
        } else {
            let title_words: std::collections::HashSet<&str> = title.split_whitespace().collect();
            if keyword_words.is_subset(&title_words) {
                partial += 1;
            }
        }
    }

    f64::from(exact * 10 + partial * 5).min(100.0)
}

/// SERP crowding from ad density and feature count.
fn crowding(serp: &SerpMetrics) -> f64 {
    let feature_score = (serp.features.len() as f64 * 10.0).min(50.0);
    (serp.ads_density * 50.0 + feature_score).min(100.0)
}

/// Snippet length in the top 5 as a content-depth proxy: under 100 chars
/// reads shallow, 200+ reads deep.
fn content_depth(results: &[OrganicResult]) -> f64 {
    let lengths: Vec<usize> = results
        .iter()
        .take(5)
        .map(|r| r.snippet.len())
        .collect();

    if lengths.is_empty() {
        return 50.0;
    }

    let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
    ((avg / 200.0) * 100.0).min(100.0)
}
