// Traffic potential and opportunity scoring.
//
// Traffic potential applies a click-through-rate curve (chosen by SERP
// layout) to search volume at the target rank. Opportunity then balances
// that traffic against difficulty:
//
//   opportunity = (traffic × cpc_weight × intent_fit) / (difficulty + brand_crowding)
//
// log-scaled onto 0-100 so a handful of monster keywords doesn't flatten
// the rest of the ranking.

use crate::intent::Intent;

use super::serp::SerpFeature;

/// CTR by organic position 1-10 (percent), for a clean informational SERP.
const CTR_INFORMATIONAL_CLEAN: [f64; 10] =
    [31.7, 24.7, 18.7, 13.6, 9.5, 6.9, 5.1, 3.8, 2.8, 2.2];

/// CTR when a featured snippet sits above the organic results and
/// absorbs a share of the clicks. The snippet slot itself (position 0,
/// roughly 8.6% CTR) is not an organic rank and has no entry here;
/// `target_rank` is always a 1-based organic position.
const CTR_INFORMATIONAL_FEATURED_SNIPPET: [f64; 10] =
    [19.6, 15.3, 11.3, 8.1, 5.8, 4.3, 3.2, 2.4, 1.8, 1.4];

/// CTR for commercial/transactional SERPs where ads take the top slots.
const CTR_COMMERCIAL: [f64; 10] = [27.6, 15.8, 11.3, 8.4, 6.1, 4.5, 3.4, 2.6, 2.0, 1.6];

/// CTR for local SERPs where a map pack dominates.
const CTR_LOCAL_WITH_MAP: [f64; 10] = [12.0, 9.0, 6.5, 4.8, 3.5, 2.6, 1.9, 1.4, 1.0, 0.8];

/// Fallback CTR (percent) for ranks outside 1-10.
const CTR_BEYOND_TOP_TEN: f64 = 2.0;

/// Pick the CTR curve for a keyword's SERP layout.
fn ctr_curve(intent: Intent, features: &[SerpFeature]) -> &'static [f64; 10] {
    if intent == Intent::Local && features.contains(&SerpFeature::MapPack) {
        &CTR_LOCAL_WITH_MAP
    } else if features.contains(&SerpFeature::FeaturedSnippet) {
        &CTR_INFORMATIONAL_FEATURED_SNIPPET
    } else if matches!(intent, Intent::Commercial | Intent::Transactional) {
        &CTR_COMMERCIAL
    } else {
        &CTR_INFORMATIONAL_CLEAN
    }
}

/// Estimated monthly visits if the page ranks at `target_rank` (1-based).
pub fn traffic_potential(
    volume: u64,
    intent: Intent,
    features: &[SerpFeature],
    target_rank: usize,
) -> f64 {
    if volume == 0 {
        return 0.0;
    }

    let curve = ctr_curve(intent, features);
    let ctr_percent = match target_rank {
        1..=10 => curve[target_rank - 1],
        _ => CTR_BEYOND_TOP_TEN,
    };

    let traffic = volume as f64 * ctr_percent / 100.0;
    (traffic * 10.0).round() / 10.0
}

/// Composite opportunity score, 0-100.
///
/// CPC boosts commercial-intent keywords (advertisers bidding high mark
/// monetizable queries), intent fit boosts keywords matching the site's
/// editorial focus, and a knowledge graph adds a brand-crowding penalty
/// to the denominator.
pub fn calculate_opportunity(
    traffic_potential: f64,
    difficulty: f64,
    cpc: f64,
    intent: Intent,
    content_focus: Intent,
    features: &[SerpFeature],
) -> f64 {
    let cpc_weight = if matches!(intent, Intent::Commercial | Intent::Transactional) {
        1.0 + (cpc / 10.0).min(2.0)
    } else {
        1.0
    };

    let intent_fit = if intent == content_focus { 1.5 } else { 1.0 };

    let brand_crowding = if features.contains(&SerpFeature::KnowledgeGraph) {
        10.0
    } else {
        0.0
    };

    let raw = (traffic_potential * cpc_weight * intent_fit) / (difficulty + brand_crowding).max(1.0);

    let scaled = if raw > 0.0 {
        (raw.ln_1p() * 10.0).min(100.0)
    } else {
        0.0
    };

    (scaled * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_volume_means_zero_traffic() {
        assert_eq!(
            traffic_potential(0, Intent::Informational, &[], 1),
            0.0
        );
    }

    #[test]
    fn test_traffic_at_rank_one_informational() {
        // 1000 * 31.7% = 317
        let traffic = traffic_potential(1000, Intent::Informational, &[], 1);
        assert!((traffic - 317.0).abs() < 0.01);
    }

    #[test]
    fn test_featured_snippet_cuts_traffic() {
        let clean = traffic_potential(1000, Intent::Informational, &[], 1);
        let with_snippet =
            traffic_potential(1000, Intent::Informational, &[SerpFeature::FeaturedSnippet], 1);
        assert!(with_snippet < clean);
    }

    #[test]
    fn test_map_pack_uses_local_curve() {
        let local = traffic_potential(1000, Intent::Local, &[SerpFeature::MapPack], 1);
        assert!((local - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_rank_beyond_ten_uses_fallback_ctr() {
        let traffic = traffic_potential(1000, Intent::Informational, &[], 25);
        assert!((traffic - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_commercial_cpc_boosts_opportunity() {
        let cheap = calculate_opportunity(100.0, 40.0, 0.5, Intent::Commercial, Intent::Commercial, &[]);
        let pricey =
            calculate_opportunity(100.0, 40.0, 8.0, Intent::Commercial, Intent::Commercial, &[]);
        assert!(pricey > cheap);
    }

    #[test]
    fn test_cpc_ignored_for_informational() {
        let low = calculate_opportunity(100.0, 40.0, 0.5, Intent::Informational, Intent::Informational, &[]);
        let high =
            calculate_opportunity(100.0, 40.0, 50.0, Intent::Informational, Intent::Informational, &[]);
        assert_eq!(low, high);
    }

    #[test]
    fn test_knowledge_graph_penalizes() {
        let open = calculate_opportunity(100.0, 40.0, 1.0, Intent::Informational, Intent::Informational, &[]);
        let crowded = calculate_opportunity(
            100.0,
            40.0,
            1.0,
            Intent::Informational,
            Intent::Informational,
            &[SerpFeature::KnowledgeGraph],
        );
        assert!(crowded < open);
    }

    #[test]
    fn test_opportunity_bounded() {
        let score = calculate_opportunity(
            1_000_000.0,
            1.0,
            100.0,
            Intent::Transactional,
            Intent::Transactional,
            &[],
        );
        assert!(score <= 100.0);
        assert_eq!(
            calculate_opportunity(0.0, 40.0, 1.0, Intent::Informational, Intent::Informational, &[]),
            0.0
        );
    }
}
