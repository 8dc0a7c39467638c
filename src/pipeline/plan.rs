// Content-plan assembly: scored keywords in, topic hierarchy out.
//
// The two-level clustering flow:
//   1. cluster all keywords into topics (semantic similarity, loose
//      threshold)
//   2. per topic: pick the pillar, cluster the topic's keywords into
//      page groups (combined similarity, strict threshold), pick each
//      group's target keyword, and build the hub-cluster graph
//
// Topics are processed through an order-preserving buffered stream so a
// large plan overlaps its embedding batches; results land in topic order
// regardless of completion order. Everything here is in-memory — no
// persistence, no export formatting.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::engine::KeywordClusterer;
use crate::cluster::graph::HubClusterGraph;
use crate::config::Config;
use crate::intent::Intent;
use crate::keywords::record::{select_pillar, KeywordRecord};
use crate::similarity::SimilarityMode;

/// How many topics cluster their page groups concurrently.
const TOPIC_CONCURRENCY: usize = 4;

/// A page group nested inside a topic. Member indices are local to the
/// owning topic's keyword list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGroup {
    /// The target keyword's text, used as the group label
    pub label: String,
    /// Topic-local index of the target (pillar-equivalent) keyword
    pub target_index: usize,
    /// Topic-local indices of every member, ascending
    pub members: Vec<usize>,
    pub total_volume: u64,
    pub total_opportunity: f64,
    /// Intent of the target keyword — the page inherits it
    pub intent: Intent,
}

/// A coarse topic cluster with its page groups and linking graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// The pillar keyword's text, used as the topic label
    pub label: String,
    /// Index of the pillar within `keywords`
    pub pillar_index: usize,
    pub keywords: Vec<KeywordRecord>,
    pub page_groups: Vec<PageGroup>,
    pub total_volume: u64,
    pub total_opportunity: f64,
    pub avg_difficulty: f64,
    /// Hub-and-spoke internal linking structure for this topic
    pub graph: HubClusterGraph,
}

/// The finished plan: every input keyword placed in exactly one topic
/// and exactly one page group within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicPlan {
    pub generated_at: DateTime<Utc>,
    pub topics: Vec<Topic>,
}

impl TopicPlan {
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn page_group_count(&self) -> usize {
        self.topics.iter().map(|t| t.page_groups.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize topic plan")
    }
}

/// Assemble a full content plan from scored keyword records.
///
/// Thresholds come from `config`; the clusterer's embedding cache is
/// shared across every pass, so each distinct keyword is embedded once.
pub async fn build_plan(
    clusterer: &KeywordClusterer,
    records: &[KeywordRecord],
    config: &Config,
) -> Result<TopicPlan> {
    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();

    let topic_clusters = clusterer
        .cluster(&texts, config.topic_threshold, SimilarityMode::Semantic)
        .await?;

    info!(
        keywords = records.len(),
        topics = topic_clusters.len(),
        "Topic clustering complete"
    );

    let topics: Vec<Topic> = stream::iter(topic_clusters.into_iter().map(|cluster| async move {
        build_topic(clusterer, records, &cluster, config).await
    }))
    .buffered(TOPIC_CONCURRENCY)
    .collect::<Vec<Result<Topic>>>()
    .await
    .into_iter()
    .collect::<Result<Vec<Topic>>>()?;

    info!(
        topics = topics.len(),
        page_groups = topics.iter().map(|t| t.page_groups.len()).sum::<usize>(),
        "Plan assembly complete"
    );

    Ok(TopicPlan {
        generated_at: Utc::now(),
        topics,
    })
}

/// Build one topic: pillar, page groups, aggregates, linking graph.
async fn build_topic(
    clusterer: &KeywordClusterer,
    records: &[KeywordRecord],
    member_indices: &[usize],
    config: &Config,
) -> Result<Topic> {
    let keywords: Vec<KeywordRecord> =
        member_indices.iter().map(|&i| records[i].clone()).collect();
    let texts: Vec<String> = keywords.iter().map(|r| r.text.clone()).collect();

    let pillar_index = select_pillar(&keywords);

    let page_clusters = clusterer
        .cluster(&texts, config.page_group_threshold, SimilarityMode::Combined)
        .await?;

    let page_groups: Vec<PageGroup> = page_clusters
        .iter()
        .map(|members| {
            let group_records: Vec<KeywordRecord> =
                members.iter().map(|&i| keywords[i].clone()).collect();

            // Target selection runs within the group; map the winner back
            // to its topic-local index
            let target_index = members[select_pillar(&group_records)];

            PageGroup {
                label: keywords[target_index].text.clone(),
                target_index,
                members: members.clone(),
                total_volume: group_records.iter().filter_map(|r| r.volume).sum(),
                total_opportunity: group_records.iter().filter_map(|r| r.opportunity).sum(),
                intent: keywords[target_index].intent,
            }
        })
        .collect();

    let graph = clusterer
        .build_graph(&texts, &page_clusters, pillar_index, config.sibling_threshold)
        .await?;

    let difficulty_values: Vec<f64> = keywords.iter().filter_map(|r| r.difficulty).collect();
    let avg_difficulty = if difficulty_values.is_empty() {
        0.0
    } else {
        difficulty_values.iter().sum::<f64>() / difficulty_values.len() as f64
    };

    debug!(
        label = %keywords[pillar_index].text,
        members = keywords.len(),
        page_groups = page_groups.len(),
        "Topic assembled"
    );

    Ok(Topic {
        label: keywords[pillar_index].text.clone(),
        pillar_index,
        total_volume: keywords.iter().filter_map(|r| r.volume).sum(),
        total_opportunity: keywords.iter().filter_map(|r| r.opportunity).sum(),
        avg_difficulty,
        keywords,
        page_groups,
        graph,
    })
}
