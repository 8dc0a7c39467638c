// Hub-cluster graph — the internal-linking structure for one topic.
//
// The pillar page is the hub; every page group that doesn't contain the
// pillar becomes a spoke, represented by its first member keyword. The
// hub links out to every spoke (one-directional by design: spokes never
// link back to the hub in this graph's edge semantics), and spoke pairs
// that are semantically close enough get bidirectional sibling edges.
//
// Represented as plain node/edge lists so it serializes without exposing
// any graph-library internals: nodes indexed by small integers, edges as
// index pairs with a type tag.

use serde::{Deserialize, Serialize};

/// Role of a node in the hub-cluster graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Hub,
    Spoke,
}

/// Type of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Pillar page linking down to a support page
    HubToSpoke,
    /// Cross-link between related support pages (always added in pairs)
    Sibling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: usize,
    pub keyword: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
}

/// The finished linking structure for one topic. Node 0 is always the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubClusterGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl HubClusterGraph {
    /// The hub node. Present in every graph this crate constructs.
    pub fn hub(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Hub)
    }

    /// All spoke nodes, in page-group order.
    pub fn spokes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Spoke)
    }

    pub fn sibling_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Sibling)
    }
}

/// Assemble the hub-cluster graph from a topic's page groups, its pillar,
/// and the topic-wide semantic similarity matrix.
///
/// `page_groups` hold indices into `topic_keywords`; `similarity` is the
/// full n×n semantic matrix for those keywords. The page group containing
/// the pillar is skipped entirely — the hub already represents it, and
/// its non-pillar members are deliberately not re-attached here.
pub(crate) fn assemble(
    topic_keywords: &[String],
    page_groups: &[Vec<usize>],
    pillar_index: usize,
    sibling_threshold: f64,
    similarity: &[Vec<f64>],
) -> HubClusterGraph {
    let mut nodes = vec![GraphNode {
        id: 0,
        keyword: topic_keywords[pillar_index].clone(),
        kind: NodeKind::Hub,
    }];
    let mut edges = Vec::new();

    // (node id, representative keyword index) per spoke
    let mut spokes: Vec<(usize, usize)> = Vec::new();

    for (group_idx, group) in page_groups.iter().enumerate() {
        if group.contains(&pillar_index) {
            continue;
        }
        let Some(&representative) = group.first() else {
            continue;
        };

        let node_id = group_idx + 1;
        nodes.push(GraphNode {
            id: node_id,
            keyword: topic_keywords[representative].clone(),
            kind: NodeKind::Spoke,
        });
        edges.push(GraphEdge {
            source: 0,
            target: node_id,
            kind: EdgeKind::HubToSpoke,
        });
        spokes.push((node_id, representative));
    }

    for (i, &(node_i, idx_i)) in spokes.iter().enumerate() {
        for &(node_j, idx_j) in &spokes[i + 1..] {
            if similarity[idx_i][idx_j] >= sibling_threshold {
                edges.push(GraphEdge {
                    source: node_i,
                    target: node_j,
                    kind: EdgeKind::Sibling,
                });
                edges.push(GraphEdge {
                    source: node_j,
                    target: node_i,
                    kind: EdgeKind::Sibling,
                });
            }
        }
    }

    HubClusterGraph { nodes, edges }
}
