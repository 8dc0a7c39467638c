// Hierarchical clustering — average-linkage HAC, the clusterer facade,
// and the hub-cluster graph builder.

pub mod agglomerative;
pub mod engine;
pub mod graph;
