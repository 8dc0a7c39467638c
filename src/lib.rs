// Keystone: keyword clustering and content-planning engine
//
// This is the library root. Each module corresponds to a major subsystem
// of the planning pipeline: embeddings feed the similarity engine, the
// clusterer turns similarity into a topic → page-group hierarchy, and the
// pipeline assembles the hierarchy into a linkable content plan.

pub mod cluster;
pub mod config;
pub mod embedding;
pub mod intent;
pub mod keywords;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
