// Plan assembly — the clustering stage of the research pipeline.

pub mod plan;
