// Opportunity and difficulty scoring — the arithmetic that turns SERP
// observations into the ranking signals the clusterer's pillar selection
// consumes.

pub mod difficulty;
pub mod opportunity;
pub mod serp;
