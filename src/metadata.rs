use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapMetadata {
    pub name: String,
    pub description: String,
}

impl Default for RoadmapMetadata {
    fn default() -> Self {
        Self {
            name: "New Roadmap".to_string(),
            description: "No description".to_string(),
        }
    }
}
