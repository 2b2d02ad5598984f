use super::PersistenceResult;
use crate::{Roadmap, RoadmapMetadata, ScheduledItem, TimelineConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

#[derive(Serialize, Deserialize)]
struct RoadmapSnapshot {
    #[serde(default)]
    metadata: RoadmapMetadata,
    #[serde(default)]
    config: TimelineConfig,
    items: Vec<ScheduledItem>,
}

impl RoadmapSnapshot {
    fn from_roadmap(roadmap: &Roadmap) -> PersistenceResult<Self> {
        let items = roadmap.items().to_vec();
        super::validate_items(&items)?;
        Ok(Self {
            metadata: roadmap.metadata().clone(),
            config: *roadmap.config(),
            items,
        })
    }

    fn into_roadmap(self) -> PersistenceResult<Roadmap> {
        Ok(Roadmap::from_parts(self.metadata, self.config, self.items)?)
    }
}

pub fn save_roadmap_to_json<P: AsRef<Path>>(roadmap: &Roadmap, path: P) -> PersistenceResult<()> {
    let snapshot = RoadmapSnapshot::from_roadmap(roadmap)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), items = snapshot.items.len(), "saved roadmap");
    Ok(())
}

pub fn load_roadmap_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Roadmap> {
    let file = File::open(path.as_ref())?;
    let snapshot: RoadmapSnapshot = serde_json::from_reader(file)?;
    let roadmap = snapshot.into_roadmap()?;
    info!(path = %path.as_ref().display(), items = roadmap.len(), "loaded roadmap");
    Ok(roadmap)
}

/// Read a bare JSON array of items, as returned by the backing service's list
/// endpoint.
pub fn load_items_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ScheduledItem>> {
    let file = File::open(path)?;
    let items: Vec<ScheduledItem> = serde_json::from_reader(file)?;
    super::validate_items(&items)?;
    Ok(items)
}
