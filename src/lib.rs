pub mod calendar;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod item;
pub mod item_validation;
pub mod metadata;
pub mod persistence;
pub mod preferences;
pub mod prioritization;
pub mod roadmap;
pub mod timeline;
pub mod validation;

pub use calendar::TimelineConfig;
pub use item::{ItemFilter, ItemKind, ItemStatus, ScheduledItem};
pub use item_validation::ItemValidationError;
pub use metadata::RoadmapMetadata;
pub use persistence::{
    PersistenceError, load_items_from_json, load_roadmap_from_json, save_roadmap_to_json,
    validate_items,
};
pub use preferences::{
    Density, DisplayPreferences, JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
    Theme,
};
pub use prioritization::{MoscowCategory, RiceScore};
pub use roadmap::{Roadmap, RoadmapError, TimelineSummary, TimelineView};
pub use timeline::{BarPosition, Bucket, PlacedItem, ZoomLevel, bucketize, position, progress_width};
pub use validation::{FlagKind, ValidationFlag, validate};
