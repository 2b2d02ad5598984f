use crate::item::ScheduledItem;
use crate::item_validation::{self, ItemValidationError};
use crate::roadmap::RoadmapError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] ItemValidationError),
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub fn validate_items(items: &[ScheduledItem]) -> PersistenceResult<()> {
    item_validation::validate_item_collection(items)?;
    Ok(())
}

pub mod file;

pub use file::{load_items_from_json, load_roadmap_from_json, save_roadmap_to_json};
