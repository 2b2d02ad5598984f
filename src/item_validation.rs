use crate::item::ScheduledItem;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// Reasons an item record is refused when it enters the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemValidationError {
    #[error("item id must not be empty")]
    EmptyId,
    #[error("item {id} starts on {start} but ends on {end}")]
    StartAfterEnd {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("item {id} lists dependency '{dependency}' more than once")]
    DuplicateDependency { id: String, dependency: String },
    #[error("item {id} lists an empty dependency id")]
    EmptyDependency { id: String },
    #[error("duplicate item id {0}")]
    DuplicateId(String),
}

pub fn validate_item(item: &ScheduledItem) -> Result<(), ItemValidationError> {
    if item.id.trim().is_empty() {
        return Err(ItemValidationError::EmptyId);
    }

    if let (Some(start), Some(end)) = (item.start_date, item.end_date) {
        if start > end {
            return Err(ItemValidationError::StartAfterEnd {
                id: item.id.clone(),
                start,
                end,
            });
        }
    }

    let mut seen = HashSet::with_capacity(item.dependencies.len());
    for dependency in &item.dependencies {
        if dependency.trim().is_empty() {
            return Err(ItemValidationError::EmptyDependency {
                id: item.id.clone(),
            });
        }
        if !seen.insert(dependency.as_str()) {
            return Err(ItemValidationError::DuplicateDependency {
                id: item.id.clone(),
                dependency: dependency.clone(),
            });
        }
    }

    Ok(())
}

pub fn validate_item_collection(items: &[ScheduledItem]) -> Result<(), ItemValidationError> {
    let mut seen_ids = HashSet::with_capacity(items.len());
    for item in items {
        if !seen_ids.insert(item.id.as_str()) {
            return Err(ItemValidationError::DuplicateId(item.id.clone()));
        }
        validate_item(item)?;
    }
    Ok(())
}
