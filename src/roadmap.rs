use crate::calendar::TimelineConfig;
use crate::graph::{DependencyCycleError, DependencyGraph};
use crate::item::{ItemFilter, ScheduledItem};
use crate::item_validation::{self, ItemValidationError};
use crate::metadata::RoadmapMetadata;
use crate::timeline::{self, Bucket, PlacedItem, ZoomLevel};
use crate::validation::{self, FlagKind, ValidationFlag};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoadmapError {
    #[error(transparent)]
    InvalidItem(#[from] ItemValidationError),
    #[error("item {0} already exists")]
    AlreadyExists(String),
    #[error("item {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub item_count: usize,
    pub placed_count: usize,
    pub unscheduled_count: usize,
    pub circular_count: usize,
    pub invalid_date_count: usize,
}

impl TimelineSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("items={}", self.item_count));
        parts.push(format!("placed={}", self.placed_count));
        if self.unscheduled_count > 0 {
            parts.push(format!("unscheduled={}", self.unscheduled_count));
        }
        if self.circular_count > 0 {
            parts.push(format!("circular={}", self.circular_count));
        }
        if self.invalid_date_count > 0 {
            parts.push(format!("bad_dates={}", self.invalid_date_count));
        }
        parts.join(", ")
    }
}

/// Everything the renderer needs for one frame of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineView {
    pub zoom: ZoomLevel,
    pub reference: NaiveDate,
    pub container_width: f64,
    pub buckets: Vec<Bucket>,
    pub bars: Vec<PlacedItem>,
    pub flags: Vec<ValidationFlag>,
    pub summary: TimelineSummary,
}

/// The roadmap items of one product board plus the settings used to lay
/// them out.
#[derive(Debug, Clone, Default)]
pub struct Roadmap {
    metadata: RoadmapMetadata,
    config: TimelineConfig,
    items: Vec<ScheduledItem>,
}

impl Roadmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(metadata: RoadmapMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn with_config(metadata: RoadmapMetadata, config: TimelineConfig) -> Self {
        Self {
            metadata,
            config,
            items: Vec::new(),
        }
    }

    /// Build a roadmap from records that came from outside, refusing the
    /// whole batch if any record is malformed.
    pub fn from_parts(
        metadata: RoadmapMetadata,
        config: TimelineConfig,
        items: Vec<ScheduledItem>,
    ) -> Result<Self, RoadmapError> {
        item_validation::validate_item_collection(&items)?;
        Ok(Self {
            metadata,
            config,
            items,
        })
    }

    pub fn metadata(&self) -> &RoadmapMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: RoadmapMetadata) {
        self.metadata = metadata;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.metadata.description = description.into();
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TimelineConfig) {
        self.config = config;
    }

    pub fn items(&self) -> &[ScheduledItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items selected by `filter`, in roadmap order.
    pub fn filtered_items<'a>(
        &'a self,
        filter: &'a ItemFilter,
    ) -> impl Iterator<Item = &'a ScheduledItem> + 'a {
        self.items.iter().filter(move |item| filter.matches(item))
    }

    pub fn find_item(&self, item_id: &str) -> Option<&ScheduledItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Insert or replace by id.
    pub fn upsert_item(&mut self, item: ScheduledItem) -> Result<(), RoadmapError> {
        item_validation::validate_item(&item)?;
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        Ok(())
    }

    pub fn insert_item(&mut self, item: ScheduledItem) -> Result<(), RoadmapError> {
        if self.find_item(&item.id).is_some() {
            return Err(RoadmapError::AlreadyExists(item.id));
        }
        self.upsert_item(item)
    }

    /// Apply `mutator` to a copy of an existing item and store it if it still
    /// passes validation.
    pub fn update_item_with<F>(&mut self, item_id: &str, mutator: F) -> Result<(), RoadmapError>
    where
        F: FnOnce(&mut ScheduledItem),
    {
        let mut item = self
            .find_item(item_id)
            .cloned()
            .ok_or_else(|| RoadmapError::NotFound(item_id.to_string()))?;
        mutator(&mut item);
        item.id = item_id.to_string();
        self.upsert_item(item)
    }

    pub fn set_dates(
        &mut self,
        item_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), RoadmapError> {
        self.update_item_with(item_id, |item| {
            item.start_date = start;
            item.end_date = end;
        })
    }

    pub fn set_dependencies(
        &mut self,
        item_id: &str,
        dependencies: Vec<String>,
    ) -> Result<(), RoadmapError> {
        self.update_item_with(item_id, |item| item.dependencies = dependencies)
    }

    /// Remove the item and drop it from every other item's dependencies.
    pub fn delete_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        if self.items.len() == before {
            return false;
        }
        for item in &mut self.items {
            item.dependencies.retain(|dependency| dependency != item_id);
        }
        info!(item = item_id, "deleted roadmap item");
        true
    }

    pub fn validate(&self) -> Vec<ValidationFlag> {
        validation::validate(&self.items)
    }

    pub fn cycle_groups(&self) -> Vec<Vec<String>> {
        DependencyGraph::build(&self.items).cycle_groups()
    }

    pub fn dependency_order(&self) -> Result<Vec<String>, DependencyCycleError> {
        DependencyGraph::build(&self.items).dependency_order()
    }

    /// Bucket the window, place every visible item and collect dependency
    /// warnings for the whole roadmap.
    pub fn timeline(
        &self,
        reference: NaiveDate,
        zoom: ZoomLevel,
        container_width: f64,
    ) -> TimelineView {
        self.filtered_timeline(reference, zoom, container_width, &ItemFilter::default())
    }

    /// Like [`Roadmap::timeline`], restricted to the items `filter` selects.
    /// Dependencies are still checked against the whole roadmap; only the
    /// flags of selected items are kept.
    pub fn filtered_timeline(
        &self,
        reference: NaiveDate,
        zoom: ZoomLevel,
        container_width: f64,
        filter: &ItemFilter,
    ) -> TimelineView {
        let buckets = timeline::bucketize(reference, zoom, &self.config);
        let selected: Vec<&ScheduledItem> = self.filtered_items(filter).collect();
        let bars = timeline::place_items(selected.iter().copied(), &buckets, container_width);
        let mut flags = self.validate();
        if !filter.is_empty() {
            flags.retain(|flag| selected.iter().any(|item| item.id == flag.item_id));
        }

        let summary = TimelineSummary {
            item_count: selected.len(),
            placed_count: bars.len(),
            unscheduled_count: selected
                .iter()
                .filter(|item| item.start_date.is_none() || item.end_date.is_none())
                .count(),
            circular_count: count_flags(&flags, FlagKind::CircularDependency),
            invalid_date_count: count_flags(&flags, FlagKind::InvalidDependencyDates),
        };
        debug!(
            %zoom,
            %reference,
            %filter,
            summary = %summary.to_cli_summary(),
            "computed timeline view"
        );

        TimelineView {
            zoom,
            reference,
            container_width,
            buckets,
            bars,
            flags,
            summary,
        }
    }
}

fn count_flags(flags: &[ValidationFlag], kind: FlagKind) -> usize {
    flags.iter().filter(|flag| flag.kind == kind).count()
}
