use crate::graph::{DependencyCycleError, DependencyGraph};
use crate::item::ScheduledItem;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Following `dependencies` from the item leads back onto its own path.
    CircularDependency,
    /// A dependency has no end date or ends after the item starts.
    InvalidDependencyDates,
}

impl FlagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::CircularDependency => "circular_dependency",
            FlagKind::InvalidDependencyDates => "invalid_dependency_dates",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationFlag {
    pub item_id: String,
    pub kind: FlagKind,
}

impl ValidationFlag {
    pub fn new(item_id: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            item_id: item_id.into(),
            kind,
        }
    }
}

/// Annotate `items` with dependency warnings.
///
/// Flags come out in item order, a circular flag ahead of a date flag for the
/// same item. Dependencies on ids that are not in `items` impose no
/// constraint.
pub fn validate(items: &[ScheduledItem]) -> Vec<ValidationFlag> {
    let index = index_items(items);
    let mut reaches_cycle: HashMap<&str, bool> = HashMap::with_capacity(items.len());
    let mut flags = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.id.as_str()) {
            continue;
        }
        let mut path: HashSet<&str> = HashSet::new();
        if walk_dependencies(item.id.as_str(), &index, &mut path, &mut reaches_cycle) {
            flags.push(ValidationFlag::new(item.id.clone(), FlagKind::CircularDependency));
        }
        if has_invalid_dependency_dates(item, &index) {
            flags.push(ValidationFlag::new(
                item.id.clone(),
                FlagKind::InvalidDependencyDates,
            ));
        }
    }

    debug!(
        items = items.len(),
        flags = flags.len(),
        "validated roadmap dependencies"
    );
    flags
}

pub fn has_circular_dependency(item_id: &str, items: &[ScheduledItem]) -> bool {
    let index = index_items(items);
    if !index.contains_key(item_id) {
        return false;
    }
    let mut path = HashSet::new();
    let mut reaches_cycle = HashMap::new();
    walk_dependencies(item_id, &index, &mut path, &mut reaches_cycle)
}

/// The item starts before some dependency is guaranteed to be finished.
pub(crate) fn has_invalid_dependency_dates(
    item: &ScheduledItem,
    index: &HashMap<&str, &ScheduledItem>,
) -> bool {
    let Some(start) = item.start_date else {
        return false;
    };
    item.dependencies
        .iter()
        .filter_map(|dependency| index.get(dependency.as_str()))
        .any(|dependency| match dependency.end_date {
            Some(end) => end > start,
            None => true,
        })
}

/// Groups of item ids that depend on each other in a loop.
pub fn cycle_groups(items: &[ScheduledItem]) -> Vec<Vec<String>> {
    DependencyGraph::build(items).cycle_groups()
}

/// Item ids with every dependency ahead of its dependents.
pub fn dependency_order(items: &[ScheduledItem]) -> Result<Vec<String>, DependencyCycleError> {
    DependencyGraph::build(items).dependency_order()
}

pub(crate) fn index_items(items: &[ScheduledItem]) -> HashMap<&str, &ScheduledItem> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.entry(item.id.as_str()).or_insert(item);
    }
    index
}

// Depth-first walk along `dependencies`. `path` holds the nodes of the current
// branch only and is unwound on the way back up, so two branches meeting at a
// shared dependency do not count as a cycle. Whether a node can reach a cycle
// does not depend on the path that led to it, so results are memoized.
fn walk_dependencies<'a>(
    id: &'a str,
    index: &HashMap<&'a str, &'a ScheduledItem>,
    path: &mut HashSet<&'a str>,
    reaches_cycle: &mut HashMap<&'a str, bool>,
) -> bool {
    if path.contains(id) {
        return true;
    }
    if let Some(&known) = reaches_cycle.get(id) {
        return known;
    }
    let Some(&item) = index.get(id) else {
        return false;
    };

    path.insert(id);
    let found = item
        .dependencies
        .iter()
        .any(|dependency| walk_dependencies(dependency.as_str(), index, path, reaches_cycle));
    path.remove(id);

    reaches_cycle.insert(id, found);
    found
}
