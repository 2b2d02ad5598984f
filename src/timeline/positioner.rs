use super::Bucket;
use crate::item::{ItemStatus, ScheduledItem};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Horizontal placement of a bar inside the timeline container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarPosition {
    pub left: f64,
    pub width: f64,
}

impl BarPosition {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub item_id: String,
    pub title: String,
    pub status: ItemStatus,
    pub position: BarPosition,
    /// Filled share of the bar for the item's progress.
    pub progress_width: f64,
}

/// Width of one bucket column, or `None` when nothing can be drawn.
pub fn bucket_pixel_width(container_width: f64, bucket_count: usize) -> Option<f64> {
    if bucket_count == 0 || !container_width.is_finite() || container_width <= 0.0 {
        return None;
    }
    Some(container_width / bucket_count as f64)
}

/// Place `item` on the bucket grid.
///
/// Returns `None` when a date is missing, the dates are reversed, or neither
/// date falls inside the visible window. A bar that runs off one edge of the
/// window is clipped to the first or last bucket.
pub fn position(
    item: &ScheduledItem,
    buckets: &[Bucket],
    container_width: f64,
) -> Option<BarPosition> {
    let (start, end) = item.date_range()?;
    bucket_pixel_width(container_width, buckets.len())?;

    let (start_index, end_index) = match (bucket_index(buckets, start), bucket_index(buckets, end)) {
        (None, None) => {
            trace!(item = %item.id, "item outside visible window");
            return None;
        }
        (Some(first), Some(last)) => (first, last),
        (None, Some(last)) => (0, last),
        (Some(first), None) => (first, buckets.len() - 1),
    };

    end_index.checked_sub(start_index)?;
    let left = column_edge(start_index, buckets.len(), container_width);
    let right = column_edge(end_index + 1, buckets.len(), container_width);
    Some(BarPosition {
        left,
        width: fit_width(left, right, container_width),
    })
}

fn column_edge(index: usize, bucket_count: usize, container_width: f64) -> f64 {
    if index >= bucket_count {
        return container_width;
    }
    container_width * index as f64 / bucket_count as f64
}

// `left + width` must not pass the container edge, which plain
// subtraction can miss by an ulp.
fn fit_width(left: f64, right: f64, container_width: f64) -> f64 {
    let mut width = right - left;
    while width > 0.0 && left + width > container_width {
        width = f64::from_bits(width.to_bits() - 1);
    }
    width
}

/// Filled width for a progress percentage; out-of-range values are clamped.
pub fn progress_width(bar_width: f64, progress: i32) -> f64 {
    bar_width * f64::from(progress.clamp(0, 100)) / 100.0
}

/// Position every item that is visible, keeping input order.
pub fn place_items<'a, I>(items: I, buckets: &[Bucket], container_width: f64) -> Vec<PlacedItem>
where
    I: IntoIterator<Item = &'a ScheduledItem>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let position = position(item, buckets, container_width)?;
            Some(PlacedItem {
                item_id: item.id.clone(),
                title: item.title.clone(),
                status: item.status,
                position,
                progress_width: progress_width(position.width, item.progress),
            })
        })
        .collect()
}

fn bucket_index(buckets: &[Bucket], date: NaiveDate) -> Option<usize> {
    buckets.iter().position(|bucket| bucket.contains(date))
}
