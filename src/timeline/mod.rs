use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod bucketer;
pub mod positioner;

pub use bucketer::bucketize;
pub use positioner::{BarPosition, PlacedItem, bucket_pixel_width, place_items, position, progress_width};

/// How much calendar time the visible timeline spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    /// Twelve month columns for the reference year.
    Year,
    /// Weekly columns over a three month rolling window.
    #[default]
    Month,
    /// Weekly columns from this week to one month out.
    Sprint,
    /// One column per day of the reference week.
    Week,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 4] = [
        ZoomLevel::Year,
        ZoomLevel::Month,
        ZoomLevel::Sprint,
        ZoomLevel::Week,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomLevel::Year => "year",
            ZoomLevel::Month => "month",
            ZoomLevel::Sprint => "sprint",
            ZoomLevel::Week => "week",
        }
    }

    /// Length of the period a single bucket covers at this zoom.
    pub fn bucket_unit(&self) -> BucketUnit {
        match self {
            ZoomLevel::Year => BucketUnit::Month,
            ZoomLevel::Month | ZoomLevel::Sprint => BucketUnit::Week,
            ZoomLevel::Week => BucketUnit::Day,
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoomLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(ZoomLevel::Year),
            "month" => Ok(ZoomLevel::Month),
            "sprint" => Ok(ZoomLevel::Sprint),
            "week" => Ok(ZoomLevel::Week),
            other => Err(format!("unknown zoom level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketUnit {
    Month,
    Week,
    Day,
}

/// One column of the timeline grid. Both period bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub index: usize,
    pub label: String,
    pub start_of_period: NaiveDate,
    pub end_of_period: NaiveDate,
}

impl Bucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_of_period <= date && date <= self.end_of_period
    }
}
