use super::{Bucket, BucketUnit, ZoomLevel};
use crate::calendar::{self, TimelineConfig};
use chrono::NaiveDate;
use tracing::debug;

/// Build the ordered column grid for `zoom` around `reference`.
///
/// Buckets are contiguous and non-overlapping, and the result is never empty.
pub fn bucketize(reference: NaiveDate, zoom: ZoomLevel, config: &TimelineConfig) -> Vec<Bucket> {
    let periods = match zoom {
        ZoomLevel::Year => months_of_year(reference),
        ZoomLevel::Month => {
            let start = calendar::start_of_month(reference);
            let end = calendar::end_of_month(calendar::add_months(reference, 2));
            weeks_between(start, end, config)
        }
        ZoomLevel::Sprint => {
            let start = config.start_of_week(reference);
            let end = config.end_of_week(calendar::add_months(reference, 1));
            weeks_between(start, end, config)
        }
        ZoomLevel::Week => days_of_week(reference, config),
    };

    let unit = zoom.bucket_unit();
    let buckets: Vec<Bucket> = periods
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| Bucket {
            index,
            label: label_for(unit, start),
            start_of_period: start,
            end_of_period: end,
        })
        .collect();

    debug!(
        %reference,
        %zoom,
        count = buckets.len(),
        "built timeline buckets"
    );
    buckets
}

fn label_for(unit: BucketUnit, start: NaiveDate) -> String {
    match unit {
        BucketUnit::Month => start.format("%b").to_string(),
        BucketUnit::Week => start.format("%b %-d").to_string(),
        BucketUnit::Day => start.format("%a %-d").to_string(),
    }
}

fn months_of_year(reference: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let january = calendar::start_of_year(reference);
    let mut months = Vec::with_capacity(12);
    for offset in 0..12 {
        let start = calendar::add_months(january, offset);
        let end = calendar::end_of_month(start);
        if months.last().is_some_and(|&(_, prev_end)| start <= prev_end) {
            break;
        }
        months.push((start, end));
    }
    months
}

fn weeks_between(
    start: NaiveDate,
    end: NaiveDate,
    config: &TimelineConfig,
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut weeks = Vec::new();
    let mut cursor = config.start_of_week(start);
    loop {
        let week_end = calendar::add_days(cursor, 6);
        weeks.push((cursor, week_end));
        let next = calendar::add_days(cursor, 7);
        if next > end || next <= cursor || week_end == NaiveDate::MAX {
            break;
        }
        cursor = next;
    }
    weeks
}

fn days_of_week(reference: NaiveDate, config: &TimelineConfig) -> Vec<(NaiveDate, NaiveDate)> {
    let first = config.start_of_week(reference);
    let mut days = Vec::with_capacity(7);
    for offset in 0..7 {
        let day = calendar::add_days(first, offset);
        if days.last().is_some_and(|&(prev, _)| day <= prev) {
            break;
        }
        days.push((day, day));
    }
    days
}
