use chrono::{Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use roadmap_tool::{ScheduledItem, TimelineConfig, ZoomLevel, bucketize, position, validate};

fn reference_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|days| NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(days))
}

fn zoom_level() -> impl Strategy<Value = ZoomLevel> {
    prop::sample::select(ZoomLevel::ALL.to_vec())
}

fn timeline_config() -> impl Strategy<Value = TimelineConfig> {
    prop::sample::select(vec![Weekday::Mon, Weekday::Sun]).prop_map(TimelineConfig::new)
}

proptest! {
    #[test]
    fn buckets_are_contiguous_and_non_empty(
        reference in reference_date(),
        zoom in zoom_level(),
        config in timeline_config(),
    ) {
        let buckets = bucketize(reference, zoom, &config);
        prop_assert!(!buckets.is_empty());
        prop_assert!(buckets.iter().any(|b| b.contains(reference)));
        for pair in buckets.windows(2) {
            prop_assert_eq!(pair[0].end_of_period + Duration::days(1), pair[1].start_of_period);
            prop_assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn placed_bars_stay_inside_container(
        reference in reference_date(),
        zoom in zoom_level(),
        config in timeline_config(),
        start_offset in -120i64..240,
        length in 0i64..200,
        container_width in 50.0f64..5000.0,
    ) {
        let buckets = bucketize(reference, zoom, &config);
        let window_start = buckets[0].start_of_period;
        let window_end = buckets[buckets.len() - 1].end_of_period;
        let start = window_start + Duration::days(start_offset);
        let end = start + Duration::days(length);
        let item = ScheduledItem::new("x", "x").with_dates(start, end);

        let placed = position(&item, &buckets, container_width);
        let start_visible = start >= window_start && start <= window_end;
        let end_visible = end >= window_start && end <= window_end;

        match placed {
            Some(bar) => {
                prop_assert!(start_visible || end_visible);
                prop_assert!(bar.left >= 0.0);
                prop_assert!(bar.width > 0.0);
                prop_assert!(bar.right() <= container_width);
            }
            None => prop_assert!(!start_visible && !end_visible),
        }
        prop_assert_eq!(placed, position(&item, &buckets, container_width));
    }

    #[test]
    fn forward_only_dependencies_never_flag_cycles(
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
    ) {
        // Only allow edges from a higher index to a lower one, which is acyclic
        let mut items: Vec<ScheduledItem> =
            (0..12).map(|i| ScheduledItem::new(i.to_string(), format!("item {i}"))).collect();
        for (from, to) in edges {
            if from > to {
                let dep = to.to_string();
                if !items[from].dependencies.contains(&dep) {
                    items[from].dependencies.push(dep);
                }
            }
        }
        let flags = validate(&items);
        prop_assert!(flags.iter().all(|f| f.kind != roadmap_tool::FlagKind::CircularDependency));
    }
}
