use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeSet;
use timelane::event::{DateRange, Event};
use timelane::layout::{LayoutConfig, LayoutEngine, Polarity};

fn year() -> DateRange {
    DateRange::calendar_year(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

fn build_events(rows: &[(i64, Option<i64>, usize)]) -> Vec<Event> {
    let owners = ["Commission", "Coordinator", "Participants"];
    let start = year().start;
    let mut events: Vec<Event> = rows
        .iter()
        .enumerate()
        .map(|(i, &(day, delay, owner))| {
            let effective = start + Duration::days(day);
            let mut e = Event::new(effective, owners[owner], &format!("milestone {i}"));
            e.planned = delay.map(|dd| effective - Duration::days(dd));
            e
        })
        .collect();
    events.sort_by_key(|e| e.effective);
    events
}

fn event_rows() -> impl Strategy<Value = Vec<(i64, Option<i64>, usize)>> {
    prop::collection::vec(
        (0i64..=364, prop::option::of(-40i64..=40), 0usize..3),
        1..14,
    )
}

proptest! {
    #[test]
    fn every_event_gets_exactly_one_box(rows in event_rows()) {
        let events = build_events(&rows);
        let layout = LayoutEngine::default().layout_events(&events, &year(), None);

        let mut seen: Vec<usize> = layout.placed_boxes().map(|b| b.event).collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..events.len()).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn boxes_never_overlap_without_saturation(rows in event_rows()) {
        let events = build_events(&rows);
        let layout = LayoutEngine::default().layout_events(&events, &year(), None);

        if !layout.is_degraded() {
            let boxes: Vec<_> = layout.placed_boxes().map(|b| b.bounds()).collect();
            for i in 0..boxes.len() {
                for j in (i + 1)..boxes.len() {
                    prop_assert!(
                        !boxes[i].intersects(&boxes[j]),
                        "{:?} overlaps {:?}",
                        boxes[i],
                        boxes[j]
                    );
                }
            }
        }
    }

    #[test]
    fn layout_is_deterministic(rows in event_rows()) {
        let events = build_events(&rows);
        let engine = LayoutEngine::default();
        let a = engine.layout_events(&events, &year(), None);
        let b = engine.layout_events(&events, &year(), None);

        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn standalone_sides_are_balanced(days in prop::collection::btree_set(0i64..=364, 1..20)) {
        let rows: Vec<(i64, Option<i64>, usize)> = days.iter().map(|&d| (d, None, 0)).collect();
        let events = build_events(&rows);
        let layout = LayoutEngine::default().layout_events(&events, &year(), None);

        let above = layout.singles.iter().filter(|s| s.placed.polarity() == Polarity::Above).count();
        let below = layout.singles.len() - above;
        prop_assert!(above == below || above == below + 1);
    }

    #[test]
    fn branches_climb_the_trunk_one_step_at_a_time(rows in event_rows()) {
        let events = build_events(&rows);
        let cfg = LayoutConfig::default();
        let layout = LayoutEngine::new(cfg.clone()).layout_events(&events, &year(), None);

        for tree in &layout.trees {
            prop_assert!(tree.branches.len() >= 2);
            let sign = tree.polarity.sign();
            for (j, branch) in tree.branches.iter().enumerate() {
                let expected = (tree.trunk_base + j as f64 * cfg.tree_step) * sign;
                prop_assert!((branch.placed.level - expected).abs() < 1e-9);
            }
            let last = tree.branches.last().map(|b| b.placed.level).unwrap_or(0.0);
            prop_assert!((tree.trunk_height - last).abs() < 1e-9);
        }
    }

    #[test]
    fn reserved_lanes_keep_their_padding(rows in event_rows()) {
        let events = build_events(&rows);
        let cfg = LayoutConfig::default();
        let layout = LayoutEngine::new(cfg.clone()).layout_events(&events, &year(), None);

        let mut reserved: Vec<(f64, f64, f64)> = Vec::new();
        for a in layout.annotations.iter().filter(|a| a.lane.is_some()) {
            let planned = events[a.event].planned.unwrap();
            let p = year().offset(planned);
            let e = year().offset(events[a.event].effective);
            reserved.push((a.level, p.min(e), p.max(e)));
        }
        for i in 0..reserved.len() {
            for j in (i + 1)..reserved.len() {
                let (la, sa, ea) = reserved[i];
                let (lb, sb, eb) = reserved[j];
                if la == lb {
                    let clash = sb <= ea + cfg.lane_padding_days && eb >= sa - cfg.lane_padding_days;
                    prop_assert!(!clash);
                }
            }
        }
    }

    #[test]
    fn annotations_only_past_tolerance(rows in event_rows()) {
        let events = build_events(&rows);
        let layout = LayoutEngine::default().layout_events(&events, &year(), None);

        let annotated: BTreeSet<usize> = layout.annotations.iter().map(|a| a.event).collect();
        for single in &layout.singles {
            let e = &events[single.placed.event];
            let expected = e.delay_days().is_some_and(|dd| dd.abs() > 5);
            prop_assert_eq!(annotated.contains(&single.placed.event), expected);
        }
        for tree in &layout.trees {
            for branch in &tree.branches {
                let e = &events[branch.placed.event];
                let expected = e.delay_days().is_some_and(|dd| dd.abs() > 3);
                prop_assert_eq!(annotated.contains(&branch.placed.event), expected);
            }
        }
        for a in &layout.annotations {
            let level = layout
                .placed_boxes()
                .find(|b| b.event == a.event)
                .map(|b| b.level)
                .unwrap();
            prop_assert_eq!(Polarity::of_level(a.level), Polarity::of_level(level));
        }
    }
}
