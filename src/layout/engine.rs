//! Layout engine core implementation.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::event::{DateRange, Event};
use crate::timeline::{Timeline, requires_tree_mode};

use super::bounds::resolve_bounds;
use super::cluster::{ClusterParams, place_cluster};
use super::collision::CollisionIndex;
use super::grouping::group_by_date;
use super::lanes::{LaneSet, place_annotation};
use super::standalone::{StandaloneParams, place_standalone};
use super::types::{
    AnnotationContext, LayoutConfig, LayoutMode, SinglePlacement, TimelineLayout, TodayMarker,
    TreeLayout,
};

/// Layout engine configuration and computation.
///
/// Every call is independent: collision and lane state live only for the
/// duration of one `layout` call.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Compute layout for the given timeline.
    pub fn layout(&self, timeline: &Timeline) -> TimelineLayout {
        self.layout_events(&timeline.events, &timeline.range, timeline.today)
    }

    /// Compute layout for `events`, which must already be inside `range` and
    /// sorted by effective date.
    pub fn layout_events(
        &self,
        events: &[Event],
        range: &DateRange,
        today: Option<NaiveDate>,
    ) -> TimelineLayout {
        let cfg = &self.config;
        let box_width = cfg.box_width(range.span_days());

        // Phase 1: mode and grouping
        let mode = if requires_tree_mode(events) {
            LayoutMode::Tree
        } else {
            LayoutMode::Standard
        };
        let grouping = group_by_date(events);
        debug!(
            ?mode,
            standalone = grouping.standalone.len(),
            clusters = grouping.clustered.len(),
            box_width,
            "grouped events"
        );

        let mut index = CollisionIndex::new();

        // Phase 2: standalone events
        let single_params = StandaloneParams {
            base_level: match mode {
                LayoutMode::Standard => cfg.base_level,
                LayoutMode::Tree => cfg.tree_single_base_level,
            },
            step: cfg.single_step,
            half_width: box_width / 2.0,
            half_height: cfg.single_half_height,
            max_attempts: cfg.single_max_attempts,
        };
        let singles: Vec<SinglePlacement> = grouping
            .standalone
            .iter()
            .enumerate()
            .map(|(i, &(date, event))| {
                let (placed, degraded) =
                    place_standalone(&mut index, event, range.offset(date), i, &single_params);
                if degraded {
                    warn!(%date, level = placed.level, "standalone box placed over a collision");
                }
                SinglePlacement {
                    date,
                    placed,
                    degraded,
                }
            })
            .collect();

        // Phase 3: clusters
        let cluster_params = ClusterParams {
            base_level: cfg.tree_base_level,
            step: cfg.tree_step,
            box_width,
            half_height: cfg.branch_half_height,
            connector_gap: box_width * cfg.connector_gap_ratio,
            max_attempts: cfg.cluster_max_attempts,
        };
        let trees: Vec<TreeLayout> = grouping
            .clustered
            .iter()
            .enumerate()
            .map(|(k, (date, members))| {
                let tree = place_cluster(
                    &mut index,
                    *date,
                    range.offset(*date),
                    members,
                    k,
                    &cluster_params,
                );
                if tree.degraded {
                    warn!(
                        %date,
                        members = members.len(),
                        trunk_height = tree.trunk_height,
                        "cluster placed over a collision"
                    );
                }
                tree
            })
            .collect();

        // Phase 4: delay arrows, in event order
        let mut placed: Vec<(usize, f64, AnnotationContext)> = singles
            .iter()
            .map(|s| (s.placed.event, s.placed.level, AnnotationContext::Standalone))
            .chain(trees.iter().flat_map(|t| {
                t.branches
                    .iter()
                    .map(|b| (b.placed.event, b.placed.level, AnnotationContext::Cluster))
            }))
            .collect();
        placed.sort_by_key(|&(event, _, _)| event);

        let mut lanes = LaneSet::new(&cfg.lane_levels, cfg.lane_padding_days);
        let annotations: Vec<_> = placed
            .iter()
            .filter_map(|&(event, level, context)| {
                let annotation = place_annotation(
                    &mut lanes,
                    event,
                    &events[event],
                    level,
                    context,
                    range,
                    cfg,
                )?;
                if annotation.lane.is_none() {
                    warn!(
                        label = %annotation.label,
                        "all delay lanes taken, reusing middle lane"
                    );
                }
                Some(annotation)
            })
            .collect();

        // Phase 5: bounds
        let levels = singles
            .iter()
            .map(|s| s.placed.level)
            .chain(trees.iter().map(|t| t.trunk_height))
            .chain(
                trees
                    .iter()
                    .flat_map(|t| t.branches.iter().map(|b| b.placed.level)),
            )
            .chain(annotations.iter().map(|a| a.level));
        let bounds = resolve_bounds(range, levels, cfg.min_vertical_extent, cfg.vertical_margin);
        debug!(y_limit = bounds.y_limit, annotations = annotations.len(), "layout done");

        TimelineLayout {
            mode,
            box_width,
            singles,
            trees,
            annotations,
            today: today.map(|date| TodayMarker {
                date,
                x: range.offset(date),
            }),
            bounds,
        }
    }
}
