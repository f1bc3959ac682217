//! Data structures for layout computation.
//!
//! Horizontal coordinates are days from the start of the visible range;
//! vertical coordinates are levels, positive above the baseline axis.

use chrono::NaiveDate;
use serde::Serialize;

/// Which side of the baseline a placement prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    Above,
    Below,
}

impl Polarity {
    /// Even ordinals go above, odd below.
    pub fn from_index(i: usize) -> Self {
        if i % 2 == 0 { Self::Above } else { Self::Below }
    }

    pub fn of_level(level: f64) -> Self {
        if level >= 0.0 { Self::Above } else { Self::Below }
    }

    pub fn sign(self) -> f64 {
        match self {
            Self::Above => 1.0,
            Self::Below => -1.0,
        }
    }
}

/// Horizontal side of a branch relative to its trunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub fn from_index(j: usize) -> Self {
        if j % 2 == 0 { Self::Right } else { Self::Left }
    }

    pub fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

/// Axis-aligned rectangle in (days × levels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn centered(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            x_min: x - half_width,
            x_max: x + half_width,
            y_min: y - half_height,
            y_max: y + half_height,
        }
    }

    /// Strict overlap on both axes; shared edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min < other.x_max
            && self.x_max > other.x_min
            && self.y_min < other.y_max
            && self.y_max > other.y_min
    }
}

/// A label box assigned to one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedBox {
    /// Index into the event list given to the engine.
    pub event: usize,
    pub anchor: f64,
    pub level: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl PlacedBox {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.anchor, self.level, self.half_width, self.half_height)
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of_level(self.level)
    }
}

/// An event that is alone on its date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePlacement {
    pub date: NaiveDate,
    pub placed: PlacedBox,
    /// Committed despite a collision after the retry bound ran out.
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub placed: PlacedBox,
    pub side: Side,
    /// Where the horizontal connector from the trunk stops.
    pub connector_end: f64,
}

/// Trunk plus branches for a date shared by several events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    pub date: NaiveDate,
    pub trunk_x: f64,
    pub polarity: Polarity,
    /// Unsigned level of the first branch.
    pub trunk_base: f64,
    /// Signed level where the trunk ends (the last branch).
    pub trunk_height: f64,
    pub branches: Vec<Branch>,
    pub degraded: bool,
}

/// Placement context of an annotated event; selects the delay tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnnotationContext {
    Standalone,
    Cluster,
}

/// Delay arrow between the planned and effective dates of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub event: usize,
    /// `effective - planned`, in days.
    pub delay_days: i64,
    pub label: String,
    /// Signed level of the lane the arrow is drawn on.
    pub level: f64,
    /// Lane position inside its polarity, innermost first; `None` on fallback.
    pub lane: Option<usize>,
    /// Arrow tail, clamped to the range start.
    pub tail: f64,
    /// Arrow head, at the effective date.
    pub head: f64,
    pub text_x: f64,
    /// X of the dotted drop line, when the planned date is visible.
    pub drop_line: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TodayMarker {
    pub date: NaiveDate,
    pub x: f64,
}

/// Axis limits; vertical extent is `[-y_limit, y_limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_limit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutMode {
    /// No shared dates: every event is standalone.
    Standard,
    /// At least one shared date: clusters become trees.
    Tree,
}

/// The complete layout result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub mode: LayoutMode,
    /// Full label box width in days.
    pub box_width: f64,
    pub singles: Vec<SinglePlacement>,
    pub trees: Vec<TreeLayout>,
    pub annotations: Vec<Annotation>,
    pub today: Option<TodayMarker>,
    pub bounds: CanvasBounds,
}

impl TimelineLayout {
    /// Every event box, singles first, then tree branches.
    pub fn placed_boxes(&self) -> impl Iterator<Item = &PlacedBox> {
        self.singles.iter().map(|s| &s.placed).chain(
            self.trees
                .iter()
                .flat_map(|t| t.branches.iter().map(|b| &b.placed)),
        )
    }

    pub fn is_degraded(&self) -> bool {
        self.singles.iter().any(|s| s.degraded) || self.trees.iter().any(|t| t.degraded)
    }
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Home level of standalone boxes in standard mode.
    pub base_level: f64,
    /// Home level of standalone boxes in tree mode.
    pub tree_single_base_level: f64,
    pub single_step: f64,
    pub single_half_height: f64,
    pub single_max_attempts: usize,
    pub tree_base_level: f64,
    pub tree_step: f64,
    pub branch_half_height: f64,
    pub cluster_max_attempts: usize,
    pub min_box_width_days: f64,
    pub box_width_ratio: f64,
    pub connector_gap_ratio: f64,
    /// Lane magnitudes, innermost first; mirrored below the baseline.
    pub lane_levels: Vec<f64>,
    pub lane_padding_days: f64,
    pub standalone_tolerance_days: i64,
    pub cluster_tolerance_days: i64,
    pub delay_label_offset_days: f64,
    pub min_vertical_extent: f64,
    pub vertical_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_level: 5.0,
            tree_single_base_level: 3.5,
            single_step: 2.5,
            single_half_height: 1.0,
            single_max_attempts: 20,
            tree_base_level: 5.0,
            tree_step: 3.0,
            branch_half_height: 1.2,
            cluster_max_attempts: 15,
            min_box_width_days: 25.0,
            box_width_ratio: 0.08,
            connector_gap_ratio: 0.05,
            lane_levels: vec![0.8, 1.6, 2.4],
            lane_padding_days: 5.0,
            standalone_tolerance_days: 5,
            cluster_tolerance_days: 3,
            delay_label_offset_days: 6.0,
            min_vertical_extent: 4.0,
            vertical_margin: 3.0,
        }
    }
}

impl LayoutConfig {
    /// Label box width in days for a range of `span_days`.
    pub fn box_width(&self, span_days: i64) -> f64 {
        (span_days as f64 * self.box_width_ratio).max(self.min_box_width_days)
    }

    pub fn tolerance(&self, context: AnnotationContext) -> i64 {
        match context {
            AnnotationContext::Standalone => self.standalone_tolerance_days,
            AnnotationContext::Cluster => self.cluster_tolerance_days,
        }
    }
}
