//! Lane assignment for delay arrows.
//!
//! Lanes are a few fixed levels close to the baseline, mirrored on both
//! sides. Each lane remembers the day intervals already drawn on it; lanes do
//! not interact with the label box collision index.

use crate::event::{DateRange, Event};

use super::types::{Annotation, AnnotationContext, LayoutConfig, Polarity};

#[derive(Debug, Clone, PartialEq)]
struct Lane {
    level: f64,
    used: Vec<(f64, f64)>,
}

impl Lane {
    fn is_free(&self, start: f64, end: f64, padding: f64) -> bool {
        !self
            .used
            .iter()
            .any(|&(o_start, o_end)| start <= o_end + padding && end >= o_start - padding)
    }
}

/// Result of a lane lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneChoice {
    pub level: f64,
    /// Position within the polarity, innermost first; `None` when every lane
    /// was taken and the middle one was reused.
    pub lane: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneSet {
    above: Vec<Lane>,
    below: Vec<Lane>,
    padding: f64,
}

impl LaneSet {
    /// `levels` are unsigned magnitudes, innermost first.
    pub fn new(levels: &[f64], padding: f64) -> Self {
        let make = |sign: f64| {
            levels
                .iter()
                .map(|l| Lane {
                    level: l.abs() * sign,
                    used: Vec::new(),
                })
                .collect()
        };
        Self {
            above: make(1.0),
            below: make(-1.0),
            padding,
        }
    }

    /// Reserve the first free lane on `polarity` for `[start, end]`.
    pub fn reserve(&mut self, polarity: Polarity, start: f64, end: f64) -> LaneChoice {
        let (start, end) = (start.min(end), start.max(end));
        let padding = self.padding;
        let lanes = match polarity {
            Polarity::Above => &mut self.above,
            Polarity::Below => &mut self.below,
        };

        if let Some((i, lane)) = lanes
            .iter_mut()
            .enumerate()
            .find(|(_, lane)| lane.is_free(start, end, padding))
        {
            lane.used.push((start, end));
            return LaneChoice {
                level: lane.level,
                lane: Some(i),
            };
        }

        let level = lanes
            .get(lanes.len() / 2)
            .map(|l| l.level)
            .unwrap_or(0.0);
        LaneChoice { level, lane: None }
    }
}

/// Build the delay annotation for `event`, whose box sits at `box_level`.
///
/// Returns `None` when the event has no planned date or the delay is within
/// the tolerance of its context.
pub fn place_annotation(
    lanes: &mut LaneSet,
    index: usize,
    event: &Event,
    box_level: f64,
    context: AnnotationContext,
    range: &DateRange,
    config: &LayoutConfig,
) -> Option<Annotation> {
    let planned = event.planned?;
    let delay_days = event.delay_days()?;
    if delay_days.abs() <= config.tolerance(context) {
        return None;
    }

    let planned_x = range.offset(planned);
    let effective_x = range.offset(event.effective);
    let choice = lanes.reserve(Polarity::of_level(box_level), planned_x, effective_x);

    // Drawn part stays inside the plot.
    let x_max = range.span_days() as f64;
    let tail = planned_x.min(x_max).max(0.0);
    let head = effective_x.min(x_max).max(0.0);
    let text_x = if head > tail {
        tail.max(head - config.delay_label_offset_days)
    } else {
        tail.min(head + config.delay_label_offset_days)
    };

    Some(Annotation {
        event: index,
        delay_days,
        label: delay_label(delay_days),
        level: choice.level,
        lane: choice.lane,
        tail,
        head,
        text_x,
        drop_line: range.contains(planned).then_some(planned_x),
    })
}

/// `+12d` when late, `-4d` when early.
pub fn delay_label(days: i64) -> String {
    if days > 0 {
        format!("+{}d", days)
    } else {
        format!("{}d", days)
    }
}
