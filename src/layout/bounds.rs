//! Axis limits from the final placements.

use crate::event::DateRange;

use super::types::CanvasBounds;

/// Horizontal limits are the visible range itself. The vertical limit covers
/// the largest `|level|` among `levels`, never less than `min_extent`, plus
/// `margin`, and is applied on both sides of the baseline.
pub fn resolve_bounds(
    range: &DateRange,
    levels: impl IntoIterator<Item = f64>,
    min_extent: f64,
    margin: f64,
) -> CanvasBounds {
    let max_abs = levels
        .into_iter()
        .map(f64::abs)
        .fold(min_extent, f64::max);

    CanvasBounds {
        x_min: 0.0,
        x_max: range.span_days() as f64,
        y_limit: max_abs + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::calendar_year(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn test_floor_applies_without_levels() {
        let b = resolve_bounds(&range(), [], 4.0, 3.0);
        assert_eq!(b.y_limit, 7.0);
        assert_eq!(b.x_min, 0.0);
        assert_eq!(b.x_max, 364.0);
    }

    #[test]
    fn test_symmetric_from_one_sided_levels() {
        let b = resolve_bounds(&range(), [-5.0, -12.5, -7.5], 4.0, 3.0);
        assert_eq!(b.y_limit, 15.5);
    }
}
