//! Greedy level search for events alone on their date.

use super::collision::CollisionIndex;
use super::types::{PlacedBox, Polarity};

#[derive(Debug, Clone, Copy)]
pub struct StandaloneParams {
    pub base_level: f64,
    pub step: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub max_attempts: usize,
}

/// Place the `ordinal`-th standalone event at `x`.
///
/// Starts at the home level on the side picked by `ordinal` parity and walks
/// away from the baseline one step per collision. When every attempt
/// collides, the last attempted level is committed anyway and the second
/// element of the result is `true`.
pub fn place_standalone(
    index: &mut CollisionIndex,
    event: usize,
    x: f64,
    ordinal: usize,
    params: &StandaloneParams,
) -> (PlacedBox, bool) {
    let sign = Polarity::from_index(ordinal).sign();
    let mut candidate = PlacedBox {
        event,
        anchor: x,
        level: params.base_level * sign,
        half_width: params.half_width,
        half_height: params.half_height,
    };

    for attempt in 0..params.max_attempts {
        if !index.would_collide(&candidate.bounds()) {
            index.commit(candidate.bounds());
            return (candidate, false);
        }
        if attempt + 1 < params.max_attempts {
            candidate.level += params.step * sign;
        }
    }

    index.commit(candidate.bounds());
    (candidate, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Rect;

    fn params() -> StandaloneParams {
        StandaloneParams {
            base_level: 5.0,
            step: 2.5,
            half_width: 12.5,
            half_height: 1.0,
            max_attempts: 20,
        }
    }

    #[test]
    fn test_free_space_uses_home_level() {
        let mut index = CollisionIndex::new();
        let (a, degraded_a) = place_standalone(&mut index, 0, 0.0, 0, &params());
        let (b, degraded_b) = place_standalone(&mut index, 1, 10.0, 1, &params());

        assert_eq!(a.level, 5.0);
        assert_eq!(b.level, -5.0);
        assert!(!degraded_a && !degraded_b);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_collision_steps_away_from_baseline() {
        let mut index = CollisionIndex::new();
        place_standalone(&mut index, 0, 0.0, 0, &params());
        place_standalone(&mut index, 1, 5.0, 1, &params());
        // same side as the first, close in date
        let (c, degraded) = place_standalone(&mut index, 2, 10.0, 2, &params());

        assert_eq!(c.level, 7.5);
        assert!(!degraded);
    }

    #[test]
    fn test_saturation_commits_last_attempt() {
        let mut index = CollisionIndex::new();
        index.commit(Rect {
            x_min: -100.0,
            x_max: 100.0,
            y_min: 0.0,
            y_max: 1000.0,
        });
        let p = params();
        let (b, degraded) = place_standalone(&mut index, 0, 0.0, 0, &p);

        assert!(degraded);
        assert_eq!(b.level, p.base_level + 19.0 * p.step);
        assert_eq!(index.len(), 2);
    }
}
