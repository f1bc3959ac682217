//! Trunk-and-branch layout for dates shared by several events.
//!
//! A cluster is placed as a unit: every branch box of an attempt is checked
//! before any is committed, and one collision rejects the whole attempt. The
//! trunk then grows by one step and the cluster is rebuilt from its first
//! member, so branches always stay contiguous along the trunk.

use chrono::NaiveDate;

use super::collision::CollisionIndex;
use super::types::{Branch, PlacedBox, Polarity, Side, TreeLayout};

#[derive(Debug, Clone, Copy)]
pub struct ClusterParams {
    pub base_level: f64,
    pub step: f64,
    /// Full label box width; branch boxes sit one width from the trunk.
    pub box_width: f64,
    pub half_height: f64,
    pub connector_gap: f64,
    pub max_attempts: usize,
}

/// Place the `ordinal`-th cluster, whose `members` share `date` at `x`.
pub fn place_cluster(
    index: &mut CollisionIndex,
    date: NaiveDate,
    x: f64,
    members: &[usize],
    ordinal: usize,
    params: &ClusterParams,
) -> TreeLayout {
    let polarity = Polarity::from_index(ordinal);
    let mut trunk_base = params.base_level;
    let mut branches = build_branches(x, members, trunk_base, polarity, params);
    let mut degraded = true;

    for attempt in 0..params.max_attempts {
        let clear = branches
            .iter()
            .all(|b| !index.would_collide(&b.placed.bounds()));
        if clear {
            degraded = false;
            break;
        }
        if attempt + 1 < params.max_attempts {
            trunk_base += params.step;
            branches = build_branches(x, members, trunk_base, polarity, params);
        }
    }

    index.commit_all(branches.iter().map(|b| b.placed.bounds()));

    let top = trunk_base + members.len().saturating_sub(1) as f64 * params.step;
    TreeLayout {
        date,
        trunk_x: x,
        polarity,
        trunk_base,
        trunk_height: top * polarity.sign(),
        branches,
        degraded,
    }
}

/// Candidate branches for one trunk height; nothing is committed here.
fn build_branches(
    x: f64,
    members: &[usize],
    trunk_base: f64,
    polarity: Polarity,
    params: &ClusterParams,
) -> Vec<Branch> {
    members
        .iter()
        .enumerate()
        .map(|(j, &event)| {
            let side = Side::from_index(j);
            let level = (trunk_base + j as f64 * params.step) * polarity.sign();
            let anchor = x + params.box_width * side.sign();
            Branch {
                placed: PlacedBox {
                    event,
                    anchor,
                    level,
                    half_width: params.box_width / 2.0,
                    half_height: params.half_height,
                },
                side,
                connector_end: anchor - params.connector_gap * side.sign(),
            }
        })
        .collect()
}
