//! Collision-free placement of timeline events.
//!
//! Phases: grouping by date, standalone placement, cluster (tree)
//! placement, delay lane assignment, bounds resolution.

mod bounds;
mod cluster;
mod collision;
mod engine;
mod grouping;
mod lanes;
mod standalone;
mod types;

pub use bounds::resolve_bounds;
pub use cluster::{ClusterParams, place_cluster};
pub use collision::CollisionIndex;
pub use engine::LayoutEngine;
pub use grouping::{Grouping, group_by_date};
pub use lanes::{LaneChoice, LaneSet, delay_label, place_annotation};
pub use standalone::{StandaloneParams, place_standalone};
pub use types::*;
