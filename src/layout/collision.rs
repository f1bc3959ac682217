//! Index of committed footprints for one render pass.

use super::types::Rect;

/// Committed boxes are never removed. A linear scan is plenty for the event
/// counts a single chart carries.
#[derive(Debug, Default, Clone)]
pub struct CollisionIndex {
    boxes: Vec<Rect>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn would_collide(&self, candidate: &Rect) -> bool {
        self.boxes.iter().any(|b| b.intersects(candidate))
    }

    pub fn commit(&mut self, rect: Rect) {
        self.boxes.push(rect);
    }

    pub fn commit_all(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.boxes.extend(rects);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.boxes.iter()
    }
}
