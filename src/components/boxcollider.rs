use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::rect::Rect;

/// Collision box of an entity, relative to its [`MapPosition`].
///
/// [`MapPosition`]: crate::components::mapposition::MapPosition
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
}

impl BoxCollider {
    /// Box of the given size centred on the entity position.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::new(-width / 2.0, -height / 2.0),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Box in world space for an entity standing at `position`.
    /// Negative sizes are normalised.
    pub fn rect_at(&self, position: Vec2) -> Rect {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        let min = p0.min(p1);
        let max = p0.max(p1);
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        self.rect_at(position)
            .overlaps(&other.rect_at(other_position))
    }
}
