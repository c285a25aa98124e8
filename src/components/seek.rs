//! Destination-seeking intent.
//!
//! Entities that walk toward a point (ants, spiders, hackers) carry a [`Seek`].
//! Their brains only pick the destination and the speed; the movement system
//! in [`crate::systems::movement`] does the walking.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Seek {
    pub destination: Vec2,
    /// Pixels per second. Zero stops the entity where it stands.
    pub speed: f32,
}

impl Seek {
    pub fn new(destination: Vec2, speed: f32) -> Self {
        Self { destination, speed }
    }

    /// Position after walking toward the destination for `dt` seconds.
    ///
    /// Never overshoots: the step is clamped to the remaining distance.
    pub fn step(&self, from: Vec2, dt: f32) -> Vec2 {
        let to_go = self.destination - from;
        let distance = to_go.length();
        if distance <= f32::EPSILON || self.speed <= 0.0 {
            return from;
        }
        let travel = (dt * self.speed).min(distance);
        from + to_go / distance * travel
    }

    pub fn arrived(&self, from: Vec2, within: f32) -> bool {
        from.distance(self.destination) < within
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_at_speed() {
        let seek = Seek::new(Vec2::new(100.0, 0.0), 50.0);
        let p = seek.step(Vec2::ZERO, 0.5);
        assert!((p.x - 25.0).abs() < 1e-4);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_step_does_not_overshoot() {
        let seek = Seek::new(Vec2::new(3.0, 4.0), 1000.0);
        let p = seek.step(Vec2::ZERO, 1.0);
        assert!(p.distance(Vec2::new(3.0, 4.0)) < 1e-4);
    }

    #[test]
    fn test_zero_speed_stays_put() {
        let seek = Seek::new(Vec2::new(10.0, 10.0), 0.0);
        assert_eq!(seek.step(Vec2::new(1.0, 2.0), 1.0), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_arrived_within_radius() {
        let seek = Seek::new(Vec2::new(10.0, 0.0), 1.0);
        assert!(seek.arrived(Vec2::new(6.0, 0.0), 5.0));
        assert!(!seek.arrived(Vec2::new(4.0, 0.0), 5.0));
    }
}
