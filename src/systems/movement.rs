//! Movement system for entity worlds.
use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::seek::Seek;
use crate::resources::worldtime::WorldTime;

/// Walk every seeking entity toward its destination for one tick.
pub fn seek_movement(mut query: Query<(&mut MapPosition, &Seek)>, time: Res<WorldTime>) {
    for (mut position, seek) in query.iter_mut() {
        position.pos = seek.step(position.pos, time.delta);
    }
}
