//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `elapsed_ms` is the unscaled tick length. Inserts the resource on first use.
pub fn update_world_time(world: &mut World, elapsed_ms: u32) {
    let mut wt = world.get_resource_or_insert_with(WorldTime::default);
    let scaled_dt = elapsed_ms as f32 / 1000.0 * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
}
