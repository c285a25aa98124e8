//! Sprite rendering for entity worlds.
//!
//! Screens that keep their entities in a `bevy_ecs` [`World`] paint them
//! through [`draw_sprites`]: every entity carrying a [`MapPosition`] and a
//! [`Sprite`] becomes one blit centred on its position. Entities fully outside
//! the surface are culled.

use bevy_ecs::prelude::*;
use bevy_ecs::query::QueryFilter;

use crate::components::mapposition::MapPosition;
use crate::components::rect::Rect;
use crate::components::sprite::Sprite;
use crate::resources::surface::{DrawCmd, Surface};

/// Blit the sprites of every entity matching `F`, in query order.
pub fn draw_sprites<F: QueryFilter>(world: &mut World, surface: &mut Surface) {
    let view = surface.bounds();
    let mut q = world.query_filtered::<(&MapPosition, &Sprite), F>();
    for (position, sprite) in q.iter(world) {
        let dest = Rect::centered(position.pos, sprite.width, sprite.height);
        // touching the edge still counts as visible
        if dest.right() < view.x
            || dest.x > view.right()
            || dest.bottom() < view.y
            || dest.y > view.bottom()
        {
            continue;
        }
        surface.push(DrawCmd::Blit {
            texture: sprite.tex_key.clone(),
            source: sprite.source,
            dest,
            flip_v: sprite.flip_v,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[derive(Component)]
    struct Marked;

    #[test]
    fn test_draws_matching_sprites_centred() {
        let mut world = World::new();
        world.spawn((MapPosition::new(50.0, 40.0), Sprite::new("ant", 10.0, 20.0), Marked));
        world.spawn((MapPosition::new(10.0, 10.0), Sprite::new("leaf", 4.0, 4.0)));

        let mut surface = Surface::new(100, 100);
        draw_sprites::<With<Marked>>(&mut world, &mut surface);
        assert_eq!(
            surface.commands(),
            &[DrawCmd::Blit {
                texture: "ant".into(),
                source: None,
                dest: Rect::new(45.0, 30.0, 10.0, 20.0),
                flip_v: false,
            }]
        );
    }

    #[test]
    fn test_offscreen_sprites_are_culled() {
        let mut world = World::new();
        world.spawn((MapPosition { pos: Vec2::new(-50.0, 10.0) }, Sprite::new("spider", 32.0, 32.0)));
        world.spawn((MapPosition::new(99.0, 99.0), Sprite::new("ant", 8.0, 8.0)));

        let mut surface = Surface::new(100, 100);
        draw_sprites::<()>(&mut world, &mut surface);
        assert_eq!(surface.commands().len(), 1);
    }
}
