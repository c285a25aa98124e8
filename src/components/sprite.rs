use bevy_ecs::prelude::Component;

use crate::components::rect::Rect;

/// Image drawn centred on the entity's position.
///
/// `source` selects a frame when the texture is a sprite sheet; `None` draws
/// the whole texture.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub source: Option<Rect>,
    pub flip_v: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            source: None,
            flip_v: false,
        }
    }
}
