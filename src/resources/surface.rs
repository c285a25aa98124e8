//! Frame surface.
//!
//! Screens never talk to the graphics backend. They paint into a [`Surface`],
//! which records [`DrawCmd`]s in painter's order; the platform replays the list
//! when the frame is presented.

use glam::Vec2;

use crate::components::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const DARK_GRAY: Color = Color::rgb(50, 50, 50);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    /// Texture (or a region of it) stretched onto `dest`.
    Blit {
        texture: String,
        source: Option<Rect>,
        dest: Rect,
        flip_v: bool,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    OutlineRect {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Text in the backend's default font.
    Text {
        text: String,
        position: Vec2,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    commands: Vec<DrawCmd>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Forget the previous frame and fill with `color`.
    pub fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    pub fn blit(&mut self, texture: &str, dest: Rect) {
        self.push(DrawCmd::Blit {
            texture: texture.to_string(),
            source: None,
            dest,
            flip_v: false,
        });
    }

    pub fn blit_region(&mut self, texture: &str, source: Rect, dest: Rect) {
        self.push(DrawCmd::Blit {
            texture: texture.to_string(),
            source: Some(source),
            dest,
            flip_v: false,
        });
    }

    /// Whole texture of size `w`x`h` centred on `center`.
    pub fn blit_centered(&mut self, texture: &str, center: Vec2, w: f32, h: f32, flip_v: bool) {
        self.push(DrawCmd::Blit {
            texture: texture.to_string(),
            source: None,
            dest: Rect::centered(center, w, h),
            flip_v,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCmd::FillRect { rect, color });
    }

    pub fn outline_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.push(DrawCmd::OutlineRect {
            rect,
            thickness,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.push(DrawCmd::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: Color) {
        self.push(DrawCmd::Text {
            text: text.into(),
            position,
            size,
            color,
        });
    }
}
