//! Fixed-cell bitmap font.
//!
//! The font is one texture laid out as a grid of square cells, one glyph per
//! cell, starting at the space character. Drawing a string emits one blit per
//! character into the [`Surface`].

use glam::Vec2;

use crate::components::rect::Rect;
use crate::resources::surface::Surface;

#[derive(Debug, Clone)]
pub struct BitmapFont {
    pub texture: String,
    /// Cell width and height in pixels.
    pub cell: u32,
    /// Glyph cells per texture row.
    pub columns: u32,
}

impl BitmapFont {
    pub fn new(texture: impl Into<String>, cell: u32, columns: u32) -> Self {
        Self {
            texture: texture.into(),
            cell,
            columns: columns.max(1),
        }
    }

    /// Glyph index of `ch`. Characters outside the sheet render as '?'.
    pub fn to_index(&self, ch: char) -> u32 {
        let code = ch as u32;
        if (0x20..0x7f).contains(&code) {
            code - 0x20
        } else {
            '?' as u32 - 0x20
        }
    }

    /// Source rectangle of glyph `index` in the font texture.
    pub fn glyph_rect(&self, index: u32) -> Rect {
        let cell = self.cell as f32;
        let col = (index % self.columns) as f32;
        let row = (index / self.columns) as f32;
        Rect::new(col * cell, row * cell, cell, cell)
    }

    pub fn text_width(&self, message: &str) -> f32 {
        (message.chars().count() as u32 * self.cell) as f32
    }

    /// Draw `message` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, surface: &mut Surface, message: &str, x: f32, y: f32) {
        let cell = self.cell as f32;
        for (i, ch) in message.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let source = self.glyph_rect(self.to_index(ch));
            let dest = Rect::new(x + i as f32 * cell, y, cell, cell);
            surface.blit_region(&self.texture, source, dest);
        }
    }

    /// Draw `message` horizontally centred on the surface at height `y`.
    pub fn centre(&self, surface: &mut Surface, message: &str, y: f32) {
        let x = (surface.width as f32 - self.text_width(message)) / 2.0;
        self.draw(surface, message, x, y);
    }

    /// Centre each line of a multi-line message around the vertical middle.
    pub fn centre_block(&self, surface: &mut Surface, message: &str) {
        let lines: Vec<&str> = message.lines().collect();
        let line_height = self.cell as f32 * 2.0;
        let top = (surface.height as f32 - lines.len() as f32 * line_height) / 2.0;
        for (i, line) in lines.iter().enumerate() {
            self.centre(surface, line, top + i as f32 * line_height);
        }
    }

    pub fn glyph_origin(&self, ch: char) -> Vec2 {
        let r = self.glyph_rect(self.to_index(ch));
        Vec2::new(r.x, r.y)
    }
}
