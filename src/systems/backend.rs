//! raylib implementation of [`Platform`].
//!
//! Opens the window, loads every texture of the game's [`AssetManifest`],
//! starts the audio thread and replays each frame's [`DrawCmd`] list.

use log::{info, warn};
use raylib::prelude::*;
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::components::rect::Rect;
use crate::error::GameError;
use crate::events::audio::AudioCmd;
use crate::resources::assets::AssetManifest;
use crate::resources::frameclock::FrameClock;
use crate::resources::input::{InputState, Key};
use crate::resources::platform::Platform;
use crate::resources::surface::{self, DrawCmd, Surface};
use crate::systems::audio::AudioBridge;

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: FxHashMap<String, Texture2D>,
    clock: FrameClock,
    audio: Option<AudioBridge>,
}

impl RaylibPlatform {
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        target_fps: u32,
        assets: &AssetManifest,
        root: &Path,
    ) -> Result<Self, GameError> {
        let (mut rl, thread) = raylib::init()
            .size(width as i32, height as i32)
            .title(title)
            .build();
        // Escape belongs to the games.
        rl.set_exit_key(None);

        let mut textures = FxHashMap::default();
        for (key, relative) in &assets.textures {
            let path = root.join(relative);
            let texture = rl
                .load_texture(&thread, &path.to_string_lossy())
                .map_err(|e| GameError::Asset {
                    key: key.clone(),
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            textures.insert(key.clone(), texture);
        }
        info!("{}: {} textures loaded from {:?}", title, textures.len(), root);

        let audio = AudioBridge::spawn();
        audio.send(assets.audio_load_cmds(root));

        Ok(Self {
            rl,
            thread,
            textures,
            clock: FrameClock::new(target_fps),
            audio: Some(audio),
        })
    }
}

fn keyboard_key(key: Key) -> Option<KeyboardKey> {
    Some(match key {
        Key::None => return None,
        Key::W => KeyboardKey::KEY_W,
        Key::A => KeyboardKey::KEY_A,
        Key::S => KeyboardKey::KEY_S,
        Key::D => KeyboardKey::KEY_D,
        Key::Up => KeyboardKey::KEY_UP,
        Key::Down => KeyboardKey::KEY_DOWN,
        Key::Left => KeyboardKey::KEY_LEFT,
        Key::Right => KeyboardKey::KEY_RIGHT,
        Key::Escape => KeyboardKey::KEY_ESCAPE,
        Key::Space => KeyboardKey::KEY_SPACE,
        Key::Enter => KeyboardKey::KEY_ENTER,
    })
}

fn color(c: surface::Color) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

fn rectangle(r: Rect) -> Rectangle {
    Rectangle::new(r.x, r.y, r.w, r.h)
}

fn vector(v: glam::Vec2) -> Vector2 {
    Vector2::new(v.x, v.y)
}

impl Platform for RaylibPlatform {
    fn poll_input(&mut self, input: &mut InputState) {
        for state in input.keys_mut() {
            let down = keyboard_key(state.key_binding).is_some_and(|k| self.rl.is_key_down(k));
            state.update(down);
        }
        let mouse = self.rl.get_mouse_position();
        input.pointer_position = glam::Vec2::new(mouse.x, mouse.y);
        input.pointer_pressed = self
            .rl
            .is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT)
            .then_some(input.pointer_position);
        input.quit_requested = self.rl.window_should_close();
    }

    fn elapsed_ms(&mut self) -> u32 {
        self.clock.tick()
    }

    fn present(&mut self, surface: &Surface, audio: Vec<AudioCmd>) -> Result<(), GameError> {
        if let Some(bridge) = &self.audio {
            bridge.send(audio);
            bridge.drain_messages();
        }

        let mut d = self.rl.begin_drawing(&self.thread);
        for cmd in surface.commands() {
            match cmd {
                DrawCmd::Clear(c) => d.clear_background(color(*c)),
                DrawCmd::Blit {
                    texture,
                    source,
                    dest,
                    flip_v,
                } => {
                    let Some(tex) = self.textures.get(texture) else {
                        warn!("no texture '{}'", texture);
                        continue;
                    };
                    let mut src = source.unwrap_or(Rect::new(
                        0.0,
                        0.0,
                        tex.width as f32,
                        tex.height as f32,
                    ));
                    if *flip_v {
                        src.h = -src.h;
                    }
                    d.draw_texture_pro(
                        tex,
                        rectangle(src),
                        rectangle(*dest),
                        Vector2::zero(),
                        0.0,
                        Color::WHITE,
                    );
                }
                DrawCmd::FillRect { rect, color: c } => {
                    d.draw_rectangle_rec(rectangle(*rect), color(*c))
                }
                DrawCmd::OutlineRect {
                    rect,
                    thickness,
                    color: c,
                } => d.draw_rectangle_lines_ex(rectangle(*rect), *thickness, color(*c)),
                DrawCmd::Line {
                    from,
                    to,
                    thickness,
                    color: c,
                } => d.draw_line_ex(vector(*from), vector(*to), *thickness, color(*c)),
                DrawCmd::Circle {
                    center,
                    radius,
                    color: c,
                } => d.draw_circle_v(vector(*center), *radius, color(*c)),
                DrawCmd::Text {
                    text,
                    position,
                    size,
                    color: c,
                } => d.draw_text(
                    text,
                    position.x as i32,
                    position.y as i32,
                    *size as i32,
                    color(*c),
                ),
            }
        }
        Ok(())
    }

    fn throttle(&mut self) {
        self.clock.throttle();
    }

    fn shutdown(&mut self) {
        if let Some(bridge) = self.audio.take() {
            bridge.shutdown();
        }
        self.textures.clear();
        info!("backend shut down");
    }
}
