//! Fixed-tick game loop and application screens.
//!
//! A [`Game`] owns every screen of one application, keyed by a per-game enum,
//! plus the single current screen, the frame [`Surface`], the input snapshot
//! and the audio queue. There are no globals: `main` owns the game and lends
//! it a [`Platform`].
//!
//! # Loop
//!
//! [`Game::run`] enters the initial screen and then, once per iteration:
//!
//! 1. drains the platform's input events into [`InputState`]; a quit request
//!    is handled as the terminal transition
//! 2. reads the elapsed milliseconds (uncapped) from the platform clock
//! 3. calls the current screen's [`GameState::update`]
//! 4. applies the returned [`Transition`], if any
//! 5. clears the surface and calls [`GameState::draw`]
//! 6. presents the surface and the queued audio commands, then throttles
//!
//! Transitions are point-to-point: each screen knows the keys of its
//! successors. The loop only checks that the key was registered.

use log::{debug, info};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use glam::Vec2;

use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::resources::assets::AssetManifest;
use crate::resources::audio::AudioQueue;
use crate::resources::input::InputState;
use crate::resources::platform::Platform;
use crate::resources::surface::{Color, Surface};

/// Everything a screen sees during one tick.
pub struct Tick<'a> {
    pub elapsed_ms: u32,
    /// Pointer-down position this frame, if the button went down.
    pub pointer: Option<Vec2>,
    pub input: &'a InputState,
    pub audio: &'a mut AudioQueue,
}

/// One full-window application mode: a menu, the play field, an
/// interstitial, a mini-game.
pub trait GameState<K> {
    /// Called when the screen becomes current. `previous` is the screen that
    /// was current before, if any.
    fn on_enter(&mut self, _previous: Option<K>, _audio: &mut AudioQueue) {}

    /// Called when the screen stops being current.
    fn on_exit(&mut self, _audio: &mut AudioQueue) {}

    fn update(&mut self, _tick: &mut Tick<'_>) -> Result<Option<Transition<K>>, GameError> {
        Ok(None)
    }

    fn draw(&mut self, _surface: &mut Surface) {}
}

/// Keys usable for screens.
pub trait ScreenKey: Copy + Eq + Hash + fmt::Debug + 'static {}

impl<T: Copy + Eq + Hash + fmt::Debug + 'static> ScreenKey for T {}

/// Whether the loop keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Game<K: ScreenKey> {
    title: String,
    screens: FxHashMap<K, Box<dyn GameState<K>>>,
    current: Option<K>,
    running: bool,
    background: Color,
    surface: Surface,
    input: InputState,
    audio: AudioQueue,
    assets: AssetManifest,
}

impl<K: ScreenKey> Game<K> {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            screens: FxHashMap::default(),
            current: None,
            running: true,
            background: Color::BLACK,
            surface: Surface::new(width, height),
            input: InputState::default(),
            audio: AudioQueue::new(),
            assets: AssetManifest::new(),
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_assets(mut self, assets: AssetManifest) -> Self {
        self.assets = assets;
        self
    }

    /// Register a screen. A key can only be registered once.
    pub fn add_screen(
        &mut self,
        key: K,
        screen: impl GameState<K> + 'static,
    ) -> Result<(), GameError> {
        if self.screens.contains_key(&key) {
            return Err(GameError::DuplicateScreen(format!("{:?}", key)));
        }
        self.screens.insert(key, Box::new(screen));
        Ok(())
    }

    pub fn with_screen(
        mut self,
        key: K,
        screen: impl GameState<K> + 'static,
    ) -> Result<Self, GameError> {
        self.add_screen(key, screen)?;
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn audio(&self) -> &AudioQueue {
        &self.audio
    }

    pub fn assets(&self) -> &AssetManifest {
        &self.assets
    }

    pub fn has_screen(&self, key: K) -> bool {
        self.screens.contains_key(&key)
    }

    /// Switch screens.
    ///
    /// `None` is the terminal request: the current screen is exited, the loop
    /// stops and the platform is shut down. Audio queued by the last
    /// `on_exit` is discarded, since shutdown releases every sound anyway.
    /// An unregistered key fails before anything changes.
    pub fn change_state(
        &mut self,
        next: Option<K>,
        platform: &mut dyn Platform,
    ) -> Result<Flow, GameError> {
        self.switch(next, None, platform)
    }

    fn switch(
        &mut self,
        next: Option<K>,
        replacement: Option<Box<dyn GameState<K>>>,
        platform: &mut dyn Platform,
    ) -> Result<Flow, GameError> {
        if let Some(key) = next
            && replacement.is_none()
            && !self.screens.contains_key(&key)
        {
            return Err(GameError::UnknownScreen(format!("{:?}", key)));
        }

        let previous = self.current;
        if let Some(current) = previous
            && let Some(screen) = self.screens.get_mut(&current)
        {
            debug!("exiting screen {:?}", current);
            screen.on_exit(&mut self.audio);
        }

        let Some(key) = next else {
            info!("{}: terminal transition, shutting down", self.title);
            self.current = None;
            self.running = false;
            let dropped = self.audio.drain();
            if !dropped.is_empty() {
                debug!("dropping {} audio commands at shutdown", dropped.len());
            }
            platform.shutdown();
            return Ok(Flow::Exit);
        };

        if let Some(screen) = replacement {
            self.screens.insert(key, screen);
        }

        info!("{}: screen {:?} -> {:?}", self.title, previous, key);
        self.current = Some(key);
        if let Some(screen) = self.screens.get_mut(&key) {
            screen.on_enter(previous, &mut self.audio);
        }
        Ok(Flow::Continue)
    }

    /// Apply a transition returned by a screen.
    pub fn apply(
        &mut self,
        transition: Transition<K>,
        platform: &mut dyn Platform,
    ) -> Result<Flow, GameError> {
        match transition {
            Transition::Change(key) => self.switch(Some(key), None, platform),
            Transition::Replace(key, screen) => self.switch(Some(key), Some(screen), platform),
            Transition::Quit => self.switch(None, None, platform),
        }
    }

    /// One tick: update the current screen, apply its transition, then paint
    /// the frame. Does not touch input or the clock.
    pub fn step(&mut self, elapsed_ms: u32, platform: &mut dyn Platform) -> Result<Flow, GameError> {
        let Some(key) = self.current else {
            return Ok(Flow::Exit);
        };

        let transition = match self.screens.get_mut(&key) {
            Some(screen) => {
                let mut tick = Tick {
                    elapsed_ms,
                    pointer: self.input.pointer_pressed,
                    input: &self.input,
                    audio: &mut self.audio,
                };
                screen.update(&mut tick)?
            }
            None => return Err(GameError::UnknownScreen(format!("{:?}", key))),
        };

        if let Some(transition) = transition
            && self.apply(transition, platform)? == Flow::Exit
        {
            return Ok(Flow::Exit);
        }

        self.surface.clear(self.background);
        if let Some(current) = self.current
            && let Some(screen) = self.screens.get_mut(&current)
        {
            screen.draw(&mut self.surface);
        }
        Ok(Flow::Continue)
    }

    /// Run until a terminal transition.
    pub fn run(&mut self, initial: K, platform: &mut dyn Platform) -> Result<(), GameError> {
        info!("{}: starting at {:?}", self.title, initial);
        if self.change_state(Some(initial), platform)? == Flow::Exit {
            return Ok(());
        }
        // The first elapsed value covers start-up, not a frame.
        platform.elapsed_ms();

        while self.running {
            platform.poll_input(&mut self.input);
            if self.input.quit_requested {
                self.change_state(None, platform)?;
                break;
            }

            let elapsed_ms = platform.elapsed_ms();
            if self.step(elapsed_ms, platform)? == Flow::Exit {
                break;
            }

            platform.present(&self.surface, self.audio.drain())?;
            platform.throttle();
        }
        Ok(())
    }
}
