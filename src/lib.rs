//! tickengine library.
//!
//! A small fixed-tick 2D game framework and four arcade games built on it:
//!
//! - [`components`] – the entity state machine and the small value types the
//!   games share (rectangles, timers, seek intents, sprites)
//! - [`game`] – the screen trait and the game loop
//! - [`events`] – screen transitions and audio commands
//! - [`resources`] – configuration, input, frame surface, fonts, the backend
//!   contract
//! - [`screens`] – main menu and timed message screens
//! - [`systems`] – `bevy_ecs` systems and the raylib backend
//! - [`games`] – ants, invaders, platformer and terminals

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod games;
pub mod resources;
pub mod screens;
pub mod systems;
