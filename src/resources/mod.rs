//! Resources shared by the game loop, the screens and the backend.
//!
//! - [`assets`] – texture, sound and music keys declared by each game
//! - [`audio`] – audio commands queued during a tick
//! - [`bitmapfont`] – fixed-cell bitmap font drawing
//! - [`frameclock`] – monotonic elapsed time and frame throttling
//! - [`gameconfig`] – INI-backed settings
//! - [`input`] – per-frame keyboard and pointer state
//! - [`platform`] – the backend contract used by the game loop
//! - [`surface`] – draw-command buffer a frame is painted into
//! - [`worldtime`] – simulation clock of an entity world

pub mod assets;
pub mod audio;
pub mod bitmapfont;
pub mod frameclock;
pub mod gameconfig;
pub mod input;
pub mod platform;
pub mod surface;
pub mod worldtime;
