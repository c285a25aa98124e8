//! Engine systems.
//!
//! - [`movement`] – walk seeking entities toward their destination
//! - [`render`] – paint entity sprites into the frame surface
//! - [`time`] – advance the simulation clock of an entity world
//! - [`audio`] – the raylib audio thread (feature `raylib`)
//! - [`backend`] – the raylib [`Platform`](crate::resources::platform::Platform)
//!   (feature `raylib`)

#[cfg(feature = "raylib")]
pub mod audio;
#[cfg(feature = "raylib")]
pub mod backend;
pub mod movement;
pub mod render;
pub mod time;
