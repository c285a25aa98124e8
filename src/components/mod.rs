//! Components and small value types shared by every game.
//!
//! - [`statemachine`] – behaviour state machine driving one actor
//! - [`mapposition`] – world-space position of an ECS entity
//! - [`seek`] – walk-toward-a-destination intent
//! - [`boxcollider`] – collision box relative to an entity position
//! - [`rect`] – axis-aligned rectangle with overlap tests
//! - [`sprite`] – texture drawn centred on an entity
//! - [`timer`] – millisecond countdown

pub mod boxcollider;
pub mod mapposition;
pub mod rect;
pub mod seek;
pub mod sprite;
pub mod statemachine;
pub mod timer;
