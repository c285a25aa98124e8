//! Messages passed between screens, the game loop and the backend.
//!
//! - [`audio`] – commands to and replies from the audio thread
//! - [`gamestate`] – screen transitions returned by `GameState::update`

pub mod audio;
pub mod gamestate;
