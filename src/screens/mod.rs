//! Screens shared by several games.
//!
//! - [`menu`] – keyboard driven main menu
//! - [`interstitial`] – timed message between two screens

pub mod interstitial;
pub mod menu;
