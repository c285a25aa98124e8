//! Screen transitions.
//!
//! A screen's `update` returns at most one [`Transition`]. The
//! [`Game`](crate::game::Game) applies it after the update has run to
//! completion, bracketing the switch with the old screen's `on_exit` and the
//! new screen's `on_enter`.

use std::fmt;

use crate::game::GameState;

pub enum Transition<K> {
    /// Switch to a registered screen.
    Change(K),
    /// Store `screen` under `K` (replacing whatever was there) and switch to it.
    /// Used for screens built on the spot, such as a results message.
    Replace(K, Box<dyn GameState<K>>),
    /// Terminal transition: stop the loop and shut the platform down.
    Quit,
}

impl<K> Transition<K> {
    /// Screen this transition leads to, `None` for `Quit`.
    pub fn target(&self) -> Option<&K> {
        match self {
            Transition::Change(key) | Transition::Replace(key, _) => Some(key),
            Transition::Quit => None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Transition<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Change(key) => f.debug_tuple("Change").field(key).finish(),
            Transition::Replace(key, _) => f.debug_tuple("Replace").field(key).finish(),
            Transition::Quit => f.write_str("Quit"),
        }
    }
}
