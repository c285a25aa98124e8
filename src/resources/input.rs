//! Per-frame keyboard and pointer input.
//!
//! The backend fills an [`InputState`] once per loop iteration through
//! [`BoolState::update`]; screens read it through the tick context. Defaults
//! use WASD for primary movement and arrow keys for secondary directions.

use glam::Vec2;

/// Keys the games care about. The backend maps them to its own key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    None,
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Space,
    Enter,
}

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: Key,
}

impl BoolState {
    pub fn bound_to(key_binding: Key) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }

    /// Feed the key's current level; edges are derived from the previous one.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: Key::None,
        }
    }
}

/// Input snapshot for one frame.
#[derive(Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    // Action keys
    pub action_back: BoolState,
    pub action_1: BoolState,
    pub action_2: BoolState,
    /// Where the pointer is right now.
    pub pointer_position: Vec2,
    /// Set only on the frame the primary button went down.
    pub pointer_pressed: Option<Vec2>,
    /// Window close requested.
    pub quit_requested: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound_to(Key::W),
            maindirection_left: BoolState::bound_to(Key::A),
            maindirection_down: BoolState::bound_to(Key::S),
            maindirection_right: BoolState::bound_to(Key::D),
            secondarydirection_up: BoolState::bound_to(Key::Up),
            secondarydirection_down: BoolState::bound_to(Key::Down),
            secondarydirection_left: BoolState::bound_to(Key::Left),
            secondarydirection_right: BoolState::bound_to(Key::Right),
            action_back: BoolState::bound_to(Key::Escape),
            action_1: BoolState::bound_to(Key::Space),
            action_2: BoolState::bound_to(Key::Enter),
            pointer_position: Vec2::ZERO,
            pointer_pressed: None,
            quit_requested: false,
        }
    }
}

impl InputState {
    /// Every key state, for backends that poll by binding.
    pub fn keys_mut(&mut self) -> [&mut BoolState; 11] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.action_back,
            &mut self.action_1,
            &mut self.action_2,
        ]
    }

    /// Set the level of every key bound to `key`.
    pub fn set_key(&mut self, key: Key, down: bool) {
        for state in self.keys_mut() {
            if state.key_binding == key {
                state.update(down);
            }
        }
    }

    /// Advance one frame with no key changes: edges are cleared.
    pub fn settle(&mut self) {
        for state in self.keys_mut() {
            let level = state.active;
            state.update(level);
        }
        self.pointer_pressed = None;
    }

    pub fn up(&self) -> bool {
        self.maindirection_up.active || self.secondarydirection_up.active
    }

    pub fn down(&self) -> bool {
        self.maindirection_down.active || self.secondarydirection_down.active
    }

    pub fn left(&self) -> bool {
        self.maindirection_left.active || self.secondarydirection_left.active
    }

    pub fn right(&self) -> bool {
        self.maindirection_right.active || self.secondarydirection_right.active
    }

    pub fn up_pressed(&self) -> bool {
        self.maindirection_up.just_pressed || self.secondarydirection_up.just_pressed
    }

    /// Space or Enter went down this frame.
    pub fn confirm_pressed(&self) -> bool {
        self.action_1.just_pressed || self.action_2.just_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
        assert_eq!(bs.key_binding, Key::None);
    }

    #[test]
    fn test_boolstate_edges() {
        let mut bs = BoolState::bound_to(Key::Space);
        bs.update(true);
        assert!(bs.active && bs.just_pressed && !bs.just_released);
        bs.update(true);
        assert!(bs.active && !bs.just_pressed);
        bs.update(false);
        assert!(!bs.active && bs.just_released);
    }

    #[test]
    fn test_inputstate_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.maindirection_up.key_binding, Key::W);
        assert_eq!(input.maindirection_left.key_binding, Key::A);
        assert_eq!(input.secondarydirection_down.key_binding, Key::Down);
        assert_eq!(input.action_back.key_binding, Key::Escape);
        assert_eq!(input.action_1.key_binding, Key::Space);
        assert_eq!(input.action_2.key_binding, Key::Enter);
        assert!(input.pointer_pressed.is_none());
        assert!(!input.quit_requested);
    }

    #[test]
    fn test_either_binding_drives_direction() {
        let mut input = InputState::default();
        input.set_key(Key::Left, true);
        assert!(input.left());
        input.set_key(Key::Left, false);
        input.set_key(Key::A, true);
        assert!(input.left());
        assert!(!input.right());
    }

    #[test]
    fn test_settle_clears_edges_and_pointer() {
        let mut input = InputState::default();
        input.set_key(Key::Space, true);
        input.pointer_pressed = Some(Vec2::new(3.0, 4.0));
        assert!(input.confirm_pressed());
        input.settle();
        assert!(!input.confirm_pressed());
        assert!(input.action_1.active);
        assert!(input.pointer_pressed.is_none());
    }
}
