//! Entity behaviour state machine.
//!
//! A [`StateMachine`] holds the behaviour states of one actor (an ant, a
//! hacker, a terminal, the invader swarm...) and drives exactly one active
//! state per tick.
//!
//! # Architecture
//!
//! - **States are enum variants.** Each machine is instantiated over its own
//!   closed enumeration `S`. A variant may carry per-state data such as a
//!   countdown or a flag; its [`Keyed::key`] is a fieldless companion enum.
//! - **Four callbacks per state** (all optional):
//!   - `entry_actions` – once, when the state becomes active
//!   - `exit_actions` – once, when the state stops being active
//!   - `do_actions` – every tick while active
//!   - `check_conditions` – every tick after `do_actions`, returns the key to
//!     move to, or `None` to stay
//! - **The entity is an explicit parameter.** Callbacks receive the owning
//!   entity (or an agent view over it) as `&mut A`. States never store a
//!   reference back to their owner.
//!
//! # Transition rules
//!
//! [`StateMachine::set_state`] is the only way the active state changes. It
//! fails with [`StateMachineError::Unregistered`] before touching anything if
//! the key is unknown. A state that returns its own key from
//! `check_conditions` is exited and entered again.
//!
//! # Example
//!
//! ```
//! use tickengine::components::statemachine::{Keyed, State, StateMachine};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum DoorKey { Closed, Open }
//!
//! enum Door { Closed, Open { open_ms: u32 } }
//!
//! impl Keyed for Door {
//!     type Key = DoorKey;
//!     fn key(&self) -> DoorKey {
//!         match self {
//!             Door::Closed => DoorKey::Closed,
//!             Door::Open { .. } => DoorKey::Open,
//!         }
//!     }
//! }
//!
//! impl State<bool> for Door {
//!     fn entry_actions(&mut self, lit: &mut bool) {
//!         if let Door::Open { open_ms } = self {
//!             *open_ms = 0;
//!             *lit = true;
//!         }
//!     }
//!     fn do_actions(&mut self, _lit: &mut bool, elapsed_ms: u32) {
//!         if let Door::Open { open_ms } = self {
//!             *open_ms += elapsed_ms;
//!         }
//!     }
//!     fn check_conditions(&mut self, _lit: &mut bool) -> Option<DoorKey> {
//!         match self {
//!             Door::Open { open_ms } if *open_ms >= 1000 => Some(DoorKey::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut lit = false;
//! let mut door = StateMachine::new()
//!     .with_state(Door::Closed).unwrap()
//!     .with_state(Door::Open { open_ms: 0 }).unwrap();
//! door.set_state(DoorKey::Open, &mut lit).unwrap();
//! door.think(&mut lit, 600).unwrap();
//! door.think(&mut lit, 600).unwrap();
//! assert_eq!(door.active_key(), Some(DoorKey::Closed));
//! ```

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::StateMachineError;

/// Something registered under a key.
///
/// Split from [`State`] so the machine's storage does not depend on the agent
/// type its states are driven with.
pub trait Keyed {
    type Key: Copy + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// Behaviour callbacks of a state, driven with an agent of type `A`.
pub trait State<A: ?Sized>: Keyed {
    fn entry_actions(&mut self, _agent: &mut A) {}

    fn exit_actions(&mut self, _agent: &mut A) {}

    fn do_actions(&mut self, _agent: &mut A, _elapsed_ms: u32) {}

    fn check_conditions(&mut self, _agent: &mut A) -> Option<Self::Key> {
        None
    }
}

/// Registry of states plus the key of the active one.
///
/// Invariant: `active` is `None` or a key present in `states`. Once a state
/// has been set the machine never goes back to having no active state.
pub struct StateMachine<S: Keyed> {
    states: FxHashMap<S::Key, S>,
    active: Option<S::Key>,
}

impl<S: Keyed> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Keyed> StateMachine<S> {
    pub fn new() -> Self {
        Self {
            states: FxHashMap::default(),
            active: None,
        }
    }

    /// Register `state` under its key, replacing any earlier registration.
    ///
    /// Returns the displaced state, if there was one.
    pub fn add_state(&mut self, state: S) -> Option<S> {
        let key = state.key();
        let previous = self.states.insert(key, state);
        if previous.is_some() {
            warn!("state {:?} was registered again and replaced", key);
        }
        previous
    }

    /// Register `state`, rejecting a key that is already taken.
    pub fn register(&mut self, state: S) -> Result<(), StateMachineError> {
        let key = state.key();
        if self.states.contains_key(&key) {
            return Err(StateMachineError::Duplicate(format!("{:?}", key)));
        }
        self.states.insert(key, state);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_state(mut self, state: S) -> Result<Self, StateMachineError> {
        self.register(state)?;
        Ok(self)
    }

    pub fn active_key(&self) -> Option<S::Key> {
        self.active
    }

    pub fn active(&self) -> Option<&S> {
        self.active.and_then(|key| self.states.get(&key))
    }

    pub fn get(&self, key: S::Key) -> Option<&S> {
        self.states.get(&key)
    }

    pub fn get_mut(&mut self, key: S::Key) -> Option<&mut S> {
        self.states.get_mut(&key)
    }

    pub fn contains(&self, key: S::Key) -> bool {
        self.states.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Make `key` the active state.
    ///
    /// Runs the current state's exit actions, then the new state's entry
    /// actions. An unregistered key leaves the machine untouched.
    pub fn set_state<A: ?Sized>(
        &mut self,
        key: S::Key,
        agent: &mut A,
    ) -> Result<(), StateMachineError>
    where
        S: State<A>,
    {
        if !self.states.contains_key(&key) {
            return Err(StateMachineError::Unregistered(format!("{:?}", key)));
        }

        if let Some(current) = self.active
            && let Some(state) = self.states.get_mut(&current)
        {
            state.exit_actions(agent);
        }

        debug!("state machine: {:?} -> {:?}", self.active, key);
        self.active = Some(key);

        if let Some(state) = self.states.get_mut(&key) {
            state.entry_actions(agent);
        }
        Ok(())
    }

    /// Run one tick of the active state.
    ///
    /// Does nothing without an active state. Otherwise runs `do_actions`,
    /// then `check_conditions`, then at most one transition.
    pub fn think<A: ?Sized>(
        &mut self,
        agent: &mut A,
        elapsed_ms: u32,
    ) -> Result<(), StateMachineError>
    where
        S: State<A>,
    {
        let Some(current) = self.active else {
            return Ok(());
        };
        let Some(state) = self.states.get_mut(&current) else {
            return Ok(());
        };

        state.do_actions(agent, elapsed_ms);
        match state.check_conditions(agent) {
            Some(next) => self.set_state(next, agent),
            None => Ok(()),
        }
    }
}

impl<S: Keyed> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("active", &self.active)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}
