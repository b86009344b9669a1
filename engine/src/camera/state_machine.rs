//! Camera state machine
//!
//! Owns one state object per [`StateKind`] (created on first activation) and
//! forwards the per-frame calls to whichever is current.

use std::collections::HashMap;

use glam::Vec2;
use tracing::debug;

use super::states::{CameraState, StateContext, StateKind, Transition, create_state};

#[derive(Default)]
pub struct CameraStateMachine {
    states: HashMap<StateKind, Box<dyn CameraState>>,
    current: Option<StateKind>,
}

impl std::fmt::Debug for CameraStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut created: Vec<_> = self.states.keys().copied().collect();
        created.sort_by_key(|k| k.name());
        f.debug_struct("CameraStateMachine")
            .field("current", &self.current)
            .field("created", &created)
            .finish()
    }
}

impl CameraStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `state` for its kind instead of the stock implementation.
    ///
    /// Replacing the current state swaps the object without calling `exit`
    /// or `enter`.
    pub fn install(&mut self, state: Box<dyn CameraState>) {
        self.states.insert(state.kind(), state);
    }

    pub fn current(&self) -> Option<StateKind> {
        self.current
    }

    /// Whether a state object for `kind` exists yet.
    pub fn has_state(&self, kind: StateKind) -> bool {
        self.states.contains_key(&kind)
    }

    /// Make `kind` current: `exit` on the outgoing state, then `enter` on the
    /// incoming one. Asking for the current state does nothing.
    ///
    /// Returns whether the state changed.
    pub fn set_current_state(&mut self, kind: StateKind, ctx: &mut StateContext<'_>) -> bool {
        if self.current == Some(kind) {
            return false;
        }

        let previous = self.current;
        if let Some(state) = previous.and_then(|prev| self.states.get_mut(&prev)) {
            state.exit(ctx);
        }

        let settings = &*ctx.settings;
        let state = self
            .states
            .entry(kind)
            .or_insert_with(|| create_state(kind, settings));
        self.current = Some(kind);
        state.enter(ctx);

        debug!(from = ?previous, to = %kind, "Camera state changed");
        true
    }

    /// Run the update phase of the current state.
    pub fn update_state(&mut self, ctx: &mut StateContext<'_>) -> Transition {
        match self.current_mut() {
            Some(state) => state.update(ctx),
            None => Transition::Stay,
        }
    }

    /// Run the pose phase of the current state.
    pub fn late_update_state(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(state) = self.current_mut() {
            state.late_update(ctx);
        }
    }

    /// Forward look input to the current state.
    pub fn handle_input(&mut self, ctx: &mut StateContext<'_>, look: Vec2) {
        if let Some(state) = self.current_mut() {
            state.handle_input(ctx, look);
        }
    }

    fn current_mut(&mut self) -> Option<&mut Box<dyn CameraState>> {
        let kind = self.current?;
        self.states.get_mut(&kind)
    }
}
