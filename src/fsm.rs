//! Per-ghost state registry and guarded transitions.
//!
//! The machine holds no behaviour of its own. It owns one state object per
//! [`GhostStateId`], remembers which one is active, and runs exit/enter hooks
//! when asked to switch. Everything a ghost actually does lives in
//! [`crate::states`].

use rand::Rng;
use tracing::debug;

use crate::components::GridPos;
use crate::error::GhostError;
use crate::ghost::GhostBody;
use crate::level::BoardQuery;
use crate::states::GhostState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostStateId {
    Idle,
    Scatter,
    Chase,
    Frightened,
    Eaten,
}

impl GhostStateId {
    pub const COUNT: usize = 5;
    pub const ALL: [GhostStateId; GhostStateId::COUNT] = [
        GhostStateId::Idle,
        GhostStateId::Scatter,
        GhostStateId::Chase,
        GhostStateId::Frightened,
        GhostStateId::Eaten,
    ];

    pub fn index(self) -> usize {
        match self {
            GhostStateId::Idle => 0,
            GhostStateId::Scatter => 1,
            GhostStateId::Chase => 2,
            GhostStateId::Frightened => 3,
            GhostStateId::Eaten => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GhostStateId::Idle => "Idle",
            GhostStateId::Scatter => "Scatter",
            GhostStateId::Chase => "Chase",
            GhostStateId::Frightened => "Frightened",
            GhostStateId::Eaten => "Eaten",
        }
    }
}

#[derive(Debug)]
pub struct GhostStateMachine {
    slots: [Option<GhostState>; GhostStateId::COUNT],
    current: GhostStateId,
    // Some(current) once a transition resolved a registered slot.
    active: Option<GhostStateId>,
}

impl Default for GhostStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GhostStateMachine {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            current: GhostStateId::Idle,
            active: None,
        }
    }

    /// Builds a machine with every given state registered.
    pub fn with_states(states: impl IntoIterator<Item = GhostState>) -> Result<Self, GhostError> {
        let mut machine = Self::new();
        for state in states {
            machine.register(state.id(), state)?;
        }
        Ok(machine)
    }

    /// Binds `id` to `state`. Each id may be bound once.
    pub fn register(&mut self, id: GhostStateId, state: GhostState) -> Result<(), GhostError> {
        debug_assert!(
            self.slots[id.index()].is_none(),
            "state {id:?} registered twice"
        );
        if self.slots[id.index()].is_some() {
            return Err(GhostError::DuplicateState(id));
        }
        if state.id() != id {
            return Err(GhostError::MismatchedState {
                slot: id,
                state: state.id(),
            });
        }
        self.slots[id.index()] = Some(state);
        Ok(())
    }

    pub fn is_registered(&self, id: GhostStateId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Switches to `next`, running exit/enter hooks. Returns whether anything changed.
    ///
    /// Re-entering the current state and Eaten → Frightened are ignored.
    /// `board` is `None` while the owning ghost is still being built.
    pub fn transition(
        &mut self,
        next: GhostStateId,
        body: &mut GhostBody,
        board: Option<&dyn BoardQuery>,
    ) -> bool {
        if self.active.is_some() {
            if self.current == GhostStateId::Eaten && next == GhostStateId::Frightened {
                debug!(ghost = ?body.kind, "eaten ghost cannot be frightened");
                return false;
            }
            if self.current == next {
                return false;
            }
        }

        if let Some(state) = self.active_state() {
            state.on_exit(body, board);
        }

        let previous = self.current;
        self.current = next;
        self.active = self.slots[next.index()].as_ref().map(|_| next);

        if let Some(state) = self.active_state() {
            state.on_enter(body, board);
        }

        debug!(ghost = ?body.kind, from = ?previous, to = ?next, "ghost state transition");
        true
    }

    /// Makes `id` current without running any hooks.
    pub fn force(&mut self, id: GhostStateId) {
        self.current = id;
        self.active = self.slots[id.index()].as_ref().map(|_| id);
    }

    /// Runs the active state's update and applies any transition it asks for.
    pub fn tick(
        &mut self,
        body: &mut GhostBody,
        board: &dyn BoardQuery,
        player: GridPos,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        let request = match self.active_state() {
            Some(state) => state.on_update(body, board, player, dt, rng),
            None => return,
        };
        if let Some(next) = request {
            self.transition(next, body, Some(board));
        }
    }

    pub fn current(&self) -> GhostStateId {
        self.current
    }

    /// Name of the active state object, or "None" when nothing is active.
    pub fn current_name(&self) -> &'static str {
        self.active_state().map_or("None", GhostState::name)
    }

    fn active_state(&self) -> Option<&GhostState> {
        self.active.and_then(|id| self.slots[id.index()].as_ref())
    }
}
