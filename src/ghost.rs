use rand::Rng;
use tracing::debug;

use crate::components::{at_center, cell_of, center_of, Colour, Direction, GridPos, Point};
use crate::config::GhostTuning;
use crate::constants::{actor_radius, COLLISION_PAD, MOVE_EPS};
use crate::error::GhostError;
use crate::fsm::{GhostStateId, GhostStateMachine};
use crate::level::{BoardQuery, GlobalMode};
use crate::states::GhostState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const COUNT: usize = 4;
    pub const ALL: [GhostKind; GhostKind::COUNT] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn index(self) -> usize {
        match self {
            GhostKind::Blinky => 0,
            GhostKind::Pinky => 1,
            GhostKind::Inky => 2,
            GhostKind::Clyde => 3,
        }
    }

    pub fn colour(self) -> Colour {
        match self {
            GhostKind::Blinky => Colour::Red,
            GhostKind::Pinky => Colour::Magenta,
            GhostKind::Inky => Colour::Cyan,
            GhostKind::Clyde => Colour::Orange,
        }
    }
}

/// Everything about a ghost that its states read and write.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostBody {
    pub kind: GhostKind,
    pub cell: GridPos,
    pub spawn: GridPos,
    pub pos: Point,
    /// Always the centre of some grid cell.
    pub target: Point,
    pub dir: Direction,
    pub speed: f32,
    pub base_speed: f32,
    pub colour: Colour,
    pub base_colour: Colour,
}

impl GhostBody {
    pub fn new(kind: GhostKind, spawn: GridPos, colour: Colour, base_speed: f32) -> Self {
        let centre = center_of(spawn);
        Self {
            kind,
            cell: spawn,
            spawn,
            pos: centre,
            target: centre,
            dir: Direction::None,
            speed: base_speed,
            base_speed,
            colour,
            base_colour: colour,
        }
    }

    /// Sitting on the centre of the tile it was heading for.
    pub fn is_centered(&self) -> bool {
        at_center(self.pos, self.target)
    }

    pub fn sync_cell(&mut self) {
        self.cell = cell_of(self.pos);
    }

    /// Aims at the neighbour in `dir`, or stays on this cell if that is a wall.
    pub fn commit_direction(&mut self, board: &dyn BoardQuery) {
        let next = self.cell.step(self.dir);
        self.target = if board.is_wall(next) {
            center_of(self.cell)
        } else {
            center_of(next)
        };
    }
}

/// What the renderer needs to draw one ghost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostSprite {
    pub kind: GhostKind,
    pub pos: Point,
    pub colour: Colour,
    pub state_name: &'static str,
}

#[derive(Debug)]
pub struct GhostAgent {
    body: GhostBody,
    fsm: GhostStateMachine,
}

impl GhostAgent {
    /// A ghost parked in Idle at `spawn`.
    pub fn new(
        kind: GhostKind,
        spawn: GridPos,
        colour: Colour,
        tuning: &GhostTuning,
    ) -> Result<Self, GhostError> {
        let mut body = GhostBody::new(kind, spawn, colour, tuning.base_speed);
        let mut fsm = GhostStateMachine::with_states(GhostState::standard_set(tuning))?;
        fsm.transition(GhostStateId::Idle, &mut body, None);
        Ok(Self { body, fsm })
    }

    /// Advances one frame. Returns true if the ghost touched the player.
    ///
    /// Who eats whom is up to the caller.
    pub fn update(
        &mut self,
        board: &dyn BoardQuery,
        player: GridPos,
        dt: f32,
        rng: &mut impl Rng,
    ) -> bool {
        self.fsm.tick(&mut self.body, board, player, dt, rng);

        let body = &mut self.body;
        if body.is_centered() {
            body.sync_cell();
            if board.is_wall(body.cell.step(body.dir)) {
                body.dir = Direction::None;
            }
            body.commit_direction(board);
        }

        body.pos = body.pos.step_towards(body.target, body.speed * dt, MOVE_EPS);

        if self.fsm.current() == GhostStateId::Eaten {
            return false;
        }
        let reach = actor_radius() * 2.0 + COLLISION_PAD;
        self.body.pos.distance(board.player_position()) <= reach
    }

    pub fn enter_frightened(&mut self, board: &dyn BoardQuery) {
        if self.state() == GhostStateId::Eaten {
            return;
        }
        self.fsm.transition(GhostStateId::Frightened, &mut self.body, Some(board));
    }

    pub fn exit_frightened(&mut self, board: &dyn BoardQuery) {
        if self.state() != GhostStateId::Frightened {
            return;
        }
        let next = mode_state(board.global_mode());
        self.fsm.transition(next, &mut self.body, Some(board));
    }

    pub fn set_eaten(&mut self, board: &dyn BoardQuery) {
        self.fsm.transition(GhostStateId::Eaten, &mut self.body, Some(board));
    }

    /// Follows a Scatter/Chase flip unless busy being Idle, Frightened or Eaten.
    pub fn on_global_mode_change(&mut self, board: &dyn BoardQuery, mode: GlobalMode) {
        if matches!(
            self.state(),
            GhostStateId::Idle | GhostStateId::Frightened | GhostStateId::Eaten
        ) {
            return;
        }
        self.fsm.transition(mode_state(mode), &mut self.body, Some(board));
    }

    /// Lets an Idle ghost out into the current global mode.
    pub fn release(&mut self, board: &dyn BoardQuery) {
        if self.state() != GhostStateId::Idle {
            return;
        }
        debug!(ghost = ?self.body.kind, "released");
        self.fsm
            .transition(mode_state(board.global_mode()), &mut self.body, Some(board));
    }

    /// Back to spawn and Idle, skipping whatever the old state would do on exit.
    pub fn reset_to_spawn(&mut self) {
        let body = &mut self.body;
        body.cell = body.spawn;
        body.pos = center_of(body.spawn);
        body.target = body.pos;
        body.dir = Direction::None;
        body.colour = body.base_colour;
        body.speed = body.base_speed;
        self.fsm.force(GhostStateId::Idle);
    }

    pub fn state(&self) -> GhostStateId {
        self.fsm.current()
    }

    pub fn state_name(&self) -> &'static str {
        self.fsm.current_name()
    }

    pub fn kind(&self) -> GhostKind {
        self.body.kind
    }

    pub fn cell(&self) -> GridPos {
        self.body.cell
    }

    pub fn body(&self) -> &GhostBody {
        &self.body
    }

    pub fn sprite(&self) -> GhostSprite {
        GhostSprite {
            kind: self.body.kind,
            pos: self.body.pos,
            colour: self.body.colour,
            state_name: self.state_name(),
        }
    }
}

fn mode_state(mode: GlobalMode) -> GhostStateId {
    match mode {
        GlobalMode::Scatter => GhostStateId::Scatter,
        GlobalMode::Chase => GhostStateId::Chase,
    }
}
