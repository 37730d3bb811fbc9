//! The five ghost behaviours.
//!
//! Each state only makes a decision when the ghost sits exactly on the centre
//! of its current target tile, so a ghost picks at most one new direction per
//! tile it crosses.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{center_of, Colour, Direction, GridPos};
use crate::config::GhostTuning;
use crate::fsm::GhostStateId;
use crate::ghost::{GhostBody, GhostKind};
use crate::heuristics::{best_direction, legal_directions, open_directions};
use crate::level::BoardQuery;

/// Parked at spawn until the coordinator releases the ghost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleState;

/// Heads for the species' home corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterState;

/// Pursues the player with a per-species target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseState {
    pub ambush_offset: i32,
    pub flank_offset: i32,
    pub retreat_distance: i32,
}

/// Random walk at reduced speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrightenedState {
    pub speed_mult: f32,
}

/// Runs back to spawn after being eaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EatenState {
    pub speed_mult: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GhostState {
    Idle(IdleState),
    Scatter(ScatterState),
    Chase(ChaseState),
    Frightened(FrightenedState),
    Eaten(EatenState),
}

impl GhostState {
    pub fn build(id: GhostStateId, tuning: &GhostTuning) -> Self {
        match id {
            GhostStateId::Idle => GhostState::Idle(IdleState),
            GhostStateId::Scatter => GhostState::Scatter(ScatterState),
            GhostStateId::Chase => GhostState::Chase(ChaseState {
                ambush_offset: tuning.ambush_offset,
                flank_offset: tuning.flank_offset,
                retreat_distance: tuning.retreat_distance,
            }),
            GhostStateId::Frightened => GhostState::Frightened(FrightenedState {
                speed_mult: tuning.frightened_speed_mult,
            }),
            GhostStateId::Eaten => GhostState::Eaten(EatenState {
                speed_mult: tuning.eaten_speed_mult,
            }),
        }
    }

    /// One instance of every state, ready to register.
    pub fn standard_set(tuning: &GhostTuning) -> [GhostState; GhostStateId::COUNT] {
        GhostStateId::ALL.map(|id| GhostState::build(id, tuning))
    }

    pub fn id(&self) -> GhostStateId {
        match self {
            GhostState::Idle(_) => GhostStateId::Idle,
            GhostState::Scatter(_) => GhostStateId::Scatter,
            GhostState::Chase(_) => GhostStateId::Chase,
            GhostState::Frightened(_) => GhostStateId::Frightened,
            GhostState::Eaten(_) => GhostStateId::Eaten,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id().name()
    }

    pub fn on_enter(&self, body: &mut GhostBody, _board: Option<&dyn BoardQuery>) {
        match self {
            GhostState::Idle(_) => {
                body.dir = Direction::None;
                body.target = center_of(body.cell);
                body.speed = 0.0;
            }
            GhostState::Scatter(_) | GhostState::Chase(_) => {
                body.colour = body.base_colour;
                body.speed = body.base_speed;
            }
            GhostState::Frightened(s) => {
                body.colour = Colour::Blue;
                body.speed = body.base_speed * s.speed_mult;
                body.dir = body.dir.opposite();
            }
            GhostState::Eaten(s) => {
                body.colour = Colour::White;
                body.speed = body.base_speed * s.speed_mult;
            }
        }
    }

    pub fn on_exit(&self, body: &mut GhostBody, _board: Option<&dyn BoardQuery>) {
        match self {
            GhostState::Idle(_) => body.speed = body.base_speed,
            GhostState::Frightened(_) => {
                body.colour = body.base_colour;
                body.speed = body.base_speed;
            }
            GhostState::Scatter(_) | GhostState::Chase(_) | GhostState::Eaten(_) => {}
        }
    }

    /// Per-frame behaviour. Returns a state the ghost wants to switch to.
    pub fn on_update(
        &self,
        body: &mut GhostBody,
        board: &dyn BoardQuery,
        player: GridPos,
        _dt: f32,
        rng: &mut impl Rng,
    ) -> Option<GhostStateId> {
        if matches!(self, GhostState::Idle(_)) || !body.is_centered() {
            return None;
        }
        body.sync_cell();

        match self {
            GhostState::Idle(_) => None,
            GhostState::Scatter(_) => {
                let corner = board.scatter_corner(body.kind);
                steer_toward(body, board, corner, rng);
                None
            }
            GhostState::Chase(s) => {
                let target = s.target(body, board, player);
                steer_toward(body, board, target, rng);
                None
            }
            GhostState::Frightened(_) => {
                let open = open_directions(board, body.cell);
                let dir = open.choose(rng).copied()?;
                body.dir = dir;
                body.commit_direction(board);
                None
            }
            GhostState::Eaten(_) => {
                let home = body.spawn;
                steer_toward(body, board, home, rng);
                (body.cell == home).then_some(GhostStateId::Scatter)
            }
        }
    }
}

impl ChaseState {
    /// Where this ghost's species aims while chasing.
    pub fn target(&self, body: &GhostBody, board: &dyn BoardQuery, player: GridPos) -> GridPos {
        match body.kind {
            GhostKind::Blinky => player,
            GhostKind::Pinky => player.offset(board.player_direction(), self.ambush_offset),
            GhostKind::Inky => {
                let pivot = player.offset(board.player_direction(), self.flank_offset);
                let blinky = board.ghost_grid_position(GhostKind::Blinky);
                GridPos::new(pivot.x * 2 - blinky.x, pivot.y * 2 - blinky.y)
            }
            GhostKind::Clyde => {
                if body.cell.manhattan(player) > self.retreat_distance {
                    player
                } else {
                    board.scatter_corner(body.kind)
                }
            }
        }
    }
}

fn steer_toward(body: &mut GhostBody, board: &dyn BoardQuery, target: GridPos, rng: &mut impl Rng) {
    let legal = legal_directions(board, body.cell, body.dir);
    body.dir = best_direction(body.cell, target, &legal, rng);
    body.commit_direction(board);
}
