//! Grid and actor constants shared with the board and the renderer.

pub const TILE_SIZE: i32 = 16;
pub const GRID_W: i32 = 28;
pub const GRID_H: i32 = 31;

/// Tolerance for "sitting on a tile centre".
pub const CENTER_EPS: f32 = 0.01;
/// Below this remaining distance a mover snaps onto its target.
pub const MOVE_EPS: f32 = 0.0001;

pub const ACTOR_DRAW_INSET: f32 = 2.0;
/// Added to the combined actor radii; negative so actors must overlap to touch.
pub const COLLISION_PAD: f32 = -4.0;

pub fn actor_radius() -> f32 {
    TILE_SIZE as f32 / 2.0 - ACTOR_DRAW_INSET
}
