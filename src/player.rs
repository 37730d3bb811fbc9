use crate::components::{at_center, cell_of, center_of, Direction, GridPos, Point, Tile};
use crate::constants::MOVE_EPS;
use crate::level::Board;

/// The player's actor: tile-centred movement with a one-slot input buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacman {
    cell: GridPos,
    spawn: GridPos,
    pos: Point,
    target: Point,
    dir: Direction,
    queued: Direction,
    speed: f32,
}

impl Pacman {
    pub fn new(spawn: GridPos, speed: f32) -> Self {
        let centre = center_of(spawn);
        Self {
            cell: spawn,
            spawn,
            pos: centre,
            target: centre,
            dir: Direction::None,
            queued: Direction::None,
            speed,
        }
    }

    /// Remembers a turn to take at the next tile centre where it fits.
    pub fn queue(&mut self, dir: Direction) {
        self.queued = dir;
    }

    /// Moves one frame. Returns whatever edible tile was picked up.
    pub fn update(&mut self, board: &mut Board, dt: f32) -> Option<Tile> {
        let mut eaten = None;
        if at_center(self.pos, self.target) {
            self.cell = cell_of(self.pos);

            match board.consume(self.cell) {
                tile @ (Tile::Pellet | Tile::PowerUp) => eaten = Some(tile),
                _ => {}
            }

            if !self.queued.is_none() && !board.is_wall(self.cell.step(self.queued)) {
                self.dir = self.queued;
            } else if board.is_wall(self.cell.step(self.dir)) {
                self.dir = Direction::None;
            }

            let next = self.cell.step(self.dir);
            self.target = if board.is_wall(next) {
                center_of(self.cell)
            } else {
                center_of(next)
            };
        }

        self.pos = self.pos.step_towards(self.target, self.speed * dt, MOVE_EPS);
        eaten
    }

    pub fn reset_to_spawn(&mut self) {
        self.cell = self.spawn;
        self.pos = center_of(self.spawn);
        self.target = self.pos;
        self.dir = Direction::None;
        self.queued = Direction::None;
    }

    pub fn cell(&self) -> GridPos {
        self.cell
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn eats_the_pellet_it_starts_on() {
        let mut board = Board::arena();
        let mut pac = Pacman::new(GridPos::new(5, 5), 90.0);
        assert_eq!(pac.update(&mut board, DT), Some(Tile::Pellet));
        assert_eq!(board.tile(GridPos::new(5, 5)), Tile::Empty);
        // nothing left to eat on the same tile
        let mut again = Pacman::new(GridPos::new(5, 5), 90.0);
        assert_eq!(again.update(&mut board, DT), None);
    }

    #[test]
    fn queued_turn_is_taken_when_open() {
        let mut board = Board::arena();
        let mut pac = Pacman::new(GridPos::new(5, 5), 90.0);
        pac.queue(Direction::Left);
        pac.update(&mut board, DT);
        assert_eq!(pac.dir(), Direction::Left);
        assert!(pac.pos().x < center_of(GridPos::new(5, 5)).x);
    }

    #[test]
    fn blocked_by_border() {
        let mut board = Board::arena();
        let mut pac = Pacman::new(GridPos::new(1, 1), 90.0);
        pac.queue(Direction::Up);
        pac.update(&mut board, DT);
        assert_eq!(pac.dir(), Direction::None);
        assert_eq!(pac.pos(), center_of(GridPos::new(1, 1)));
    }

    #[test]
    fn reaches_the_next_tile() {
        let mut board = Board::arena();
        let mut pac = Pacman::new(GridPos::new(5, 5), 90.0);
        pac.queue(Direction::Down);
        for _ in 0..12 {
            pac.update(&mut board, DT);
        }
        assert_eq!(cell_of(pac.pos()), GridPos::new(5, 6));
    }

    #[test]
    fn reset_puts_player_back() {
        let mut board = Board::arena();
        let mut pac = Pacman::new(GridPos::new(5, 5), 90.0);
        pac.queue(Direction::Right);
        for _ in 0..30 {
            pac.update(&mut board, DT);
        }
        pac.reset_to_spawn();
        assert_eq!(pac.cell(), GridPos::new(5, 5));
        assert_eq!(pac.pos(), center_of(GridPos::new(5, 5)));
        assert_eq!(pac.dir(), Direction::None);
    }
}
