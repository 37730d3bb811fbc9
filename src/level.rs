use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Direction, GridPos, Point, Tile};
use crate::constants::{GRID_H, GRID_W};
use crate::ghost::GhostKind;

/// Process-wide Scatter/Chase oscillation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalMode {
    Scatter,
    Chase,
}

impl GlobalMode {
    pub fn flipped(self) -> GlobalMode {
        match self {
            GlobalMode::Scatter => GlobalMode::Chase,
            GlobalMode::Chase => GlobalMode::Scatter,
        }
    }
}

/// Read-only queries a ghost may make about the world.
///
/// Ghost states never see the maze storage or other ghosts directly; the
/// coordinator hands them something implementing this trait every tick.
pub trait BoardQuery {
    /// Out-of-bounds cells count as walls.
    fn is_wall(&self, cell: GridPos) -> bool;
    fn scatter_corner(&self, kind: GhostKind) -> GridPos;
    fn player_direction(&self) -> Direction;
    fn ghost_grid_position(&self, kind: GhostKind) -> GridPos;
    fn player_position(&self) -> Point;
    fn global_mode(&self) -> GlobalMode;
}

/// Fixed-size maze: a rectangle of tiles with a solid border.
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    grid: Vec<Vec<Tile>>,
    power_up: Option<GridPos>,
}

impl Board {
    /// Border walls, a pellet on every interior tile.
    pub fn arena() -> Self {
        Self::bordered(GRID_W, GRID_H)
    }

    pub fn bordered(width: i32, height: i32) -> Self {
        let mut grid = vec![vec![Tile::Pellet; width as usize]; height as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    grid[y as usize][x as usize] = Tile::Wall;
                }
            }
        }
        Self {
            width,
            height,
            grid,
            power_up: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, cell: GridPos) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn tile(&self, cell: GridPos) -> Tile {
        if !self.in_bounds(cell) {
            return Tile::Wall;
        }
        self.grid[cell.y as usize][cell.x as usize]
    }

    pub fn set_tile(&mut self, cell: GridPos, tile: Tile) {
        if !self.in_bounds(cell) {
            return;
        }
        let slot = &mut self.grid[cell.y as usize][cell.x as usize];
        if *slot == Tile::PowerUp && tile != Tile::PowerUp {
            self.power_up = None;
        }
        if tile == Tile::PowerUp {
            self.power_up = Some(cell);
        }
        *slot = tile;
    }

    pub fn is_wall(&self, cell: GridPos) -> bool {
        self.tile(cell) == Tile::Wall
    }

    /// Removes whatever is edible at `cell` and reports what it was.
    pub fn consume(&mut self, cell: GridPos) -> Tile {
        match self.tile(cell) {
            tile @ (Tile::Pellet | Tile::PowerUp) => {
                self.set_tile(cell, Tile::Empty);
                tile
            }
            other => other,
        }
    }

    pub fn pellets_left(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&tile| tile == Tile::Pellet)
            .count()
    }

    pub fn power_up(&self) -> Option<GridPos> {
        self.power_up
    }

    /// Turns a random pellet into a power-up. Returns where it landed.
    pub fn spawn_power_up(&mut self, rng: &mut impl Rng) -> Option<GridPos> {
        let mut candidates = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.grid[y as usize][x as usize] == Tile::Pellet {
                    candidates.push(GridPos::new(x, y));
                }
            }
        }
        let cell = candidates.choose(rng).copied()?;
        self.set_tile(cell, Tile::PowerUp);
        Some(cell)
    }

    pub fn scatter_corner(&self, kind: GhostKind) -> GridPos {
        let (left, top) = (1, 1);
        let (right, bottom) = (self.width - 2, self.height - 2);
        match kind {
            GhostKind::Blinky => GridPos::new(right, top),
            GhostKind::Pinky => GridPos::new(left, top),
            GhostKind::Inky => GridPos::new(right, bottom),
            GhostKind::Clyde => GridPos::new(left, bottom),
        }
    }
}

/// One frame's worth of world state, as seen by the ghosts.
#[derive(Clone, Debug)]
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub player_pos: Point,
    pub player_dir: Direction,
    pub ghost_cells: [GridPos; GhostKind::COUNT],
    pub mode: GlobalMode,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board, player_pos: Point, player_dir: Direction, mode: GlobalMode) -> Self {
        Self {
            board,
            player_pos,
            player_dir,
            ghost_cells: [GridPos::default(); GhostKind::COUNT],
            mode,
        }
    }

    pub fn with_ghost(mut self, kind: GhostKind, cell: GridPos) -> Self {
        self.set_ghost_cell(kind, cell);
        self
    }

    pub fn set_ghost_cell(&mut self, kind: GhostKind, cell: GridPos) {
        self.ghost_cells[kind.index()] = cell;
    }
}

impl BoardQuery for BoardView<'_> {
    fn is_wall(&self, cell: GridPos) -> bool {
        self.board.is_wall(cell)
    }

    fn scatter_corner(&self, kind: GhostKind) -> GridPos {
        self.board.scatter_corner(kind)
    }

    fn player_direction(&self) -> Direction {
        self.player_dir
    }

    fn ghost_grid_position(&self, kind: GhostKind) -> GridPos {
        self.ghost_cells[kind.index()]
    }

    fn player_position(&self) -> Point {
        self.player_pos
    }

    fn global_mode(&self) -> GlobalMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn arena_has_border_walls_and_pellets() {
        let board = Board::arena();
        assert_eq!(board.width(), 28);
        assert_eq!(board.height(), 31);
        assert!(board.is_wall(GridPos::new(0, 5)));
        assert!(board.is_wall(GridPos::new(27, 5)));
        assert!(board.is_wall(GridPos::new(5, 30)));
        assert_eq!(board.tile(GridPos::new(1, 1)), Tile::Pellet);
        assert_eq!(board.pellets_left(), 26 * 29);
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let board = Board::arena();
        assert!(board.is_wall(GridPos::new(-1, 3)));
        assert!(board.is_wall(GridPos::new(3, 31)));
        assert!(board.is_wall(GridPos::new(100, -100)));
    }

    #[test]
    fn power_up_spawns_on_a_pellet_and_is_consumed() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::bordered(6, 6);
        let before = board.pellets_left();
        let cell = board.spawn_power_up(&mut rng).expect("pellets available");
        assert_eq!(board.tile(cell), Tile::PowerUp);
        assert_eq!(board.power_up(), Some(cell));
        assert_eq!(board.pellets_left(), before - 1);

        assert_eq!(board.consume(cell), Tile::PowerUp);
        assert_eq!(board.power_up(), None);
        assert_eq!(board.consume(cell), Tile::Empty);
    }

    #[test]
    fn no_power_up_without_pellets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::bordered(3, 3);
        board.consume(GridPos::new(1, 1));
        assert_eq!(board.spawn_power_up(&mut rng), None);
    }

    #[test]
    fn scatter_corners_are_inside_the_border() {
        let board = Board::arena();
        for kind in GhostKind::ALL {
            assert!(!board.is_wall(board.scatter_corner(kind)));
        }
        assert_eq!(board.scatter_corner(GhostKind::Blinky), GridPos::new(26, 1));
        assert_eq!(board.scatter_corner(GhostKind::Clyde), GridPos::new(1, 29));
    }

    #[test]
    fn view_reports_ghost_cells_by_kind() {
        let board = Board::arena();
        let view = BoardView::new(&board, Point::default(), Direction::Left, GlobalMode::Chase)
            .with_ghost(GhostKind::Blinky, GridPos::new(4, 9));
        assert_eq!(view.ghost_grid_position(GhostKind::Blinky), GridPos::new(4, 9));
        assert_eq!(view.player_direction(), Direction::Left);
        assert_eq!(view.global_mode(), GlobalMode::Chase);
    }
}
