use crate::constants::{CENTER_EPS, TILE_SIZE};

/// A one-tile step on the grid, or standing still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Arcade tie-break rank: up, left, down, right. Lower wins.
    pub fn priority(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down => 2,
            Direction::Right => 3,
            Direction::None => 4,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }
}

/// Integer grid cell. Signed so that targets may lie off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> GridPos {
        self.offset(dir, 1)
    }

    pub fn offset(self, dir: Direction, tiles: i32) -> GridPos {
        let (dx, dy) = dir.delta();
        GridPos {
            x: self.x + dx * tiles,
            y: self.y + dy * tiles,
        }
    }

    pub fn manhattan(self, other: GridPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Continuous world position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves `step` units toward `target`, landing exactly on it when close.
    pub fn step_towards(self, target: Point, step: f32, eps: f32) -> Point {
        let dist = self.distance(target);
        if dist < eps || step >= dist {
            return target;
        }
        Point {
            x: self.x + (target.x - self.x) / dist * step,
            y: self.y + (target.y - self.y) / dist * step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    Wall,
    #[default]
    Empty,
    Pellet,
    PowerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Red,
    Magenta,
    Cyan,
    Orange,
    Blue,
    White,
    Yellow,
}

pub fn center_of(cell: GridPos) -> Point {
    Point {
        x: (cell.x * TILE_SIZE + TILE_SIZE / 2) as f32,
        y: (cell.y * TILE_SIZE + TILE_SIZE / 2) as f32,
    }
}

pub fn at_center(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < CENTER_EPS && (a.y - b.y).abs() < CENTER_EPS
}

pub fn cell_of(pos: Point) -> GridPos {
    GridPos {
        x: pos.x.floor() as i32 / TILE_SIZE,
        y: pos.y.floor() as i32 / TILE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_round_trip_through_cells() {
        let cell = GridPos::new(5, 7);
        let centre = center_of(cell);
        assert_eq!(centre, Point::new(88.0, 120.0));
        assert_eq!(cell_of(centre), cell);
    }

    #[test]
    fn step_towards_clamps_onto_target() {
        let start = Point::new(0.0, 0.0);
        let target = Point::new(3.0, 4.0);
        let mid = start.step_towards(target, 2.5, 0.0001);
        assert!((mid.x - 1.5).abs() < 1e-5);
        assert!((mid.y - 2.0).abs() < 1e-5);
        assert_eq!(mid.step_towards(target, 10.0, 0.0001), target);
    }

    #[test]
    fn opposite_and_priority() {
        for dir in Direction::CARDINALS {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
        assert!(Direction::Up.priority() < Direction::Left.priority());
        assert!(Direction::Left.priority() < Direction::Down.priority());
        assert!(Direction::Down.priority() < Direction::Right.priority());
    }

    #[test]
    fn offset_scales_delta() {
        let p = GridPos::new(10, 10);
        assert_eq!(p.offset(Direction::Left, 4), GridPos::new(6, 10));
        assert_eq!(p.offset(Direction::None, 4), p);
        assert_eq!(p.manhattan(GridPos::new(7, 14)), 7);
    }
}
