//! One-step greedy steering toward a target tile.
//!
//! There is no search over the maze: a ghost looks at its open neighbours,
//! scores each by Manhattan distance to the target, and takes the best one.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Direction, GridPos};
use crate::level::BoardQuery;

/// Open neighbours of `cell`, never reversing `last` unless that is the only way out.
pub fn legal_directions(board: &dyn BoardQuery, cell: GridPos, last: Direction) -> Vec<Direction> {
    let reverse = last.opposite();
    let open = open_directions(board, cell);
    let forward: Vec<Direction> = open.iter().copied().filter(|&d| d != reverse).collect();
    if forward.is_empty() {
        open
    } else {
        forward
    }
}

/// Every cardinal direction whose neighbour is not a wall, reversal included.
pub fn open_directions(board: &dyn BoardQuery, cell: GridPos) -> Vec<Direction> {
    Direction::CARDINALS
        .into_iter()
        .filter(|&d| !board.is_wall(cell.step(d)))
        .collect()
}

/// Picks the candidate whose next cell lands closest to `target`.
///
/// Ties on distance go to the arcade order up, left, down, right. Anything
/// still tied after that is drawn uniformly from `rng`.
pub fn best_direction(
    cell: GridPos,
    target: GridPos,
    candidates: &[Direction],
    rng: &mut impl Rng,
) -> Direction {
    let mut best_score = i32::MAX;
    let mut best_priority = u8::MAX;
    let mut bests: Vec<Direction> = Vec::new();

    for &dir in candidates {
        let score = cell.step(dir).manhattan(target);
        let priority = dir.priority();
        if score < best_score || (score == best_score && priority < best_priority) {
            best_score = score;
            best_priority = priority;
            bests.clear();
            bests.push(dir);
        } else if score == best_score && priority == best_priority {
            bests.push(dir);
        }
    }

    match bests.as_slice() {
        [] => Direction::None,
        [only] => *only,
        many => many.choose(rng).copied().unwrap_or(Direction::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Point, Tile};
    use crate::level::{Board, BoardView, GlobalMode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn view(board: &Board) -> BoardView<'_> {
        BoardView::new(board, Point::default(), Direction::None, GlobalMode::Scatter)
    }

    #[test]
    fn open_cell_allows_everything_but_reverse() {
        let board = Board::arena();
        let dirs = legal_directions(&view(&board), GridPos::new(5, 5), Direction::Right);
        assert_eq!(dirs, vec![Direction::Up, Direction::Right, Direction::Down]);
    }

    #[test]
    fn dead_end_restores_reversal() {
        let mut board = Board::arena();
        // corridor cell (5,5) walled on three sides, only way out is back left
        board.set_tile(GridPos::new(6, 5), Tile::Wall);
        board.set_tile(GridPos::new(5, 4), Tile::Wall);
        board.set_tile(GridPos::new(5, 6), Tile::Wall);
        let dirs = legal_directions(&view(&board), GridPos::new(5, 5), Direction::Right);
        assert_eq!(dirs, vec![Direction::Left]);
    }

    #[test]
    fn isolated_cell_has_no_moves() {
        let mut board = Board::arena();
        for dir in Direction::CARDINALS {
            board.set_tile(GridPos::new(5, 5).step(dir), Tile::Wall);
        }
        assert!(legal_directions(&view(&board), GridPos::new(5, 5), Direction::Up).is_empty());
    }

    #[test]
    fn legal_directions_nonempty_wherever_a_neighbour_is_open() {
        let board = Board::arena();
        let v = view(&board);
        for y in 1..board.height() - 1 {
            for x in 1..board.width() - 1 {
                for last in [Direction::Up, Direction::Down, Direction::Left, Direction::Right, Direction::None] {
                    assert!(!legal_directions(&v, GridPos::new(x, y), last).is_empty());
                }
            }
        }
    }

    #[test]
    fn corner_cell_respects_border() {
        let board = Board::arena();
        let dirs = open_directions(&view(&board), GridPos::new(1, 1));
        assert_eq!(dirs, vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn straight_up_to_target_above() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = Direction::CARDINALS;
        let dir = best_direction(GridPos::new(5, 5), GridPos::new(5, 1), &candidates, &mut rng);
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn distance_ties_follow_arcade_priority() {
        let mut rng = StdRng::seed_from_u64(3);
        // target diagonally up-left: up and left both reach distance 1
        let dir = best_direction(
            GridPos::new(5, 5),
            GridPos::new(4, 4),
            &[Direction::Right, Direction::Left, Direction::Up, Direction::Down],
            &mut rng,
        );
        assert_eq!(dir, Direction::Up);

        // target down-right: down beats right
        let dir = best_direction(
            GridPos::new(5, 5),
            GridPos::new(6, 6),
            &[Direction::Right, Direction::Down],
            &mut rng,
        );
        assert_eq!(dir, Direction::Down);
    }

    #[test]
    fn shorter_distance_beats_priority() {
        let mut rng = StdRng::seed_from_u64(3);
        let dir = best_direction(
            GridPos::new(5, 5),
            GridPos::new(9, 5),
            &[Direction::Up, Direction::Right],
            &mut rng,
        );
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn empty_candidates_yield_none() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            best_direction(GridPos::new(1, 1), GridPos::new(2, 2), &[], &mut rng),
            Direction::None
        );
    }

    #[test]
    fn duplicate_candidates_collapse_to_one() {
        let mut rng = StdRng::seed_from_u64(11);
        let candidates = [Direction::Left, Direction::Left];
        for _ in 0..20 {
            assert_eq!(
                best_direction(GridPos::new(5, 5), GridPos::new(1, 5), &candidates, &mut rng),
                Direction::Left
            );
        }
    }
}
