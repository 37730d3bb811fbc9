//! Top-level coordinator: owns the board, the player, the ghosts and the mode
//! timer, and resolves what happens when they meet.

use rand::Rng;
use tracing::info;

use crate::components::{Direction, GridPos, Tile};
use crate::conductor::ModeConductor;
use crate::config::GameConfig;
use crate::error::GhostError;
use crate::fsm::GhostStateId;
use crate::ghost::{GhostAgent, GhostKind};
use crate::level::{Board, BoardView, GlobalMode};
use crate::player::Pacman;

pub const PLAYER_START: GridPos = GridPos::new(9, 23);
pub const GHOST_STARTS: [GridPos; GhostKind::COUNT] = [
    GridPos::new(12, 15), // Blinky
    GridPos::new(16, 15), // Pinky
    GridPos::new(14, 15), // Inky
    GridPos::new(14, 17), // Clyde
];

const PELLET_SCORE: u32 = 10;
const POWER_UP_SCORE: u32 = 50;
const GHOST_SCORE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    GameOver,
}

/// Things that happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PelletEaten { cell: GridPos },
    PowerUpEaten { cell: GridPos },
    PowerUpSpawned { cell: GridPos },
    PowerUpExpired,
    GhostReleased { kind: GhostKind },
    GhostEaten { kind: GhostKind },
    PlayerCaught { by: GhostKind, lives_left: u32 },
    ModeChanged(GlobalMode),
    Won,
    GameOver,
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    pacman: Pacman,
    ghosts: Vec<GhostAgent>,
    conductor: ModeConductor,
    power_timer: f32,
    power_secs: f32,
    release_interval: f32,
    since_start: f32,
    score: u32,
    lives: u32,
    status: GameStatus,
}

impl Game {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, GhostError> {
        Self::with_spawns(config, PLAYER_START, GHOST_STARTS, rng)
    }

    pub fn with_spawns(
        config: &GameConfig,
        player_spawn: GridPos,
        ghost_spawns: [GridPos; GhostKind::COUNT],
        rng: &mut impl Rng,
    ) -> Result<Self, GhostError> {
        let mut board = Board::arena();
        board.spawn_power_up(rng);

        let ghosts = GhostKind::ALL
            .iter()
            .zip(ghost_spawns)
            .map(|(&kind, spawn)| GhostAgent::new(kind, spawn, kind.colour(), &config.ghosts))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            board,
            pacman: Pacman::new(player_spawn, config.player.speed),
            ghosts,
            conductor: ModeConductor::new(config.timing.scatter_secs, config.timing.chase_secs),
            power_timer: 0.0,
            power_secs: config.timing.power_up_secs,
            release_interval: config.timing.release_interval_secs,
            since_start: 0.0,
            score: 0,
            lives: config.player.lives,
            status: GameStatus::Playing,
        })
    }

    /// Advances the whole simulation by one frame.
    pub fn update(
        &mut self,
        dt: f32,
        input: Option<Direction>,
        rng: &mut impl Rng,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status != GameStatus::Playing {
            return events;
        }

        if let Some(dir) = input {
            self.pacman.queue(dir);
        }
        match self.pacman.update(&mut self.board, dt) {
            Some(Tile::Pellet) => {
                self.score += PELLET_SCORE;
                events.push(GameEvent::PelletEaten {
                    cell: self.pacman.cell(),
                });
            }
            Some(Tile::PowerUp) => {
                self.score += POWER_UP_SCORE;
                events.push(GameEvent::PowerUpEaten {
                    cell: self.pacman.cell(),
                });
                self.activate_power_up();
            }
            _ => {}
        }

        if self.board.pellets_left() == 0 && self.board.power_up().is_none() {
            info!(score = self.score, "board cleared");
            self.status = GameStatus::Won;
            events.push(GameEvent::Won);
            return events;
        }

        self.tick_power_up(dt, rng, &mut events);

        let view = snapshot(&self.board, &self.pacman, &self.ghosts, self.conductor.mode());
        let power_active = self.power_timer > 0.0;
        if let Some(mode) = self.conductor.update(dt, power_active, &mut self.ghosts, &view) {
            events.push(GameEvent::ModeChanged(mode));
        }

        self.release_ghosts(dt, &mut events);
        self.move_ghosts(dt, rng, &mut events);
        events
    }

    fn activate_power_up(&mut self) {
        self.power_timer = self.power_secs;
        info!(secs = self.power_secs, "power-up active");
        let view = snapshot(&self.board, &self.pacman, &self.ghosts, self.conductor.mode());
        for ghost in self.ghosts.iter_mut() {
            ghost.enter_frightened(&view);
        }
    }

    fn tick_power_up(&mut self, dt: f32, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        if self.power_timer > 0.0 {
            self.power_timer -= dt;
            if self.power_timer <= 0.0 {
                self.power_timer = 0.0;
                info!("power-up expired");
                let view = snapshot(&self.board, &self.pacman, &self.ghosts, self.conductor.mode());
                for ghost in self.ghosts.iter_mut() {
                    ghost.exit_frightened(&view);
                }
                events.push(GameEvent::PowerUpExpired);
            }
        } else if self.board.power_up().is_none() {
            if let Some(cell) = self.board.spawn_power_up(rng) {
                events.push(GameEvent::PowerUpSpawned { cell });
            }
        }
    }

    /// Ghost `i` leaves Idle `i × release_interval` seconds after a (re)start.
    fn release_ghosts(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.since_start += dt;
        let view = snapshot(&self.board, &self.pacman, &self.ghosts, self.conductor.mode());
        for (i, ghost) in self.ghosts.iter_mut().enumerate() {
            if ghost.state() != GhostStateId::Idle {
                continue;
            }
            if self.since_start >= i as f32 * self.release_interval {
                ghost.release(&view);
                events.push(GameEvent::GhostReleased { kind: ghost.kind() });
            }
        }
    }

    fn move_ghosts(&mut self, dt: f32, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        let player = self.pacman.cell();
        let mut view = snapshot(&self.board, &self.pacman, &self.ghosts, self.conductor.mode());
        let mut hits = Vec::new();
        for (i, ghost) in self.ghosts.iter_mut().enumerate() {
            if ghost.update(&view, player, dt, rng) {
                hits.push(i);
            }
            view.set_ghost_cell(ghost.kind(), ghost.cell());
        }

        for i in hits {
            let ghost = &mut self.ghosts[i];
            match ghost.state() {
                GhostStateId::Frightened => {
                    ghost.set_eaten(&view);
                    self.score += GHOST_SCORE;
                    info!(ghost = ?ghost.kind(), score = self.score, "ghost eaten");
                    events.push(GameEvent::GhostEaten { kind: ghost.kind() });
                }
                GhostStateId::Eaten => {}
                _ => {
                    let by = ghost.kind();
                    self.player_caught(by, events);
                    return;
                }
            }
        }
    }

    fn player_caught(&mut self, by: GhostKind, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        info!(ghost = ?by, lives = self.lives, "player caught");
        events.push(GameEvent::PlayerCaught {
            by,
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.status = GameStatus::GameOver;
            events.push(GameEvent::GameOver);
            return;
        }

        self.pacman.reset_to_spawn();
        for ghost in self.ghosts.iter_mut() {
            ghost.reset_to_spawn();
        }
        self.conductor.reset();
        self.power_timer = 0.0;
        self.since_start = 0.0;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pacman(&self) -> &Pacman {
        &self.pacman
    }

    pub fn ghosts(&self) -> &[GhostAgent] {
        &self.ghosts
    }

    pub fn mode(&self) -> GlobalMode {
        self.conductor.mode()
    }

    pub fn power_remaining(&self) -> f32 {
        self.power_timer
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

fn snapshot<'a>(
    board: &'a Board,
    pacman: &Pacman,
    ghosts: &[GhostAgent],
    mode: GlobalMode,
) -> BoardView<'a> {
    let mut view = BoardView::new(board, pacman.pos(), pacman.dir(), mode);
    for ghost in ghosts {
        view.set_ghost_cell(ghost.kind(), ghost.cell());
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn game_with(player: GridPos, ghosts: [GridPos; 4]) -> (Game, StdRng) {
        let mut rng = StdRng::seed_from_u64(77);
        let game = Game::with_spawns(&GameConfig::default(), player, ghosts, &mut rng)
            .expect("game");
        (game, rng)
    }

    fn clear_power_up(game: &mut Game) {
        if let Some(cell) = game.board.power_up() {
            game.board.set_tile(cell, Tile::Empty);
        }
    }

    #[test]
    fn starts_with_everyone_idle_in_scatter() {
        let mut rng = StdRng::seed_from_u64(1);
        let game = Game::new(&GameConfig::default(), &mut rng).expect("game");
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.mode(), GlobalMode::Scatter);
        assert_eq!(game.lives(), 3);
        assert!(game.board().power_up().is_some());
        assert!(game.ghosts().iter().all(|g| g.state() == GhostStateId::Idle));
        let kinds: Vec<GhostKind> = game.ghosts().iter().map(GhostAgent::kind).collect();
        assert_eq!(kinds, GhostKind::ALL.to_vec());
    }

    #[test]
    fn ghosts_are_released_one_by_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = Game::new(&GameConfig::default(), &mut rng).expect("game");
        clear_power_up(&mut game);
        game.update(0.5, None, &mut rng);
        let idle = game
            .ghosts()
            .iter()
            .filter(|g| g.state() == GhostStateId::Idle)
            .count();
        assert_eq!(idle, 3);

        for _ in 0..4 {
            game.update(0.5, None, &mut rng);
        }
        // 2.5 s in: Blinky and Pinky are out
        assert_eq!(game.ghosts()[1].state(), GhostStateId::Scatter);
        assert_eq!(game.ghosts()[2].state(), GhostStateId::Idle);
    }

    #[test]
    fn power_up_frightens_then_expires() {
        let (mut game, mut rng) = game_with(
            GridPos::new(5, 5),
            [GridPos::new(12, 15), GridPos::new(16, 15), GridPos::new(14, 15), GridPos::new(14, 17)],
        );
        clear_power_up(&mut game);
        game.board.set_tile(GridPos::new(5, 5), Tile::PowerUp);

        let events = game.update(DT, None, &mut rng);
        assert!(events.contains(&GameEvent::PowerUpEaten { cell: GridPos::new(5, 5) }));
        // even ghosts still waiting in Idle get scared
        assert!(game
            .ghosts()
            .iter()
            .all(|g| g.state() == GhostStateId::Frightened));
        assert!(game.power_remaining() > 7.9);

        let events = game.update(8.0, None, &mut rng);
        assert!(events.contains(&GameEvent::PowerUpExpired));
        assert!(game
            .ghosts()
            .iter()
            .all(|g| g.state() != GhostStateId::Frightened));
    }

    #[test]
    fn conductor_waits_out_the_power_up() {
        let (mut game, mut rng) = game_with(
            GridPos::new(5, 5),
            [GridPos::new(12, 15), GridPos::new(16, 15), GridPos::new(14, 15), GridPos::new(14, 17)],
        );
        game.power_timer = 100.0;
        for _ in 0..20 {
            game.update(0.5, None, &mut rng);
        }
        assert_eq!(game.mode(), GlobalMode::Scatter);
    }

    #[test]
    fn frightened_ghost_gets_eaten() {
        let (mut game, mut rng) = game_with(
            GridPos::new(5, 5),
            [GridPos::new(5, 5), GridPos::new(20, 25), GridPos::new(22, 25), GridPos::new(24, 25)],
        );
        clear_power_up(&mut game);
        game.board.set_tile(GridPos::new(5, 5), Tile::PowerUp);

        let events = game.update(DT, None, &mut rng);
        assert!(events.contains(&GameEvent::GhostEaten { kind: GhostKind::Blinky }));
        assert_eq!(game.ghosts()[0].state(), GhostStateId::Eaten);
        assert_eq!(game.lives(), 3);
        assert!(game.score() >= POWER_UP_SCORE + GHOST_SCORE);
    }

    #[test]
    fn caught_player_loses_a_life_and_everyone_resets() {
        let (mut game, mut rng) = game_with(
            GridPos::new(24, 1),
            [GridPos::new(20, 1), GridPos::new(20, 25), GridPos::new(22, 25), GridPos::new(24, 25)],
        );
        clear_power_up(&mut game);
        // Blinky heads for its top-right corner straight through the player
        let mut caught = false;
        for _ in 0..60 {
            let events = game.update(DT, None, &mut rng);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerCaught { by: GhostKind::Blinky, lives_left: 2 }))
            {
                caught = true;
                break;
            }
        }
        assert!(caught);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.pacman().cell(), GridPos::new(24, 1));
        assert!(game.ghosts().iter().all(|g| g.state() == GhostStateId::Idle));
        assert_eq!(game.ghosts()[0].cell(), GridPos::new(20, 1));
        assert_eq!(game.mode(), GlobalMode::Scatter);
    }

    #[test]
    fn last_life_ends_the_game() {
        let (mut game, mut rng) = game_with(
            GridPos::new(5, 5),
            [GridPos::new(5, 5), GridPos::new(20, 25), GridPos::new(22, 25), GridPos::new(24, 25)],
        );
        clear_power_up(&mut game);
        // Blinky spawns on the player, so every frame is a catch
        for _ in 0..3 {
            game.update(DT, None, &mut rng);
        }
        assert_eq!(game.lives(), 0);
        assert_eq!(game.status(), GameStatus::GameOver);
        assert!(game.update(DT, None, &mut rng).is_empty());
    }

    #[test]
    fn clearing_the_board_wins() {
        let (mut game, mut rng) = game_with(
            GridPos::new(5, 5),
            [GridPos::new(12, 15), GridPos::new(16, 15), GridPos::new(14, 15), GridPos::new(14, 17)],
        );
        for y in 0..game.board.height() {
            for x in 0..game.board.width() {
                let cell = GridPos::new(x, y);
                if cell != GridPos::new(5, 5) && !game.board.is_wall(cell) {
                    game.board.set_tile(cell, Tile::Empty);
                }
            }
        }
        let events = game.update(DT, None, &mut rng);
        assert!(events.contains(&GameEvent::Won));
        assert_eq!(game.status(), GameStatus::Won);
    }
}
