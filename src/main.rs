mod render;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pacman_ghosts::components::Direction;
use pacman_ghosts::{Game, GameConfig, GameStatus};

use crate::render::Renderer;

/// Longest simulated step; a stalled terminal must not teleport anyone.
const MAX_FRAME_SECS: f32 = 0.1;

fn main() -> Result<()> {
    let loaded = GameConfig::load();
    setup_logging(&loaded.config)?;
    loaded.report();
    let config = loaded.config;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn setup_logging(config: &GameConfig) -> Result<()> {
    let log_dir = config
        .general
        .log_dir
        .clone()
        .unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let file_name = format!("pacman_{stamp}.log");
    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if config.general.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());

    // The terminal belongs to the game, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer thread alive for the whole process.
    std::mem::forget(guard);

    info!("Log file: {}", log_dir.join(&file_name).display());
    Ok(())
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("pacman")
}

fn run(stdout: &mut Stdout, config: &GameConfig) -> Result<()> {
    let seed = config.general.seed.unwrap_or_else(rand::random);
    info!(seed, "starting game");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(config, &mut rng).context("building ghosts")?;

    let board = game.board();
    let mut renderer = Renderer::new(
        board.width() as usize,
        board.height() as usize,
        config.general.debug,
    );
    let frame_time = Duration::from_micros(1_000_000 / config.timing.render_fps.max(1));
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut input = None;
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => input = Some(Direction::Up),
                    KeyCode::Down | KeyCode::Char('j') => input = Some(Direction::Down),
                    KeyCode::Left | KeyCode::Char('h') => input = Some(Direction::Left),
                    KeyCode::Right | KeyCode::Char('l') => input = Some(Direction::Right),
                    _ => {}
                }
            }
        }

        let dt = last_frame.elapsed().as_secs_f32().min(MAX_FRAME_SECS);
        last_frame = Instant::now();
        game.update(dt, input, &mut rng);
        renderer.render(stdout, &game)?;

        if game.status() != GameStatus::Playing {
            info!(status = ?game.status(), score = game.score(), "game finished");
            renderer.render_end(stdout, &game)?;
            return wait_for_quit();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn wait_for_quit() -> Result<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
