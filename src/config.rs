//! External configuration.
//!
//! Reads `pacman.toml` from the executable's directory or the CWD, then
//! applies `PACMAN_*` environment overrides. Anything missing falls back to
//! the defaults below.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "pacman.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub ghosts: GhostTuning,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_render_fps")]
    pub render_fps: u64,
    #[serde(default = "default_scatter_secs")]
    pub scatter_secs: f32,
    #[serde(default = "default_chase_secs")]
    pub chase_secs: f32,
    #[serde(default = "default_power_up_secs")]
    pub power_up_secs: f32,
    /// Delay between successive ghosts leaving Idle after a (re)start.
    #[serde(default = "default_release_interval")]
    pub release_interval_secs: f32,
}

/// Speeds and targeting constants shared by every ghost.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GhostTuning {
    #[serde(default = "default_ghost_speed")]
    pub base_speed: f32,
    #[serde(default = "default_frightened_mult")]
    pub frightened_speed_mult: f32,
    #[serde(default = "default_eaten_mult")]
    pub eaten_speed_mult: f32,
    /// Tiles ahead of the player that Pinky aims for.
    #[serde(default = "default_ambush_offset")]
    pub ambush_offset: i32,
    /// Tiles ahead of the player used as Inky's pivot.
    #[serde(default = "default_flank_offset")]
    pub flank_offset: i32,
    /// Clyde chases only while farther than this from the player.
    #[serde(default = "default_retreat_distance")]
    pub retreat_distance: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    #[serde(default = "default_lives")]
    pub lives: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

// ── Defaults ──

fn default_render_fps() -> u64 { 60 }
fn default_scatter_secs() -> f32 { 7.0 }
fn default_chase_secs() -> f32 { 20.0 }
fn default_power_up_secs() -> f32 { 8.0 }
fn default_release_interval() -> f32 { 2.0 }
fn default_ghost_speed() -> f32 { 80.0 }
fn default_frightened_mult() -> f32 { 0.5 }
fn default_eaten_mult() -> f32 { 2.0 }
fn default_ambush_offset() -> i32 { 4 }
fn default_flank_offset() -> i32 { 2 }
fn default_retreat_distance() -> i32 { 8 }
fn default_player_speed() -> f32 { 90.0 }
fn default_lives() -> u32 { 3 }

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            render_fps: default_render_fps(),
            scatter_secs: default_scatter_secs(),
            chase_secs: default_chase_secs(),
            power_up_secs: default_power_up_secs(),
            release_interval_secs: default_release_interval(),
        }
    }
}

impl Default for GhostTuning {
    fn default() -> Self {
        GhostTuning {
            base_speed: default_ghost_speed(),
            frightened_speed_mult: default_frightened_mult(),
            eaten_speed_mult: default_eaten_mult(),
            ambush_offset: default_ambush_offset(),
            flank_offset: default_flank_offset(),
            retreat_distance: default_retreat_distance(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            speed: default_player_speed(),
            lives: default_lives(),
        }
    }
}

// ── Loading ──

/// Outcome of [`GameConfig::load`]: the settings in force plus where they
/// came from and what went wrong, kept until a logger exists to report it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: GameConfig,
    pub path: Option<PathBuf>,
    pub problem: Option<ConfigError>,
}

impl LoadedConfig {
    /// Logs the file used, or why the defaults were used instead.
    pub fn report(&self) {
        match (&self.path, &self.problem) {
            (_, Some(e)) => warn!("{e}; using default settings"),
            (Some(path), None) => info!(path = %path.display(), "loaded config"),
            (None, None) => info!("no {CONFIG_FILE} found; using default settings"),
        }
    }
}

impl GameConfig {
    /// Loads `pacman.toml` if one can be found, then applies env overrides.
    /// A broken file is replaced by defaults and handed back in
    /// [`LoadedConfig::problem`].
    pub fn load() -> LoadedConfig {
        Self::load_from_dirs(&candidate_dirs(), |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) over explicit search directories and variables.
    pub fn load_from_dirs(
        dirs: &[PathBuf],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> LoadedConfig {
        let path = dirs
            .iter()
            .map(|d| d.join(CONFIG_FILE))
            .find(|p| p.is_file());
        let (mut config, problem) = match &path {
            Some(path) => match Self::load_from(path) {
                Ok(config) => (config, None),
                Err(e) => (GameConfig::default(), Some(e)),
            },
            None => (GameConfig::default(), None),
        };
        config.apply_overrides(lookup);
        LoadedConfig {
            config,
            path,
            problem,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `PACMAN_FPS`, `PACMAN_SEED`, `PACMAN_DEBUG`, `PACMAN_LOG_DIR`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(fps) = lookup("PACMAN_FPS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            self.timing.render_fps = fps;
        }
        if let Some(seed) = lookup("PACMAN_SEED").and_then(|v| v.parse::<u64>().ok()) {
            self.general.seed = Some(seed);
        }
        if let Some(debug) = lookup("PACMAN_DEBUG") {
            self.general.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }
        if let Some(dir) = lookup("PACMAN_LOG_DIR").filter(|v| !v.is_empty()) {
            self.general.log_dir = Some(PathBuf::from(dir));
        }
    }
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs
}
