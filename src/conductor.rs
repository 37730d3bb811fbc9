//! Global Scatter/Chase timer.

use tracing::info;

use crate::ghost::GhostAgent;
use crate::level::{BoardQuery, GlobalMode};

/// Alternates the global mode on fixed durations and tells every ghost.
///
/// Each ghost decides for itself whether the news applies; see
/// [`GhostAgent::on_global_mode_change`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConductor {
    mode: GlobalMode,
    timer: f32,
    scatter_secs: f32,
    chase_secs: f32,
}

impl ModeConductor {
    /// Starts in Scatter with a full Scatter timer.
    pub fn new(scatter_secs: f32, chase_secs: f32) -> Self {
        Self {
            mode: GlobalMode::Scatter,
            timer: scatter_secs,
            scatter_secs,
            chase_secs,
        }
    }

    pub fn mode(&self) -> GlobalMode {
        self.mode
    }

    pub fn remaining(&self) -> f32 {
        self.timer
    }

    fn duration(&self, mode: GlobalMode) -> f32 {
        match mode {
            GlobalMode::Scatter => self.scatter_secs,
            GlobalMode::Chase => self.chase_secs,
        }
    }

    /// Counts down, flipping the mode on expiry. Frozen while a power-up runs.
    ///
    /// Time past zero carries into the next phase, so a long `dt` may cross
    /// several phases; only the mode it ends in is returned.
    pub fn tick(&mut self, dt: f32, power_active: bool) -> Option<GlobalMode> {
        if power_active {
            return None;
        }
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        while self.timer <= 0.0 {
            self.mode = self.mode.flipped();
            let duration = self.duration(self.mode);
            if duration <= 0.0 {
                self.timer = duration;
                break;
            }
            self.timer += duration;
        }
        info!(mode = ?self.mode, secs = self.timer, "global mode changed");
        Some(self.mode)
    }

    /// [`tick`](Self::tick), then broadcast any flip to `ghosts`.
    pub fn update(
        &mut self,
        dt: f32,
        power_active: bool,
        ghosts: &mut [GhostAgent],
        board: &dyn BoardQuery,
    ) -> Option<GlobalMode> {
        let flipped = self.tick(dt, power_active)?;
        for ghost in ghosts.iter_mut() {
            ghost.on_global_mode_change(board, flipped);
        }
        Some(flipped)
    }

    /// Back to the opening Scatter phase.
    pub fn reset(&mut self) {
        self.mode = GlobalMode::Scatter;
        self.timer = self.scatter_secs;
    }
}
