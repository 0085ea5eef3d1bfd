//! Tunable game constants.
//!
//! Everything the simulation needs to know about the play area, speeds,
//! sprite sizes and wave layout lives in [`Config`].  Defaults reproduce the
//! classic 600×600 layout; a JSON file can override any subset of fields.

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which axis pairing the overlap test uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionFormula {
    /// `|Δx| ≤ (wA + wB) / 2` and `|Δy| ≤ (hA + hB) / 2`.
    #[default]
    Corrected,
    /// `|Δx| ≤ (hA + hB) / 2` and `|Δy| ≤ (wA + wB) / 2`, the legacy
    /// hitbox.  Only differs from `Corrected` for non-square sprites.
    Swapped,
}

/// Grid of enemies spawned whenever the wave is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayout {
    pub count: u32,
    /// Centre x of the first enemy.
    pub start_x: f32,
    /// Horizontal distance between neighbouring enemy centres.
    pub spacing: f32,
    /// Centre y of every enemy in a fresh wave.
    pub row: f32,
}

impl Default for WaveLayout {
    fn default() -> Self {
        Self {
            count: 3,
            start_x: 100.0,
            spacing: 200.0,
            row: 100.0,
        }
    }
}

impl WaveLayout {
    /// Spawn positions, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.count).map(move |i| Vec2::new(self.start_x + i as f32 * self.spacing, self.row))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Play-area width in logical pixels.
    pub width: f32,
    /// Play-area height in logical pixels.
    pub height: f32,

    pub enemy_speed_x: f32,
    /// Positive is downward.
    pub enemy_speed_y: f32,
    pub ship_speed_x: f32,
    /// Negative is upward.
    pub projectile_speed_y: f32,

    /// Simulation ticks per second.
    pub tick_rate_hz: u32,

    pub wave: WaveLayout,
    /// An enemy whose centre reaches this row ends the game.
    pub loss_row: f32,
    /// Closest the ship's centre may get to either side wall.
    pub ship_margin: f32,

    pub ship_size: Vec2,
    pub enemy_size: Vec2,
    pub projectile_size: Vec2,

    pub collision: CollisionFormula,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,

            enemy_speed_x: 0.0,
            enemy_speed_y: 2.0,
            ship_speed_x: 10.0,
            projectile_speed_y: -15.0,

            tick_rate_hz: 30,

            wave: WaveLayout::default(),
            loss_row: 480.0,
            ship_margin: 60.0,

            ship_size: Vec2::new(100.0, 100.0),
            enemy_size: Vec2::new(100.0, 100.0),
            projectile_size: Vec2::new(10.0, 20.0),

            collision: CollisionFormula::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file.  Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tick_rate_hz > 0, "tick_rate_hz must be positive");
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "play area must have a positive size, got {}x{}",
            self.width,
            self.height
        );
        for (name, size) in [
            ("ship_size", self.ship_size),
            ("enemy_size", self.enemy_size),
            ("projectile_size", self.projectile_size),
        ] {
            ensure!(size.x > 0.0 && size.y > 0.0, "{} must be positive, got {}", name, size);
        }
        let (min, max) = self.ship_lane();
        ensure!(
            min <= max,
            "ship_margin {} leaves no room in a {} wide play area",
            self.ship_margin,
            self.width
        );
        ensure!(self.wave.count > 0, "wave.count must be at least 1");
        ensure!(
            self.loss_row > self.wave.row && self.loss_row <= self.height,
            "loss_row {} must lie below wave.row {} and inside the play area",
            self.loss_row,
            self.wave.row
        );
        // Enemies step by whole pixels; anything below 1 never reaches loss_row.
        ensure!(
            self.enemy_speed_y.trunc() > 0.0,
            "enemy_speed_y {} must be at least 1 downward",
            self.enemy_speed_y
        );
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }

    /// Inclusive range the ship's centre x is kept within.
    pub fn ship_lane(&self) -> (f32, f32) {
        (self.ship_margin, self.width - self.ship_margin)
    }

    /// Horizontally centred, sprite resting on the bottom edge.
    pub fn ship_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - self.ship_size.y / 2.0)
    }
}
