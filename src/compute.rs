/// The simulation: one [`World`] owns every entity and advances them in
/// fixed ticks.
///
/// Each tick is a strict pipeline of separate passes, so no collection is
/// ever resized while it is being walked:
///
/// 1. input     — apply the snapshot to the ship, collect new projectiles
/// 2. advance   — move every entity
/// 3. spawn     — refill the wave if it is empty
/// 4. collide   — mark projectile/enemy pairs dead
/// 5. reap      — drop everything marked dead
/// 6. end check — loss row reached or quit requested
///
/// Rendering is separate (`World::render`) so the caller can skip the
/// frame once the game has ended.

use std::io;

use crossterm::style::Color;
use glam::Vec2;

use crate::config::Config;
use crate::display::Renderer;
use crate::entities::{Enemy, Entity, Projectile, Ship};
use crate::input::{InputSnapshot, Key, KeyTransition};

pub const BACKGROUND: Color = Color::Black;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// An enemy reached the loss row.
    Lost,
    /// The player asked to quit.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Ended(EndReason),
}

impl GameStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, GameStatus::Running)
    }
}

pub struct World {
    config: Config,
    ship: Ship,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    status: GameStatus,
    frame: u64,
    waves_spawned: u32,
}

impl World {
    pub fn new(config: Config) -> Self {
        let ship = Ship::new(&config);
        Self {
            config,
            ship,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            status: GameStatus::Running,
            frame: 0,
            waves_spawned: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Place an enemy outside the normal wave spawn.
    pub fn add_enemy(&mut self, position: Vec2) {
        self.enemies.push(Enemy::new(position, &self.config));
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Every entity in stable order: ship, enemies, projectiles.
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        std::iter::once(&self.ship as &dyn Entity)
            .chain(self.enemies.iter().map(|e| e as &dyn Entity))
            .chain(self.projectiles.iter().map(|p| p as &dyn Entity))
    }

    // ── Tick pipeline ────────────────────────────────────────────────────────

    /// Run one full tick.  A world that has ended ignores further ticks.
    pub fn tick(&mut self, input: &InputSnapshot) -> GameStatus {
        if !self.status.is_running() {
            return self.status;
        }

        let quit = self.apply_input(input);
        self.advance_all();
        self.spawn_wave_if_empty();
        self.detect_collisions();
        self.reap();
        self.check_end(quit);

        self.frame += 1;
        self.status
    }

    /// Translate key transitions into ship commands, in arrival order.
    /// Returns whether quit was requested.
    pub fn apply_input(&mut self, input: &InputSnapshot) -> bool {
        let mut quit = false;
        for transition in input.transitions() {
            match *transition {
                KeyTransition::Pressed(Key::MoveLeft) => self.ship.move_left(),
                KeyTransition::Pressed(Key::MoveRight) => self.ship.move_right(),
                KeyTransition::Pressed(Key::Fire) => {
                    let shot = self.ship.shoot();
                    self.projectiles.push(shot);
                }
                KeyTransition::Pressed(Key::Quit) => quit = true,
                KeyTransition::Released(Key::MoveLeft | Key::MoveRight) => self.ship.stop(),
                KeyTransition::Released(Key::Fire | Key::Quit) => {}
            }
        }
        quit
    }

    pub fn advance_all(&mut self) {
        self.ship.advance();
        for enemy in &mut self.enemies {
            enemy.advance();
        }
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
    }

    /// Spawn a full wave when no enemies remain.  Returns whether one spawned.
    pub fn spawn_wave_if_empty(&mut self) -> bool {
        if !self.enemies.is_empty() {
            return false;
        }

        let wave: Vec<Enemy> = self
            .config
            .wave
            .positions()
            .map(|position| Enemy::new(position, &self.config))
            .collect();
        self.enemies = wave;
        self.waves_spawned += 1;
        debug_assert!(!self.enemies.is_empty(), "spawned an empty wave");

        log::info!(
            "wave {} spawned: {} enemies at row {}",
            self.waves_spawned,
            self.enemies.len(),
            self.config.wave.row
        );
        true
    }

    /// Each live projectile kills at most one live enemy, first match wins.
    /// Returns the number of kills.
    pub fn detect_collisions(&mut self) -> usize {
        let formula = self.config.collision;
        let mut kills = 0;

        for shot in &mut self.projectiles {
            if !shot.is_alive() {
                continue;
            }
            for enemy in &mut self.enemies {
                if enemy.is_alive() && shot.intersects(&*enemy, formula) {
                    shot.kill();
                    enemy.kill();
                    kills += 1;
                    log::debug!(
                        "projectile at {} hit enemy at {}",
                        shot.body().position,
                        enemy.body().position
                    );
                    break;
                }
            }
        }
        kills
    }

    /// Drop dead enemies and projectiles.  Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.enemies.len() + self.projectiles.len();
        self.enemies.retain(|e| e.is_alive());
        self.projectiles.retain(|p| p.is_alive());
        let reaped = before - self.enemies.len() - self.projectiles.len();
        if reaped > 0 {
            log::trace!("reaped {} entities", reaped);
        }
        reaped
    }

    fn check_end(&mut self, quit: bool) {
        let loss_row = self.config.loss_row;
        if quit {
            self.status = GameStatus::Ended(EndReason::Quit);
        } else if self.enemies.iter().any(|e| e.body().position.y >= loss_row) {
            self.status = GameStatus::Ended(EndReason::Lost);
        }

        if let GameStatus::Ended(reason) = self.status {
            log::info!(
                "game ended ({:?}) after {} ticks and {} waves",
                reason,
                self.frame + 1,
                self.waves_spawned
            );
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Draw one complete frame.
    pub fn render(&self, renderer: &mut dyn Renderer) -> io::Result<()> {
        renderer.clear(BACKGROUND)?;
        for entity in self.entities() {
            debug_assert!(entity.is_alive(), "rendering an unreaped dead entity");
            entity.render(renderer)?;
        }
        renderer.present()
    }
}
