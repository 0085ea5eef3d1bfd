/// Game entity types: the ship, the enemies of a wave, and projectiles.
///
/// Every entity owns a [`Body`] (position, velocity, bounding box, alive
/// flag) and its own movement rule in `advance`.  Entities never touch each
/// other or the world; anything they want created comes back as a value.

use std::io;

use glam::Vec2;

use crate::config::{CollisionFormula, Config};
use crate::display::Renderer;

/// The closed set of entity variants.  Doubles as the sprite id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ship,
    Enemy,
    Projectile,
}

// ── Shared state ──────────────────────────────────────────────────────────────

/// State common to every entity.  The bounding box is `size`, centred on
/// `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Displacement applied per tick.
    pub velocity: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity,
            size,
            alive: true,
        }
    }

    /// Screen-space origin of the bounding box.
    pub fn top_left(&self) -> Vec2 {
        self.position - self.size / 2.0
    }

    /// Centre distance against average half-extent on each axis.
    pub fn overlaps(&self, other: &Body, formula: CollisionFormula) -> bool {
        let delta = (self.position - other.position).abs();
        let extent = (self.size + other.size) / 2.0;
        match formula {
            CollisionFormula::Corrected => delta.x <= extent.x && delta.y <= extent.y,
            CollisionFormula::Swapped => delta.x <= extent.y && delta.y <= extent.x,
        }
    }
}

// ── Capability interface ──────────────────────────────────────────────────────

pub trait Entity {
    fn kind(&self) -> EntityKind;
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Move one tick.
    fn advance(&mut self);

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn kill(&mut self) {
        self.body_mut().alive = false;
    }

    fn render(&self, renderer: &mut dyn Renderer) -> io::Result<()> {
        renderer.draw_sprite(self.kind(), self.body().top_left())
    }

    fn intersects(&self, other: &dyn Entity, formula: CollisionFormula) -> bool {
        self.body().overlaps(other.body(), formula)
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    body: Body,
    speed: f32,
    lane: (f32, f32),
    projectile_velocity: Vec2,
    projectile_size: Vec2,
}

impl Ship {
    pub fn new(config: &Config) -> Self {
        Self {
            body: Body::new(config.ship_spawn(), Vec2::ZERO, config.ship_size),
            speed: config.ship_speed_x,
            lane: config.ship_lane(),
            projectile_velocity: Vec2::new(0.0, config.projectile_speed_y),
            projectile_size: config.projectile_size,
        }
    }

    /// Place the ship elsewhere, e.g. for a scripted scene.  `x` is clamped
    /// to the lane.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.body.position = Vec2::new(position.x.clamp(self.lane.0, self.lane.1), position.y);
        self
    }

    /// Start moving left unless already at the left edge of the lane.
    pub fn move_left(&mut self) {
        if self.body.position.x > self.lane.0 {
            self.body.velocity.x = -self.speed;
        }
    }

    /// Start moving right unless already at the right edge of the lane.
    pub fn move_right(&mut self) {
        if self.body.position.x < self.lane.1 {
            self.body.velocity.x = self.speed;
        }
    }

    pub fn stop(&mut self) {
        self.body.velocity.x = 0.0;
    }

    /// A new projectile at the ship's centre.  The caller owns it.
    pub fn shoot(&self) -> Projectile {
        Projectile::new(
            self.body.position,
            self.projectile_velocity,
            self.projectile_size,
        )
    }
}

impl Entity for Ship {
    fn kind(&self) -> EntityKind {
        EntityKind::Ship
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn advance(&mut self) {
        debug_assert!(self.body.alive, "ship advanced after death");
        self.body.position += self.body.velocity;

        // Hitting either end of the lane parks the ship there.
        let (min, max) = self.lane;
        if self.body.position.x <= min {
            self.body.position.x = min;
            self.stop();
        } else if self.body.position.x >= max {
            self.body.position.x = max;
            self.stop();
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    body: Body,
    /// Right wall for the horizontal bounce; the left wall is 0.
    field_width: f32,
}

impl Enemy {
    pub fn new(position: Vec2, config: &Config) -> Self {
        Self {
            body: Body::new(
                position,
                Vec2::new(config.enemy_speed_x, config.enemy_speed_y),
                config.enemy_size,
            ),
            field_width: config.width,
        }
    }
}

impl Entity for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Whole-pixel steps; sub-pixel speeds are truncated toward zero.
    fn advance(&mut self) {
        debug_assert!(self.body.alive, "enemy advanced after being reaped");
        self.body.position += self.body.velocity.trunc();

        let x = self.body.position.x;
        if x < 0.0 || x > self.field_width {
            self.body.velocity.x = -self.body.velocity.x;
        }
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    body: Body,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::new(position, velocity, size),
        }
    }
}

impl Entity for Projectile {
    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Dies once its centre leaves the top of the play area.
    fn advance(&mut self) {
        debug_assert!(self.body.alive, "projectile advanced after being reaped");
        self.body.position += self.body.velocity;
        if self.body.position.y < 0.0 {
            self.body.alive = false;
        }
    }
}
