//! Space Invaders - a fixed-tick terminal arcade shooter
//!
//! - `entities`: ship, enemies and projectiles with their movement rules
//! - `compute`: the world and its tick pipeline
//! - `input`: logical keys and per-tick input snapshots
//! - `display`: the renderer boundary and the terminal renderer
//! - `config`: tunable constants
//! - `game`: the paced loop tying them together

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod game;
pub mod input;

pub use compute::{EndReason, GameStatus, World};
pub use config::Config;
