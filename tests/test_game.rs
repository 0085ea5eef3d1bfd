use std::collections::VecDeque;
use std::io;

use crossterm::style::Color;
use glam::Vec2;

use space_invaders::compute::{EndReason, World, BACKGROUND};
use space_invaders::config::Config;
use space_invaders::display::Renderer;
use space_invaders::entities::{Entity, EntityKind};
use space_invaders::game::run;
use space_invaders::input::{InputSnapshot, InputSource, Key};

#[derive(Debug, PartialEq)]
enum Call {
    Clear(Color),
    Sprite(EntityKind, Vec2),
    Present,
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

impl RecordingRenderer {
    fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Present).count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.calls.push(Call::Clear(color));
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: EntityKind, top_left: Vec2) -> io::Result<()> {
        self.calls.push(Call::Sprite(sprite, top_left));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

/// Plays back a fixed list of snapshots, then idles.
struct Script(VecDeque<InputSnapshot>);

impl Script {
    fn new(snapshots: Vec<InputSnapshot>) -> Self {
        Self(snapshots.into())
    }
}

impl InputSource for Script {
    fn poll(&mut self) -> InputSnapshot {
        self.0.pop_front().unwrap_or_default()
    }
}

struct BrokenScreen;

impl Renderer for BrokenScreen {
    fn clear(&mut self, _: Color) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
    }

    fn draw_sprite(&mut self, _: EntityKind, _: Vec2) -> io::Result<()> {
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fast_config() -> Config {
    Config {
        tick_rate_hz: 1000,
        ..Config::default()
    }
}

// ── World::render ─────────────────────────────────────────────────────────────

#[test]
fn render_clears_draws_every_entity_then_presents() {
    let mut world = World::new(Config::default());
    world.tick(&InputSnapshot::press(Key::Fire));

    let mut r = RecordingRenderer::default();
    world.render(&mut r).unwrap();

    assert_eq!(r.calls.first(), Some(&Call::Clear(BACKGROUND)));
    assert_eq!(r.calls.last(), Some(&Call::Present));
    assert_eq!(r.calls[1], Call::Sprite(EntityKind::Ship, Vec2::new(250.0, 500.0)));
    assert_eq!(r.calls[2], Call::Sprite(EntityKind::Enemy, Vec2::new(50.0, 50.0)));
    assert_eq!(
        r.calls[5],
        Call::Sprite(EntityKind::Projectile, Vec2::new(295.0, 525.0))
    );
    assert_eq!(r.calls.len(), 7);
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn quit_stops_without_drawing_the_final_tick() {
    let mut world = World::new(fast_config());
    let mut input = Script::new(vec![
        InputSnapshot::new(),
        InputSnapshot::press(Key::MoveRight),
        InputSnapshot::press(Key::Quit),
    ]);
    let mut r = RecordingRenderer::default();

    let reason = run(&mut world, &mut input, &mut r).unwrap();

    assert_eq!(reason, EndReason::Quit);
    assert_eq!(world.frame(), 3);
    assert_eq!(r.frames(), 2);
}

#[test]
fn idle_game_is_lost() {
    let mut config = fast_config();
    config.enemy_speed_y = 20.0;
    let mut world = World::new(config);
    let mut input = Script::new(Vec::new());
    let mut r = RecordingRenderer::default();

    let reason = run(&mut world, &mut input, &mut r).unwrap();

    assert_eq!(reason, EndReason::Lost);
    // spawn tick + 19 moves of 20 rows; the last one is not drawn
    assert_eq!(world.frame(), 20);
    assert_eq!(r.frames(), 19);
    assert!(world.enemies().iter().any(|e| e.body().position.y >= 480.0));
}

#[test]
fn renderer_errors_stop_the_loop() {
    let mut world = World::new(fast_config());
    let mut input = Script::new(Vec::new());

    let err = run(&mut world, &mut input, &mut BrokenScreen).unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(world.frame(), 1);
}
