use std::io::Write;
use std::time::Duration;

use glam::Vec2;

use space_invaders::config::*;

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_match_the_classic_layout() {
    let c = Config::default();
    assert_eq!((c.width, c.height), (600.0, 600.0));
    assert_eq!(c.tick_rate_hz, 30);
    assert_eq!(c.loss_row, 480.0);
    assert_eq!(c.ship_lane(), (60.0, 540.0));
    assert_eq!(c.ship_spawn(), Vec2::new(300.0, 550.0));
    assert_eq!(c.collision, CollisionFormula::Corrected);
    assert!(c.validate().is_ok());
}

#[test]
fn tick_interval_follows_tick_rate() {
    let mut c = Config::default();
    c.tick_rate_hz = 50;
    assert_eq!(c.tick_interval(), Duration::from_millis(20));
}

#[test]
fn default_wave_positions() {
    let positions: Vec<Vec2> = WaveLayout::default().positions().collect();
    assert_eq!(
        positions,
        vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(300.0, 100.0),
            Vec2::new(500.0, 100.0),
        ]
    );
}

#[test]
fn partial_file_keeps_other_defaults() {
    let file = write_config(
        r#"{ "ship_speed_x": 12.5, "collision": "swapped", "enemy_size": [80.0, 60.0] }"#,
    );
    let c = Config::from_path(file.path()).unwrap();
    assert_eq!(c.ship_speed_x, 12.5);
    assert_eq!(c.collision, CollisionFormula::Swapped);
    assert_eq!(c.enemy_size, Vec2::new(80.0, 60.0));
    assert_eq!(c.width, 600.0);
    assert_eq!(c.wave, WaveLayout::default());
}

#[test]
fn json_round_trip() {
    let c = Config::default();
    let json = serde_json::to_string(&c).unwrap();
    let file = write_config(&json);
    assert_eq!(Config::from_path(file.path()).unwrap(), c);
}

#[test]
fn missing_file_is_an_error() {
    let err = Config::from_path("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("reading config file"));
}

#[test]
fn malformed_json_is_an_error() {
    let file = write_config("{ width: ");
    let err = Config::from_path(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("parsing config file"));
}

#[test]
fn invalid_values_are_rejected() {
    let file = write_config(r#"{ "tick_rate_hz": 0 }"#);
    assert!(Config::from_path(file.path()).is_err());

    let mut c = Config::default();
    c.ship_margin = 400.0;
    assert!(c.validate().is_err());

    let mut c = Config::default();
    c.projectile_size = Vec2::new(0.0, 20.0);
    assert!(c.validate().is_err());

    let mut c = Config::default();
    c.wave.count = 0;
    assert!(c.validate().is_err());

    let mut c = Config::default();
    c.loss_row = 700.0;
    assert!(c.validate().is_err());
}

#[test]
fn enemies_must_step_down_at_least_a_pixel() {
    for speed in [0.5, 0.0, -2.0] {
        let mut c = Config::default();
        c.enemy_speed_y = speed;
        assert!(c.validate().is_err(), "enemy_speed_y {} accepted", speed);
    }

    let mut c = Config::default();
    c.enemy_speed_y = 1.0;
    assert!(c.validate().is_ok());
}
