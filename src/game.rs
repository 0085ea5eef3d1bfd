//! The paced game loop.

use std::io;
use std::time::Instant;

use crate::compute::{EndReason, GameStatus, World};
use crate::display::Renderer;
use crate::input::InputSource;

/// Tick the world until it ends, drawing after every running tick and
/// sleeping out the rest of each tick interval.
///
/// The frame for the tick that ends the game is never drawn.
pub fn run<I>(world: &mut World, input: &mut I, renderer: &mut dyn Renderer) -> io::Result<EndReason>
where
    I: InputSource + ?Sized,
{
    let interval = world.config().tick_interval();
    log::info!("game loop started at {} ticks/s", world.config().tick_rate_hz);

    loop {
        let frame_start = Instant::now();

        let snapshot = input.poll();
        if let GameStatus::Ended(reason) = world.tick(&snapshot) {
            return Ok(reason);
        }

        world.render(renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        } else {
            log::debug!("tick {} overran by {:?}", world.frame(), elapsed - interval);
        }
    }
}
