use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};

use space_invaders::display::TerminalRenderer;
use space_invaders::input::{self, TerminalInput};
use space_invaders::{game, Config, EndReason, World};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Shoot down the descending wave before it reaches you")]
struct Cli {
    /// JSON file overriding any of the default game constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without the kitty protocol
    // fall back to hold-window expiry in TerminalInput.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("keyboard enhancement: {}", keyboard_enhanced);

    let rx = input::spawn_reader(event::read);

    let result = play(&mut out, config, TerminalInput::new(rx, keyboard_enhanced));

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match result? {
        EndReason::Lost => println!("Game over: the invaders reached the ground."),
        EndReason::Quit => println!("Bye."),
    }
    Ok(())
}

fn play<W: Write>(out: &mut W, config: Config, mut input: TerminalInput) -> Result<EndReason> {
    let size = terminal::size().context("querying terminal size")?;
    let mut renderer = TerminalRenderer::new(out, &config, size);
    let mut world = World::new(config);

    let reason = game::run(&mut world, &mut input, &mut renderer).context("game loop")?;
    Ok(reason)
}
