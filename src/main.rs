// Separately:
// CPU: --ips times per second (1000 by default)
// Display: 60 times per second
// Timer: 60 times per second

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use chipvm::sound::{Silent, Sound};
use chipvm::window::{scale_from_factor, Screen};
use chipvm::{BeepSink, Chip8Error, Clock, Emulator, StaticFont};

#[derive(Parser, Debug)]
#[command(version, about = "Runs a CHIP-8 program")]
struct Args {
    /// Path to the program image
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 1000)]
    ips: u32,

    /// Window scale factor (rounded to 1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = 16)]
    scale: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Show PC, I, timers and stack depth in the window title
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let rom = std::fs::read(&args.rom).map_err(Chip8Error::from)?;
    let title = format!("chipvm - {} - ESC to exit", args.rom.display());

    let (mut screen, pixels, keys) = Screen::new(&title, scale_from_factor(args.scale))?;
    let sound: Box<dyn BeepSink> = match Sound::new() {
        Ok(sound) => Box::new(sound),
        Err(err) => {
            warn!("{err}, running without sound");
            Box::new(Silent)
        }
    };

    let mut emu = Emulator::new(&StaticFont::default(), &rom, pixels, sound, keys)?;
    if let Some(seed) = args.seed {
        emu = emu.with_seed(seed);
    }
    info!(
        "running {} ({} bytes) at {} instructions/s",
        args.rom.display(),
        rom.len(),
        args.ips
    );

    let mut clock = Clock::new(args.ips.max(1), Instant::now());
    while screen.is_running() {
        let synced = match emu.sync(&mut clock, Instant::now()) {
            Ok(synced) => synced,
            Err(err) => {
                if err.is_fatal_execution() {
                    error!("machine state: {}", emu.debug_snapshot());
                    error!("registers:\n{}", emu.debug_snapshot().register_overlay());
                }
                return Err(err.into());
            }
        };
        if synced.timer_steps > 0 {
            if args.debug {
                screen.set_title(&format!("{title} - {}", emu.debug_snapshot()));
            }
            screen.update()?;
            if screen.take_reset() {
                emu.reset();
            }
        }

        let wait = clock.until_next(Instant::now());
        if wait > Duration::ZERO {
            std::thread::sleep(wait);
        }
    }
    Ok(())
}
