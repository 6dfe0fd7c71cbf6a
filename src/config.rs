use crate::input::Keymap;
use clap::Parser;
use std::path::PathBuf;

/// instructions per second when nobody says otherwise; fast enough for most
/// games without the timers falling behind
pub const DEFAULT_CYCLES_PER_SECOND: u32 = 700;

/// printed under --help
const LOGGING_HELP: &str = "Logs go to stderr, which shares the terminal with the display. \
Set RUST_LOG (default: warn) and redirect stderr, e.g. `2>chip8.log`, to keep them off the screen.";

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "chip8", version, long_about = None, after_help = LOGGING_HELP)]
pub struct Config {
    /// Path to the program to run; loaded at 0x200
    pub rom: PathBuf,

    /// Instructions executed per second (timers always run at 60Hz)
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles_per_second: u32,

    /// Stop after this many instructions
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Which keyboard keys stand in for the hex pad
    #[arg(long, value_enum, default_value_t = Keymap::Conventional)]
    pub keymap: Keymap,

    /// Don't beep
    #[arg(long)]
    pub mute: bool,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rom: PathBuf::new(),
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
            max_cycles: None,
            keymap: Keymap::default(),
            mute: false,
            seed: None,
        }
    }
}
