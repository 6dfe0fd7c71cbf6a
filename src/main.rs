use std::error::Error;
use std::fs;
use std::process;

use chip8::config::Config;
use chip8::display::MonoTermDisplay;
use chip8::input::TermInput;
use chip8::interpreter::Chip8Interpreter;
use chip8::memory::Chip8MemoryMap;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::Chip8Error;
use clap::Parser;
use env_logger::Env;
use log::info;

fn main() {
    // the display owns stdout, so logs go to stderr; see the --help footer
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let config = Config::parse();

    if let Err(e) = run(&config) {
        eprintln!("chip8: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    // read and place the ROM before the terminal goes raw so a bad path or an
    // oversized file reads cleanly
    info!("loading {}", config.rom.display());
    let rom = fs::read(&config.rom).map_err(Chip8Error::RomLoad)?;
    let memory = Chip8MemoryMap::from_rom(&rom)?;

    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new(config.keymap)?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut interpreter =
        Chip8Interpreter::new(&mut display, &mut input, sound.as_mut()).with_memory(memory);
    if let Some(seed) = config.seed {
        interpreter = interpreter.with_seed(seed);
    }

    interpreter.main_loop(config)?;
    Ok(())
}
