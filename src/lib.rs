//! A CHIP-8 interpreter.
//!
//! ## Design
//!
//! * the core is a plain state machine: `cycle()` runs exactly one
//!   instruction, `tick_timers()` counts the timers down; nothing else moves
//! * instructions run at whatever rate the host picks; timers always run at
//!   60Hz, independently of the instruction rate
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * input device, with trait for reading key-presses
//! * audio device, with trait for making beeps
//! * no SUPER-CHIP, no quirk modes
//!
//! Model
//!
//! main
//!  |-- config (command line)
//!  |-- display, input, sound
//!  |-- interpreter(display, input, sound)
//!  |    |-- memory (font at 0x000, program at 0x200)
//!  |    |-- registers, timers, framebuffer, keypad
//!  |    `-- instruction set: decode once, execute once
//!  `-- main loop, once per 1/60s frame
//!       |-- poll input -> keypad
//!       |-- run cycles_per_second / 60 instructions
//!       |-- tick timers; beep when the sound timer runs out
//!       |-- present the framebuffer if it's dirty
//!       `-- sleep off the rest of the frame
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timers;

pub use error::Chip8Error;
pub use interpreter::Chip8Interpreter;
