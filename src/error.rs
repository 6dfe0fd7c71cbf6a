use std::io;
use thiserror::Error;

/// Everything that can go wrong while loading or running a CHIP-8 program.
///
/// `UnsupportedOpcode` and `Sound` are recoverable: the interpreter logs an
/// unsupported opcode and skips the word, and goes quiet when the sound sink
/// fails. Stack faults halt the machine.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("couldn't load ROM: {0}")]
    RomLoad(#[source] io::Error),

    #[error("ROM is {len} bytes; at most {max} fit above 0x200", max = crate::memory::CHIP8_MAX_PROGRAM_BYTES)]
    RomTooLarge { len: usize },

    #[error("unsupported opcode {0:#06x}")]
    UnsupportedOpcode(u16),

    #[error("call stack overflow at pc {pc:#05x}")]
    StackOverflow { pc: u16 },

    #[error("call stack underflow at pc {pc:#05x}")]
    StackUnderflow { pc: u16 },

    #[error("interpreter is halted")]
    Halted,

    #[error("display error: {0}")]
    Display(#[source] io::Error),

    #[error("input error: {0}")]
    Input(#[source] io::Error),

    #[error("sound error: {0}")]
    Sound(String),
}

impl Chip8Error {
    /// fatal errors stop the machine; everything else can be stepped over
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Chip8Error::UnsupportedOpcode(_) | Chip8Error::Sound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(!Chip8Error::UnsupportedOpcode(0xffff).is_fatal());
        assert!(!Chip8Error::Sound("ENOTTY".into()).is_fatal());
        assert!(Chip8Error::StackOverflow { pc: 0x200 }.is_fatal());
        assert!(Chip8Error::StackUnderflow { pc: 0x200 }.is_fatal());
        assert!(Chip8Error::RomTooLarge { len: 4000 }.is_fatal());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Chip8Error::UnsupportedOpcode(0x5121).to_string(),
            "unsupported opcode 0x5121"
        );
        assert_eq!(
            Chip8Error::RomTooLarge { len: 3585 }.to_string(),
            "ROM is 3585 bytes; at most 3584 fit above 0x200"
        );
        assert_eq!(
            Chip8Error::StackUnderflow { pc: 0x20a }.to_string(),
            "call stack underflow at pc 0x20a"
        );
    }
}
