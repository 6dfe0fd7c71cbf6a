use crate::error::Chip8Error;
use log::debug;
use std::io;

// NB. addresses are u16 as per the chip-8; every access is masked to 12 bits,
//     so code and data are free to overlap and run off the end of RAM

/// Represents the byte-addressable memory map
pub trait MemoryMap {
    /// read one byte; addr is taken mod 4096
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte; addr is taken mod 4096
    fn write_byte(&mut self, addr: u16, value: u8);

    /// write a chunk of bytes, wrapping at the top of RAM
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// get a big-endian two-byte word (opcodes)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(addr.wrapping_add(1)) as u16)
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// mask applied to every address
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// the largest program that fits between 0x200 and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the hex digit glyphs live; each glyph is 5 bytes
pub const CHIP8_FONT_ADDR: u16 = 0x000;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map
///   0x0000-0x004f  hex font
///   0x0050-0x01ff  unused (was the interpreter)
///   0x0200-0x0fff  program
pub struct Chip8MemoryMap {
    bytes: Box<[u8; CHIP8_RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize] = value;
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font baked in at 0x000
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// copy a program verbatim to 0x200; too-large programs leave RAM untouched
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::RomTooLarge { len: rom.len() });
        }
        self.write(rom, CHIP8_PROGRAM_ADDR);
        debug!("loaded {} byte program at {:#05x}", rom.len(), CHIP8_PROGRAM_ADDR);
        Ok(())
    }

    /// fresh memory with a program already in place
    pub fn from_rom(rom: &[u8]) -> Result<Self, Chip8Error> {
        let mut mm = Chip8MemoryMap::new();
        mm.load_rom(rom)?;
        Ok(mm)
    }

    /// read a whole program from somewhere and load it at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(Chip8Error::RomLoad)?;
        self.load_rom(&buf)
    }

    /// address of the glyph for a hex digit
    pub fn font_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + (digit as u16) * CHIP8_FONT_GLYPH_BYTES
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
