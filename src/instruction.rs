//! # instruction set
//!
//! Every CHIP-8 instruction is one big-endian 16-bit word. The fields are
//! always in the same places:
//!
//!   nnn = opcode & 0xfff    address
//!   kk  = opcode & 0xff     byte immediate
//!   n   = opcode & 0xf      nibble immediate
//!   x   = (opcode >> 8) & 0xf
//!   y   = (opcode >> 4) & 0xf
//!
//! The top nibble picks the family; families 0, 8, E and F look further down
//! the word. Decoding happens once per cycle and the result is matched once by
//! the interpreter.
use crate::error::Chip8Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeImm { x: u8, kk: u8 },
    /// 4xkk
    SneImm { x: u8, kk: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xkk
    LdImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    Add { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8, y: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8, y: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd { x: u8, kk: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp { x: u8 },
    /// ExA1
    Sknp { x: u8 },
    /// Fx07
    LdFromDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    LdDelay { x: u8 },
    /// Fx18
    LdSound { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LdFont { x: u8 },
    /// Fx33
    Bcd { x: u8 },
    /// Fx55
    Store { x: u8 },
    /// Fx65
    Load { x: u8 },
}

impl Instruction {
    pub fn decode(opcode: u16) -> Result<Self, Chip8Error> {
        use Instruction::*;

        let nnn = opcode & 0x0fff;
        let kk = (opcode & 0x00ff) as u8;
        let n = (opcode & 0x000f) as u8;
        let x = ((opcode >> 8) & 0x0f) as u8;
        let y = ((opcode >> 4) & 0x0f) as u8;

        let instruction = match opcode >> 12 {
            0x0 => match opcode {
                0x00e0 => Cls,
                0x00ee => Ret,
                _ => return Err(Chip8Error::UnsupportedOpcode(opcode)),
            },
            0x1 => Jp(nnn),
            0x2 => Call(nnn),
            0x3 => SeImm { x, kk },
            0x4 => SneImm { x, kk },
            0x5 if n == 0 => SeReg { x, y },
            0x6 => LdImm { x, kk },
            0x7 => AddImm { x, kk },
            0x8 => match n {
                0x0 => LdReg { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => Add { x, y },
                0x5 => Sub { x, y },
                0x6 => Shr { x, y },
                0x7 => Subn { x, y },
                0xe => Shl { x, y },
                _ => return Err(Chip8Error::UnsupportedOpcode(opcode)),
            },
            0x9 if n == 0 => SneReg { x, y },
            0xa => LdI(nnn),
            0xb => JpV0(nnn),
            0xc => Rnd { x, kk },
            0xd => Drw { x, y, n },
            0xe => match kk {
                0x9e => Skp { x },
                0xa1 => Sknp { x },
                _ => return Err(Chip8Error::UnsupportedOpcode(opcode)),
            },
            0xf => match kk {
                0x07 => LdFromDelay { x },
                0x0a => WaitKey { x },
                0x15 => LdDelay { x },
                0x18 => LdSound { x },
                0x1e => AddI { x },
                0x29 => LdFont { x },
                0x33 => Bcd { x },
                0x55 => Store { x },
                0x65 => Load { x },
                _ => return Err(Chip8Error::UnsupportedOpcode(opcode)),
            },
            _ => return Err(Chip8Error::UnsupportedOpcode(opcode)),
        };
        Ok(instruction)
    }
}

/// disassembly in the usual Cowgod mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(nnn) => write!(f, "JP {:#05x}", nnn),
            Call(nnn) => write!(f, "CALL {:#05x}", nnn),
            SeImm { x, kk } => write!(f, "SE V{:X}, {:#04x}", x, kk),
            SneImm { x, kk } => write!(f, "SNE V{:X}, {:#04x}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdImm { x, kk } => write!(f, "LD V{:X}, {:#04x}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:#04x}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, .. } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, .. } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(nnn) => write!(f, "LD I, {:#05x}", nnn),
            JpV0(nnn) => write!(f, "JP V0, {:#05x}", nnn),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04x}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdFromDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            LdDelay { x } => write!(f, "LD DT, V{:X}", x),
            LdSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Load { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    fn decode(opcode: u16) -> Instruction {
        Instruction::decode(opcode).unwrap()
    }

    #[test]
    fn test_fields() {
        assert_eq!(decode(0xd12f), Drw { x: 1, y: 2, n: 0xf });
        assert_eq!(decode(0x6a05), LdImm { x: 0xa, kk: 0x05 });
        assert_eq!(decode(0x1234), Jp(0x234));
        assert_eq!(decode(0x2fff), Call(0xfff));
        assert_eq!(decode(0xa000), LdI(0x000));
        assert_eq!(decode(0xb3c0), JpV0(0x3c0));
    }

    #[test]
    fn test_family_0() {
        assert_eq!(decode(0x00e0), Cls);
        assert_eq!(decode(0x00ee), Ret);
        // SYS calls into 1802 machine code aren't emulated
        assert!(matches!(
            Instruction::decode(0x0123),
            Err(Chip8Error::UnsupportedOpcode(0x0123))
        ));
        assert!(Instruction::decode(0x0000).is_err());
    }

    #[test]
    fn test_family_8() {
        let expected = [
            (0x8010, LdReg { x: 0, y: 1 }),
            (0x8011, Or { x: 0, y: 1 }),
            (0x8012, And { x: 0, y: 1 }),
            (0x8013, Xor { x: 0, y: 1 }),
            (0x8014, Add { x: 0, y: 1 }),
            (0x8015, Sub { x: 0, y: 1 }),
            (0x8016, Shr { x: 0, y: 1 }),
            (0x8017, Subn { x: 0, y: 1 }),
            (0x801e, Shl { x: 0, y: 1 }),
        ];
        for (opcode, instruction) in expected {
            assert_eq!(decode(opcode), instruction, "{:#06x}", opcode);
        }
        for opcode in [0x8018, 0x8019, 0x801a, 0x801b, 0x801c, 0x801d, 0x801f] {
            assert!(Instruction::decode(opcode).is_err(), "{:#06x}", opcode);
        }
    }

    #[test]
    fn test_register_compare_needs_zero_nibble() {
        assert_eq!(decode(0x5ab0), SeReg { x: 0xa, y: 0xb });
        assert_eq!(decode(0x9ab0), SneReg { x: 0xa, y: 0xb });
        assert!(Instruction::decode(0x5ab1).is_err());
        assert!(Instruction::decode(0x9abf).is_err());
    }

    #[test]
    fn test_families_e_and_f() {
        assert_eq!(decode(0xe79e), Skp { x: 7 });
        assert_eq!(decode(0xe7a1), Sknp { x: 7 });
        assert!(Instruction::decode(0xe7a2).is_err());
        assert_eq!(decode(0xf207), LdFromDelay { x: 2 });
        assert_eq!(decode(0xf20a), WaitKey { x: 2 });
        assert_eq!(decode(0xf215), LdDelay { x: 2 });
        assert_eq!(decode(0xf218), LdSound { x: 2 });
        assert_eq!(decode(0xf21e), AddI { x: 2 });
        assert_eq!(decode(0xf229), LdFont { x: 2 });
        assert_eq!(decode(0xf233), Bcd { x: 2 });
        assert_eq!(decode(0xf255), Store { x: 2 });
        assert_eq!(decode(0xf265), Load { x: 2 });
        // SUPER-CHIP's big font isn't supported
        assert!(Instruction::decode(0xf230).is_err());
    }

    #[test]
    fn test_disassembly() {
        assert_eq!(decode(0x6a05).to_string(), "LD VA, 0x05");
        assert_eq!(decode(0x8015).to_string(), "SUB V0, V1");
        assert_eq!(decode(0x1234).to_string(), "JP 0x234");
        assert_eq!(decode(0xd125).to_string(), "DRW V1, V2, 5");
        assert_eq!(decode(0xf30a).to_string(), "LD V3, K");
        assert_eq!(decode(0x00ee).to_string(), "RET");
    }
}
