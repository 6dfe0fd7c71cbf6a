use crate::error::Chip8Error;
use crate::memory::{CHIP8_ADDR_MASK, CHIP8_PROGRAM_ADDR};

/// how deep subroutine calls may nest
pub const CHIP8_STACK_DEPTH: usize = 16;

/// V0..VF, I, PC and the call stack
///
/// VF is an ordinary register which a handful of instructions also use as a
/// flag output, so there's no separate flags register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; 16],
    i: u16,
    pc: u16,
    sp: usize,
    stack: [u16; CHIP8_STACK_DEPTH],
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            sp: 0,
            stack: [0; CHIP8_STACK_DEPTH],
        }
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    /// I is confined to the 12-bit address space
    pub fn set_i(&mut self, addr: u16) {
        self.i = addr & CHIP8_ADDR_MASK;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr & CHIP8_ADDR_MASK;
    }

    /// move on to the next (n=1) or next-but-one (n=2) instruction
    pub fn advance(&mut self, n: u16) {
        self.set_pc(self.pc.wrapping_add(2 * n));
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        if self.sp == CHIP8_STACK_DEPTH {
            return Err(Chip8Error::StackOverflow { pc: self.pc });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// the live portion of the call stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let r = Registers::new();
        assert_eq!(r.v, [0; 16]);
        assert_eq!(r.i(), 0);
        assert_eq!(r.pc(), 0x200);
        assert_eq!(r.sp(), 0);
        assert!(r.stack().is_empty());
    }

    #[test]
    fn test_push_pop() -> Result<(), Chip8Error> {
        let mut r = Registers::new();
        r.push(0x202)?;
        r.push(0x340)?;
        assert_eq!(r.stack(), &[0x202, 0x340]);
        assert_eq!(r.pop()?, 0x340);
        assert_eq!(r.pop()?, 0x202);
        assert_eq!(r.sp(), 0);
        Ok(())
    }

    #[test]
    fn test_overflow() {
        let mut r = Registers::new();
        for n in 0..16 {
            r.push(0x200 + n).unwrap();
        }
        assert!(matches!(r.push(0x300), Err(Chip8Error::StackOverflow { pc: 0x200 })));
        assert_eq!(r.sp(), 16);
    }

    #[test]
    fn test_underflow() {
        let mut r = Registers::new();
        r.set_pc(0x246);
        assert!(matches!(r.pop(), Err(Chip8Error::StackUnderflow { pc: 0x246 })));
        assert_eq!(r.sp(), 0);
    }

    #[test]
    fn test_addresses_confined() {
        let mut r = Registers::new();
        r.set_i(0x1abc);
        assert_eq!(r.i(), 0xabc);
        r.set_pc(0xffe);
        r.advance(1);
        assert_eq!(r.pc(), 0x000);
        r.advance(2);
        assert_eq!(r.pc(), 0x004);
    }
}
