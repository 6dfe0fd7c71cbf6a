//! # interpreter
//!
//! The machine state the CHIP-8 program can see:
//!  V0-VF   16 8-bit registers; VF doubles as carry/borrow/collision flag
//!  I       12-bit index register, used for sprites, BCD and block moves
//!  PC      12-bit program counter, starts at 0x200
//!  stack   16 return addresses
//!  DT, ST  delay and sound timers, counted down at 60Hz by the host
//!  screen  64x32 monochrome framebuffer
//!  keys    16-key hex pad
//!
//! One call to `cycle` fetches, decodes and executes exactly one instruction;
//! nothing inside an instruction can be interrupted. Timers are *not* touched
//! by `cycle`, so the host can run instructions at whatever rate it likes and
//! call `tick_timers` at 60Hz alongside. Fx0A doesn't block the host either:
//! while no key is down it leaves PC alone, so the same instruction runs again
//! next cycle.
use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::framebuffer::Framebuffer;
use crate::input::{Input, InputEvent};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::registers::Registers;
use crate::sound::Sound;
use crate::timers::{Timers, TIMER_HZ};
use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

/// the flag register
const VF: usize = 0xf;

/// longest sprite Dxyn can draw
const MAX_SPRITE_ROWS: usize = 15;

pub struct Chip8Interpreter<'a> {
    memory: Chip8MemoryMap,
    registers: Registers,
    timers: Timers,
    framebuffer: Framebuffer,
    keypad: Keypad,
    rng: StdRng,
    halted: bool,
    silenced: bool,
    cycles: u64,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Chip8Interpreter<'a> {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            registers: Registers::new(),
            timers: Timers::new(),
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            rng: StdRng::from_entropy(),
            halted: false,
            silenced: false,
            cycles: 0,
            display,
            input,
            sound,
        }
    }

    /// make Cxkk reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// start from memory that already holds a program
    pub fn with_memory(mut self, memory: Chip8MemoryMap) -> Self {
        self.memory = memory;
        self
    }

    /// load a chip8 program from raw bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_rom(rom)
    }

    /// load a chip8 program from a file or whatever
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        self.memory.load_program(reader)
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// whether the sound sink has been given up on
    pub fn is_silenced(&self) -> bool {
        self.silenced
    }

    /// instructions fetched so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// the host's view of a key changed
    pub fn set_key(&mut self, index: u8, down: bool) {
        self.keypad.set_key(index, down);
    }

    /// fetch, decode and execute one instruction
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        let pc = self.registers.pc();
        let opcode = self.memory.get_word(pc);
        self.cycles += 1;
        match Instruction::decode(opcode) {
            Ok(instruction) => {
                trace!("{:#05x}  {:04x}  {}", pc, opcode, instruction);
                self.execute(instruction)
            }
            Err(e) if !e.is_fatal() => {
                // garbage is skipped over rather than stalling the machine
                warn!("{:#05x}: {}", pc, e);
                self.registers.advance(1);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// apply one decoded instruction; stack faults halt the machine
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        self.apply(instruction).map_err(|e| {
            error!("halting at {:#05x}: {}", self.registers.pc(), e);
            self.halted = true;
            e
        })
    }

    fn apply(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            Cls => {
                self.framebuffer.clear();
                self.registers.advance(1);
            }
            Ret => {
                let addr = self.registers.pop()?;
                self.registers.set_pc(addr.wrapping_add(2));
            }
            Jp(nnn) => self.registers.set_pc(nnn),
            Call(nnn) => {
                self.registers.push(self.registers.pc())?;
                self.registers.set_pc(nnn);
            }
            SeImm { x, kk } => self.skip_if(self.v(x) == kk),
            SneImm { x, kk } => self.skip_if(self.v(x) != kk),
            SeReg { x, y } => self.skip_if(self.v(x) == self.v(y)),
            SneReg { x, y } => self.skip_if(self.v(x) != self.v(y)),
            LdImm { x, kk } => self.set_v(x, kk),
            AddImm { x, kk } => self.set_v(x, self.v(x).wrapping_add(kk)),
            LdReg { x, y } => self.set_v(x, self.v(y)),
            Or { x, y } => self.set_v(x, self.v(x) | self.v(y)),
            And { x, y } => self.set_v(x, self.v(x) & self.v(y)),
            Xor { x, y } => self.set_v(x, self.v(x) ^ self.v(y)),
            Add { x, y } => {
                let (sum, carry) = self.v(x).overflowing_add(self.v(y));
                self.set_v_with_flag(x, sum, carry as u8);
            }
            Sub { x, y } => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.set_v_with_flag(x, vx.wrapping_sub(vy), (vx >= vy) as u8);
            }
            Shr { x, .. } => {
                let vx = self.v(x);
                self.set_v_with_flag(x, vx >> 1, vx & 0x01);
            }
            Subn { x, y } => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.set_v_with_flag(x, vy.wrapping_sub(vx), (vy >= vx) as u8);
            }
            Shl { x, .. } => {
                let vx = self.v(x);
                self.set_v_with_flag(x, vx << 1, vx >> 7);
            }
            LdI(nnn) => {
                self.registers.set_i(nnn);
                self.registers.advance(1);
            }
            JpV0(nnn) => {
                let target = nnn + self.v(0) as u16;
                self.registers.set_pc(target);
            }
            Rnd { x, kk } => {
                let r: u8 = self.rng.gen();
                self.set_v(x, r & kk);
            }
            Drw { x, y, n } => {
                self.draw(x, y, n);
                self.registers.advance(1);
            }
            Skp { x } => self.skip_if(self.keypad.is_down(self.v(x))),
            Sknp { x } => self.skip_if(!self.keypad.is_down(self.v(x))),
            LdFromDelay { x } => self.set_v(x, self.timers.delay),
            WaitKey { x } => match self.keypad.first_down() {
                Some(key) => self.set_v(x, key),
                None => trace!("waiting for a key"),
            },
            LdDelay { x } => {
                self.timers.delay = self.v(x);
                self.registers.advance(1);
            }
            LdSound { x } => {
                self.timers.sound = self.v(x);
                self.registers.advance(1);
            }
            AddI { x } => {
                let sum = self.registers.i() + self.v(x) as u16;
                self.registers.v[VF] = (sum > 0x0fff) as u8;
                self.registers.set_i(sum);
                self.registers.advance(1);
            }
            LdFont { x } => {
                self.registers.set_i(Chip8MemoryMap::font_addr(self.v(x)));
                self.registers.advance(1);
            }
            Bcd { x } => {
                let (vx, i) = (self.v(x), self.registers.i());
                self.memory.write(&[vx / 100, (vx / 10) % 10, vx % 10], i);
                self.registers.advance(1);
            }
            Store { x } => {
                let i = self.registers.i();
                let count = x as usize + 1;
                self.memory.write(&self.registers.v[..count], i);
                self.registers.advance(1);
            }
            Load { x } => {
                let i = self.registers.i();
                for r in 0..=x {
                    self.registers.v[r as usize] = self.memory.read_byte(i.wrapping_add(r as u16));
                }
                self.registers.advance(1);
            }
        }
        Ok(())
    }

    fn v(&self, x: u8) -> u8 {
        self.registers.v[x as usize]
    }

    fn set_v(&mut self, x: u8, value: u8) {
        self.registers.v[x as usize] = value;
        self.registers.advance(1);
    }

    /// the flag goes in last, so it wins when x is VF
    fn set_v_with_flag(&mut self, x: u8, value: u8, flag: u8) {
        self.registers.v[x as usize] = value;
        self.registers.v[VF] = flag;
        self.registers.advance(1);
    }

    fn skip_if(&mut self, condition: bool) {
        self.registers.advance(if condition { 2 } else { 1 });
    }

    /// Dxyn: VF is cleared first, then set if any lit pixel gets turned off
    fn draw(&mut self, x: u8, y: u8, n: u8) {
        let (vx, vy) = (self.v(x), self.v(y));
        let i = self.registers.i();
        let mut rows = [0u8; MAX_SPRITE_ROWS];
        let rows = &mut rows[..n as usize];
        for (h, row) in rows.iter_mut().enumerate() {
            *row = self.memory.read_byte(i.wrapping_add(h as u16));
        }
        self.registers.v[VF] = 0;
        let collision = self.framebuffer.draw_sprite(vx, vy, rows);
        self.registers.v[VF] = collision as u8;
    }

    /// one 60Hz timer tick; the sound sink hears about the timer running out
    pub fn tick_timers(&mut self) {
        if self.timers.tick() {
            debug!("sound timer expired");
            if !self.silenced {
                if let Err(e) = self.sound.beep() {
                    self.silence(e);
                }
            }
        }
    }

    /// let the sound sink end a tone it started
    fn update_sound(&mut self) {
        if !self.silenced {
            if let Err(e) = self.sound.update() {
                self.silence(e);
            }
        }
    }

    /// a broken sound sink is reported once and never called again
    fn silence(&mut self, e: Box<dyn Error>) {
        warn!("{}; carrying on without sound", sound_error(e));
        self.silenced = true;
    }

    /// present the framebuffer if anything changed since last time
    pub fn refresh_display(&mut self) -> Result<(), Chip8Error> {
        if self.framebuffer.is_dirty() {
            self.display
                .draw(self.framebuffer.snapshot())
                .map_err(Chip8Error::Display)?;
        }
        Ok(())
    }

    /// apply whatever the host input has seen; false once a quit is requested
    pub fn poll_input(&mut self) -> Result<bool, Chip8Error> {
        let mut running = true;
        for event in self.input.poll().map_err(Chip8Error::Input)? {
            match event {
                InputEvent::KeyDown(key) => self.set_key(key, true),
                InputEvent::KeyUp(key) => self.set_key(key, false),
                InputEvent::Quit => running = false,
            }
        }
        Ok(running)
    }

    /// Run until the user quits, `max_cycles` is reached or the machine
    /// faults. Each 60Hz frame polls input, runs this frame's share of
    /// instructions, ticks the timers, redraws if needed and then sleeps off
    /// whatever is left of the frame.
    pub fn main_loop(&mut self, config: &Config) -> Result<(), Chip8Error> {
        let frame = Duration::from_secs(1) / TIMER_HZ;
        // carried over between frames so rates that aren't a multiple of 60
        // still average out
        let mut budget: u32 = 0;
        info!(
            "running at {} instructions/s, timers at {}Hz",
            config.cycles_per_second, TIMER_HZ
        );

        loop {
            let started = Instant::now();
            if !self.poll_input()? {
                info!("quit after {} cycles", self.cycles);
                break;
            }

            budget += config.cycles_per_second;
            while budget >= TIMER_HZ {
                if config.max_cycles.map_or(false, |max| self.cycles >= max) {
                    info!("stopping after {} cycles", self.cycles);
                    return self.refresh_display();
                }
                self.cycle()?;
                budget -= TIMER_HZ;
            }

            self.tick_timers();
            self.refresh_display()?;
            self.update_sound();

            if let Some(rest) = frame.checked_sub(started.elapsed()) {
                spin_sleep::sleep(rest);
            }
        }
        Ok(())
    }
}

fn sound_error(e: Box<dyn Error>) -> Chip8Error {
    Chip8Error::Sound(e.to_string())
}
