use std::ops::Range;

use crate::{Chip8Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const STACK_SIZE: usize = 16;
pub const FONT_START: usize = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 16 * 5] = [
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

/// Registers, memory, call stack and timers of the machine.
///
/// Fields are public so frontends and tests can inspect (and seed) the
/// machine directly; the engine itself only goes through the checked helpers.
#[derive(Debug, Clone)]
pub struct Chip8State {
    pub data_registers: [u8; 16],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub ram: [u8; MEMORY_SIZE],
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Default for Chip8State {
    fn default() -> Self {
        Self {
            data_registers: [0; 16],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            ram: [0; MEMORY_SIZE],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

impl Chip8State {
    /// Power-on state: everything zeroed, font preloaded, PC at 0x200.
    pub fn new() -> Self {
        let mut state = Self::default();
        state.load_font_data(&FONT);
        state
    }

    pub fn load_font_data(&mut self, fonts: &[u8]) {
        self.ram[FONT_START..FONT_START + fonts.len()].copy_from_slice(fonts);
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.load_program_at(program, PROGRAM_START)
    }

    /// Copies `program` into memory at `base`. Fails without touching memory
    /// if the program does not fit.
    pub fn load_program_at(&mut self, program: &[u8], base: u16) -> Result<()> {
        let max_size = MEMORY_SIZE.saturating_sub(base as usize);
        if base as usize > MEMORY_SIZE || program.len() > max_size {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max_size,
            });
        }
        let base = base as usize;
        self.ram[base..base + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[(register_index & 0xF) as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[(register_index & 0xF) as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(0xF) = flag as u8;
    }

    /// Checked `start..start + len` range into `ram`.
    pub fn memory_range(&self, start: u16, len: usize) -> Result<Range<usize>> {
        let start = start as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }

    pub fn memory(&self, start: u16, len: usize) -> Result<&[u8]> {
        let range = self.memory_range(start, len)?;
        Ok(&self.ram[range])
    }

    pub fn memory_mut(&mut self, start: u16, len: usize) -> Result<&mut [u8]> {
        let range = self.memory_range(start, len)?;
        Ok(&mut self.ram[range])
    }

    /// Pushes a return address, `None` when all 16 slots are taken.
    pub fn push_return(&mut self, address: u16) -> Option<()> {
        let slot = self.stack.get_mut(self.stack_pointer as usize)?;
        *slot = address;
        self.stack_pointer += 1;
        Some(())
    }

    pub fn pop_return(&mut self) -> Option<u16> {
        self.stack_pointer = self.stack_pointer.checked_sub(1)?;
        Some(self.stack[self.stack_pointer as usize])
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
