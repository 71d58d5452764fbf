use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    Chip8Error, Chip8State, Framebuffer, Instruction, Keypad, Opcode, Result, FONT_GLYPH_SIZE,
    PROGRAM_START,
};

/// The execution engine: machine state plus framebuffer, keypad and random
/// source. Has no notion of time; every call to [`Chip8::step`] is one cycle.
pub struct Chip8 {
    state: Chip8State,
    framebuffer: Framebuffer,
    keypad: Keypad,
    rng: StdRng,
    seed: Option<u64>,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), None)
    }

    /// Same as [`Chip8::new`] but with a reproducible random source, also
    /// reused on every [`Chip8::reset`].
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), Some(seed))
    }

    fn with_rng(rng: StdRng, seed: Option<u64>) -> Self {
        Self {
            state: Chip8State::new(),
            framebuffer: Framebuffer::default(),
            keypad: Keypad::default(),
            rng,
            seed,
        }
    }

    /// Back to power-on: memory, registers, stack, keypad and screen zeroed,
    /// font reloaded, PC at 0x200, random source reseeded.
    pub fn reset(&mut self) {
        self.state = Chip8State::new();
        self.framebuffer = Framebuffer::default();
        self.keypad.clear();
        self.rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!("machine reset");
    }

    pub fn load<P: AsRef<[u8]>>(&mut self, program: P) -> Result<()> {
        self.load_at(program, PROGRAM_START)
    }

    pub fn load_at<P: AsRef<[u8]>>(&mut self, program: P, base: u16) -> Result<()> {
        let program = program.as_ref();
        self.state.load_program_at(program, base)?;
        log::info!("loaded {} byte program at {:#05X}", program.len(), base);
        Ok(())
    }

    /// Runs one fetch/decode/execute cycle, then ticks both timers.
    pub fn step(&mut self) -> Result<()> {
        let address = self.state.program_counter;
        let opcode = self
            .fetch()
            .map_err(|error| warn_out_of_bounds(address, error))?;
        let instruction = Instruction::decode(opcode);
        log::trace!("{:#05X}: {} ({})", address, opcode, instruction);

        self.execute(instruction)?;

        self.state.tick_timers();
        Ok(())
    }

    fn fetch(&mut self) -> Result<Opcode> {
        let bytes = self.state.memory(self.state.program_counter, 2)?;
        let opcode = Opcode::from_bytes(bytes[0], bytes[1]);
        self.state.program_counter += 2;
        Ok(opcode)
    }

    /// Applies a single instruction as if it had just been fetched, i.e. with
    /// the program counter already pointing past it. Does not tick timers.
    pub fn execute(&mut self, instruction: Instruction) -> Result<()> {
        let address = self.state.program_counter.wrapping_sub(2);
        self.dispatch(instruction, address)
            .map_err(|error| warn_out_of_bounds(address, error))
    }

    fn dispatch(&mut self, instruction: Instruction, address: u16) -> Result<()> {
        let state = &mut self.state;

        match instruction {
            Instruction::ClearScreen => self.framebuffer.clear(),
            Instruction::Return => {
                state.program_counter = state.pop_return().ok_or_else(|| {
                    log::warn!("return at {:#05X} with an empty stack", address);
                    Chip8Error::StackUnderflow { address }
                })?;
            }
            Instruction::Jump { address } => state.program_counter = address,
            Instruction::Call { address: target } => {
                state.push_return(state.program_counter).ok_or_else(|| {
                    log::warn!("call at {:#05X} overflows the stack", address);
                    Chip8Error::StackOverflow { address }
                })?;
                state.program_counter = target;
            }
            Instruction::SkipEqImmediate { x, value } => {
                if state.register(x) == value {
                    state.program_counter += 2;
                }
            }
            Instruction::SkipNeImmediate { x, value } => {
                if state.register(x) != value {
                    state.program_counter += 2;
                }
            }
            Instruction::SkipEqRegister { x, y } => {
                if state.register(x) == state.register(y) {
                    state.program_counter += 2;
                }
            }
            Instruction::SetImmediate { x, value } => *state.register_mut(x) = value,
            Instruction::AddImmediate { x, value } => {
                *state.register_mut(x) = state.register(x).wrapping_add(value)
            }
            Instruction::SetRegister { x, y } => *state.register_mut(x) = state.register(y),
            Instruction::Or { x, y } => *state.register_mut(x) |= state.register(y),
            Instruction::And { x, y } => *state.register_mut(x) &= state.register(y),
            Instruction::Xor { x, y } => *state.register_mut(x) ^= state.register(y),
            // VF is written first; the result is then computed from the
            // registers as they stand, so Vx = VF ends up holding the result.
            Instruction::AddRegister { x, y } => {
                let (_, carry) = state.register(x).overflowing_add(state.register(y));
                state.set_flag(carry);
                *state.register_mut(x) = state.register(x).wrapping_add(state.register(y));
            }
            Instruction::Sub { x, y } => {
                state.set_flag(state.register(x) > state.register(y));
                *state.register_mut(x) = state.register(x).wrapping_sub(state.register(y));
            }
            Instruction::ShiftRight { x } => {
                state.set_flag(state.register(x) & 0x01 == 1);
                *state.register_mut(x) = state.register(x) >> 1;
            }
            Instruction::SubN { x, y } => {
                state.set_flag(state.register(y) > state.register(x));
                *state.register_mut(x) = state.register(y).wrapping_sub(state.register(x));
            }
            Instruction::ShiftLeft { x } => {
                state.set_flag(state.register(x) >> 7 == 1);
                *state.register_mut(x) = state.register(x) << 1;
            }
            Instruction::SkipNeRegister { x, y } => {
                if state.register(x) != state.register(y) {
                    state.program_counter += 2;
                }
            }
            Instruction::SetIndex { address } => state.index_register = address,
            Instruction::JumpOffset { address } => {
                state.program_counter = address + state.register(0x0) as u16
            }
            Instruction::Random { x, mask } => {
                *state.register_mut(x) = self.rng.gen::<u8>() & mask
            }
            Instruction::Draw { x, y, height } => {
                let vx = state.register(x);
                let vy = state.register(y);
                let sprite = state.memory(state.index_register, height as usize)?;

                let collision = self.framebuffer.draw_sprite(vx, vy, sprite);

                state.set_flag(collision);
            }
            Instruction::SkipKeyPressed { x } => {
                if self.keypad.is_key_down(state.register(x)) {
                    state.program_counter += 2;
                }
            }
            Instruction::SkipKeyNotPressed { x } => {
                if !self.keypad.is_key_down(state.register(x)) {
                    state.program_counter += 2;
                }
            }
            Instruction::GetDelay { x } => *state.register_mut(x) = state.delay_timer,
            Instruction::WaitKey { x } => match self.keypad.first_pressed() {
                Some(key) => *state.register_mut(x) = key,
                None => state.program_counter = state.program_counter.wrapping_sub(2),
            },
            Instruction::SetDelay { x } => state.delay_timer = state.register(x),
            Instruction::SetSound { x } => state.sound_timer = state.register(x),
            Instruction::AddIndex { x } => {
                state.index_register = state
                    .index_register
                    .wrapping_add(state.register(x) as u16)
            }
            Instruction::SpriteAddress { x } => {
                state.index_register = state.register(x) as u16 * FONT_GLYPH_SIZE
            }
            Instruction::Bcd { x } => {
                let value = state.register(x);
                let digits = state.memory_mut(state.index_register, 3)?;
                digits.copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            Instruction::StoreRegisters { x } => {
                let count = x as usize + 1;
                let range = state.memory_range(state.index_register, count)?;
                state.ram[range].copy_from_slice(&state.data_registers[..count]);
            }
            Instruction::LoadRegisters { x } => {
                let count = x as usize + 1;
                let range = state.memory_range(state.index_register, count)?;
                state.data_registers[..count].copy_from_slice(&state.ram[range]);
            }
            Instruction::Unknown(opcode) => {
                log::trace!("ignoring unknown opcode {} at {:#05X}", opcode, address);
            }
        }

        Ok(())
    }

    pub fn state(&self) -> &Chip8State {
        &self.state
    }

    /// Direct access for frontends and tests that need to seed registers or
    /// memory. The engine assumes nothing else mutates state mid-step.
    pub fn state_mut(&mut self) -> &mut Chip8State {
        &mut self.state
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Consumers use this to acknowledge a rendered frame.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.state.register(register_index)
    }

    pub fn program_counter(&self) -> u16 {
        self.state.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.state.index_register
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// A frontend should sound a tone while this holds.
    pub fn is_sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }
}

fn warn_out_of_bounds(address: u16, error: Chip8Error) -> Chip8Error {
    if let Chip8Error::MemoryOutOfBounds { address: target } = &error {
        log::warn!(
            "instruction at {:#05X} reached {:#06X}, past the end of memory",
            address,
            target
        );
    }
    error
}
