mod beeper;
mod cpu;
mod display;
mod error;
mod instruction;
mod interpreter;
mod keyboard;
mod state;

pub use beeper::Chip8Beeper;
pub use cpu::Chip8;
pub use display::{Chip8Display, Framebuffer, PIXEL_OFF, PIXEL_ON, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::{Chip8Error, Result};
pub use instruction::{Instruction, Opcode};
pub use interpreter::{Chip8Interpreter, InterpreterConfig, RunSummary};
pub use keyboard::{Chip8Keyboard, Keypad, KEY_COUNT};
pub use state::{
    Chip8State, FONT, FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE, PROGRAM_START, STACK_SIZE,
};
