use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;

use chipvm_core::{Chip8Interpreter, InterpreterConfig};

mod frontend;

use frontend::{IdleKeyboard, LogBeeper, TextDisplay};

/// Runs a CHIP-8 ROM headlessly, printing the screen as text.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// ROM image to load at 0x200
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500)]
    clock_speed: u32,

    /// Stop after this many instructions
    #[arg(long)]
    cycles: Option<u64>,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = InterpreterConfig {
        clock_speed: args.clock_speed,
        max_cycles: args.cycles,
        seed: args.seed,
    };
    let interpreter = Chip8Interpreter::new(
        config,
        TextDisplay::new(BufWriter::new(io::stdout())),
        IdleKeyboard,
        LogBeeper::default(),
    );

    let summary = interpreter
        .run(&args.rom)
        .with_context(|| format!("could not run ROM {}", args.rom.display()))?;

    log::info!("ran {} cycles", summary.cycles);
    Ok(())
}
