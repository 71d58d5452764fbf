use std::{
    fs,
    path::Path,
    time::{Duration, Instant},
};

use crate::{Chip8, Chip8Beeper, Chip8Display, Chip8Keyboard, Result};

struct Timer {
    interval: Duration,
    last_tick: Instant,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }

    fn tick(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.interval {
            self.last_tick += self.interval;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Cycles per second.
    pub clock_speed: u32,
    /// Stop after this many cycles; run forever when `None`.
    pub max_cycles: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            clock_speed: 500,
            max_cycles: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
}

/// Fixed-rate host loop around [`Chip8`]. The engine itself is timeless;
/// pacing comes from the keyboard poll, which may block until the next cycle
/// is due. Frames are presented at most 60 times per second.
pub struct Chip8Interpreter<D: Chip8Display, K: Chip8Keyboard, B: Chip8Beeper> {
    pub config: InterpreterConfig,
    pub display: D,
    pub keyboard: K,
    pub beeper: B,
}

impl<D: Chip8Display, K: Chip8Keyboard, B: Chip8Beeper> Chip8Interpreter<D, K, B> {
    pub fn new(config: InterpreterConfig, display: D, keyboard: K, beeper: B) -> Self {
        Self {
            config,
            display,
            keyboard,
            beeper,
        }
    }

    pub fn run<P: AsRef<Path>>(self, path: P) -> Result<RunSummary> {
        let program = fs::read(path)?;
        self.run_program(&program)
    }

    pub fn run_program(mut self, program: &[u8]) -> Result<RunSummary> {
        let mut chip8 = match self.config.seed {
            Some(seed) => Chip8::with_seed(seed),
            None => Chip8::new(),
        };
        chip8.load(program)?;

        let cpu_frame_time_micros = (1_000_000. / self.config.clock_speed.max(1) as f64) as u64;
        let mut next_cpu_frame = Instant::now() + Duration::from_micros(cpu_frame_time_micros);
        let mut frame_timer = Timer::new(Duration::from_secs_f32(1. / 60.));
        let mut sounding = false;
        let mut cycles = 0u64;

        log::debug!(
            "running at {} Hz, cycle limit {:?}",
            self.config.clock_speed,
            self.config.max_cycles
        );

        while self.config.max_cycles.map_or(true, |max| cycles < max) {
            chip8.step()?;
            cycles += 1;

            if chip8.is_sound_active() {
                self.beeper.play();
            } else {
                self.beeper.pause();
            }
            if chip8.is_sound_active() != sounding {
                sounding = !sounding;
                log::debug!("sound {}", if sounding { "on" } else { "off" });
            }

            if frame_timer.tick() && chip8.framebuffer().is_changed() {
                self.display.present(chip8.framebuffer())?;
                chip8.framebuffer_mut().acknowledge();
            }

            let time_left = next_cpu_frame.saturating_duration_since(Instant::now());
            next_cpu_frame += Duration::from_micros(cpu_frame_time_micros);

            self.keyboard
                .update_keystates(chip8.keypad_mut(), time_left.as_micros() as u64)?;
        }

        if chip8.framebuffer_mut().take_changed() {
            self.display.present(chip8.framebuffer())?;
        }
        self.beeper.pause();

        log::debug!("stopped after {} cycles", cycles);
        Ok(RunSummary { cycles })
    }
}
