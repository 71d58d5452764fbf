use std::{
    io::{self, Write},
    thread,
    time::Duration,
};

use chipvm_core::{Chip8Beeper, Chip8Display, Chip8Keyboard, Framebuffer, Keypad, PIXEL_ON};

/// Renders frames as text, two characters per pixel.
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Chip8Display for TextDisplay<W> {
    fn present(&mut self, frame: &Framebuffer) -> io::Result<()> {
        let mut text = String::with_capacity(frame.pixels().len() * 2 + 64);
        for row in frame.rows() {
            for &pixel in row {
                text.push_str(if pixel == PIXEL_ON { "██" } else { "  " });
            }
            text.push('\n');
        }
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

/// No input device: the keypad stays released and the poll just waits out
/// the rest of the cycle.
pub struct IdleKeyboard;

impl Chip8Keyboard for IdleKeyboard {
    fn update_keystates(
        &mut self,
        _: &mut Keypad,
        max_duration_microseconds: u64,
    ) -> io::Result<()> {
        if max_duration_microseconds > 0 {
            thread::sleep(Duration::from_micros(max_duration_microseconds));
        }
        Ok(())
    }
}

/// Stands in for a tone generator by logging when the tone would start and stop.
#[derive(Default)]
pub struct LogBeeper {
    playing: bool,
}

impl Chip8Beeper for LogBeeper {
    fn play(&mut self) {
        if !self.playing {
            log::info!("beep");
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}
