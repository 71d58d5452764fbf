use std::io;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
pub const PIXEL_OFF: u32 = 0x0000_0000;

/// Frontend seam: receives the framebuffer whenever it changed.
pub trait Chip8Display {
    fn present(&mut self, frame: &Framebuffer) -> io::Result<()>;
}

impl<T: Chip8Display + ?Sized> Chip8Display for &mut T {
    fn present(&mut self, frame: &Framebuffer) -> io::Result<()> {
        (**self).present(frame)
    }
}

/// 64x32 monochrome screen. Cells are stored as `u32` so the buffer can be
/// handed straight to a renderer; every cell is either `PIXEL_ON` or
/// `PIXEL_OFF`.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: [u32; SCREEN_WIDTH * SCREEN_HEIGHT],
    changed: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [PIXEL_OFF; SCREEN_WIDTH * SCREEN_HEIGHT],
            changed: false,
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.pixels = [PIXEL_OFF; SCREEN_WIDTH * SCREEN_HEIGHT];
        self.changed = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.pixels[y * SCREEN_WIDTH + x] == PIXEL_ON
    }

    /// Toggles one cell. Returns whether it was on before, or `None` when
    /// the cell lies off screen.
    pub fn xor_pixel(&mut self, x: usize, y: usize) -> Option<bool> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        let pixel = &mut self.pixels[y * SCREEN_WIDTH + x];
        let was_on = *pixel == PIXEL_ON;
        *pixel ^= PIXEL_ON;
        self.changed = true;
        Some(was_on)
    }

    /// XOR-draws `sprite` (one byte per row, MSB leftmost) with its top-left
    /// corner at `(x mod 64, y mod 32)`. Bits falling past the right or bottom
    /// edge are clipped. Returns true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let origin_x = x as usize % SCREEN_WIDTH;
        let origin_y = y as usize % SCREEN_HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                if let Some(true) = self.xor_pixel(origin_x + bit, origin_y + row) {
                    collision = true;
                }
            }
        }

        self.changed = true;
        collision
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.pixels.chunks_exact(SCREEN_WIDTH)
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Called by the consumer once it has rendered the current frame.
    pub fn acknowledge(&mut self) {
        self.changed = false;
    }

    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(frame: &Framebuffer) -> usize {
        frame.pixels().iter().filter(|&&p| p == PIXEL_ON).count()
    }

    #[test]
    fn starts_dark_and_unchanged() {
        let frame = Framebuffer::default();
        assert_eq!(lit(&frame), 0);
        assert!(!frame.is_changed());
    }

    #[test]
    fn draw_places_bits_msb_first() {
        let mut frame = Framebuffer::default();

        let collision = frame.draw_sprite(3, 4, &[0b1000_0001, 0b0100_0000]);

        assert!(!collision);
        assert!(frame.pixel(3, 4));
        assert!(frame.pixel(10, 4));
        assert!(frame.pixel(4, 5));
        assert_eq!(lit(&frame), 3);
        assert!(frame.is_changed());
    }

    #[test]
    fn drawing_twice_restores_and_collides() {
        let mut frame = Framebuffer::default();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];

        assert!(!frame.draw_sprite(10, 10, &sprite));
        assert_eq!(lit(&frame), 14);
        assert!(frame.draw_sprite(10, 10, &sprite));
        assert_eq!(lit(&frame), 0);
    }

    #[test]
    fn origin_wraps_but_body_clips() {
        let mut frame = Framebuffer::default();

        frame.draw_sprite(64 + 60, 32 + 31, &[0xFF, 0xFF]);

        for x in 60..64 {
            assert!(frame.pixel(x, 31), "pxl at x:{} should be on", x);
        }
        assert_eq!(lit(&frame), 4);
        assert!(!frame.pixel(0, 31));
        assert!(!frame.pixel(60, 0));
    }

    #[test]
    fn cells_are_fully_on_or_off() {
        let mut frame = Framebuffer::default();
        frame.draw_sprite(0, 0, &[0xAA, 0x55]);
        frame.draw_sprite(1, 0, &[0xFF]);

        assert!(frame
            .pixels()
            .iter()
            .all(|&p| p == PIXEL_ON || p == PIXEL_OFF));
    }

    #[test]
    fn clear_marks_changed() {
        let mut frame = Framebuffer::default();
        frame.draw_sprite(0, 0, &[0xFF]);
        frame.acknowledge();

        frame.clear();

        assert_eq!(lit(&frame), 0);
        assert!(frame.take_changed());
        assert!(!frame.is_changed());
    }

    #[test]
    fn rows_split_the_screen() {
        let mut frame = Framebuffer::default();
        frame.draw_sprite(0, 2, &[0x80]);

        let rows: Vec<_> = frame.rows().collect();

        assert_eq!(rows.len(), SCREEN_HEIGHT);
        assert_eq!(rows[2][0], PIXEL_ON);
        assert_eq!(rows[1][0], PIXEL_OFF);
    }

    #[test]
    fn off_screen_xor_is_ignored() {
        let mut frame = Framebuffer::default();
        assert_eq!(frame.xor_pixel(64, 0), None);
        assert_eq!(frame.xor_pixel(0, 32), None);
        assert!(!frame.is_changed());
    }
}
