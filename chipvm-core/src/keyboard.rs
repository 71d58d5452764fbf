use std::io;

pub const KEY_COUNT: usize = 16;

/// Frontend seam: refreshes the keypad between cycles. Implementations may
/// block for up to `max_duration_microseconds` waiting for input, which is
/// also how the interpreter paces itself.
pub trait Chip8Keyboard {
    fn update_keystates(
        &mut self,
        keypad: &mut Keypad,
        max_duration_microseconds: u64,
    ) -> io::Result<()>;
}

impl<T: Chip8Keyboard + ?Sized> Chip8Keyboard for &mut T {
    fn update_keystates(
        &mut self,
        keypad: &mut Keypad,
        max_duration_microseconds: u64,
    ) -> io::Result<()> {
        (**self).update_keystates(keypad, max_duration_microseconds)
    }
}

/// The sixteen hex keys, 0x0 to 0xF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set(&mut self, key: u8, down: bool) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = down;
        }
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Keys outside 0x0..=0xF are never down.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Lowest-numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keypad = Keypad::default();
        keypad.press(0xA);
        assert!(keypad.is_key_down(0xA));
        assert!(!keypad.is_key_down(0xB));

        keypad.release(0xA);
        assert!(!keypad.is_key_down(0xA));
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut keypad = Keypad::default();
        keypad.press(0x10);
        assert_eq!(keypad, Keypad::default());
        assert!(!keypad.is_key_down(0xFF));
    }

    #[test]
    fn first_pressed_prefers_lowest_index() {
        let mut keypad = Keypad::default();
        assert_eq!(keypad.first_pressed(), None);

        keypad.press(0xC);
        keypad.press(0x3);
        assert_eq!(keypad.first_pressed(), Some(0x3));

        keypad.clear();
        assert_eq!(keypad.first_pressed(), None);
    }
}
