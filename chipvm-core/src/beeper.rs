/// Frontend seam for the sound cue: `play` while the sound timer is running,
/// `pause` once it reaches zero. Called once per cycle either way.
pub trait Chip8Beeper {
    fn play(&mut self);
    fn pause(&mut self);
}

impl<T: Chip8Beeper + ?Sized> Chip8Beeper for &mut T {
    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }
}
