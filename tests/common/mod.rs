#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chipvm::{BeepSink, Emulator, KeySet, KeySource, PixelSink, Pixels, StaticFont};

/// Every frame flushed to the screen.
#[derive(Clone, Default)]
pub struct Frames(pub Rc<RefCell<Vec<Pixels>>>);

impl PixelSink for Frames {
    fn draw(&mut self, pixels: &Pixels) {
        self.0.borrow_mut().push(*pixels);
    }
}

/// Number of beep requests.
#[derive(Clone, Default)]
pub struct Beeps(pub Rc<RefCell<usize>>);

impl BeepSink for Beeps {
    fn beep(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

#[derive(Clone, Default)]
pub struct Keypad(pub Rc<RefCell<KeySet>>);

impl KeySource for Keypad {
    fn pressed_keys(&mut self) -> KeySet {
        *self.0.borrow()
    }
}

pub type Machine = Emulator<Frames, Beeps, Keypad>;

pub struct Rig {
    pub emu: Machine,
    pub frames: Frames,
    pub beeps: Beeps,
    pub keypad: Keypad,
}

impl Rig {
    pub fn new(rom: &[u8]) -> Self {
        let frames = Frames::default();
        let beeps = Beeps::default();
        let keypad = Keypad::default();
        let emu = Emulator::new(
            &StaticFont::default(),
            rom,
            frames.clone(),
            beeps.clone(),
            keypad.clone(),
        )
        .expect("rom fits")
        .with_seed(0x8);
        Self {
            emu,
            frames,
            beeps,
            keypad,
        }
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.emu.tick().expect("valid instruction");
        }
    }

    pub fn beep_count(&self) -> usize {
        *self.beeps.0.borrow()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.0.borrow().len()
    }
}
