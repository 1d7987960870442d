use std::cell::{Cell, RefCell};
use std::rc::Rc;

use minifb::{Key, KeyRepeat, Scale, WindowOptions};

use crate::display::{PixelSink, Pixels, HEIGHT, WIDTH};
use crate::error::BackendError;
use crate::keyboard::{key_to_num, KeySet, KeySource};

const ON: u32 = from_u8_rgb(0, 127, 255);
const OFF: u32 = from_u8_rgb(0, 0, 0);

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// A minifb window showing the machine's screen and reading its keypad.
///
/// The emulator owns the [`ScreenSink`] and [`ScreenKeys`] halves; the run loop keeps
/// the window itself and calls [`Screen::update`] once per pass.
pub struct Screen {
    window: minifb::Window,
    pixel_buffer: Rc<RefCell<Vec<u32>>>,
    keys: Rc<Cell<KeySet>>,
    reset: ResetLatch,
}

// one reset per Backspace press, however often the loop asks
#[derive(Debug, Default)]
struct ResetLatch {
    pending: bool,
}

impl ResetLatch {
    fn arm(&mut self, pressed: bool) {
        self.pending |= pressed;
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Converts flushed frames into window pixels.
pub struct ScreenSink {
    pixel_buffer: Rc<RefCell<Vec<u32>>>,
}

/// The keys held down as of the last [`Screen::update`].
pub struct ScreenKeys {
    keys: Rc<Cell<KeySet>>,
}

impl Screen {
    pub fn new(title: &str, scale: Scale) -> Result<(Self, ScreenSink, ScreenKeys), BackendError> {
        let mut window = minifb::Window::new(
            title,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // the run loop does its own pacing
        window.limit_update_rate(None);

        let pixel_buffer = Rc::new(RefCell::new(vec![OFF; WIDTH * HEIGHT]));
        let keys = Rc::new(Cell::new(KeySet::new()));
        let screen = Self {
            window,
            pixel_buffer: pixel_buffer.clone(),
            keys: keys.clone(),
            reset: ResetLatch::default(),
        };
        Ok((screen, ScreenSink { pixel_buffer }, ScreenKeys { keys }))
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::Yes)
    }

    /// True once after the reset key (Backspace) goes down.
    pub fn take_reset(&mut self) -> bool {
        self.reset.take()
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Presents the latest pixels, pumps window events and refreshes the held keys.
    pub fn update(&mut self) -> Result<(), BackendError> {
        self.window
            .update_with_buffer(&self.pixel_buffer.borrow(), WIDTH, HEIGHT)?;
        let held: KeySet = self
            .window
            .get_keys()
            .into_iter()
            .filter_map(key_to_num)
            .collect();
        self.keys.set(held);
        self.reset
            .arm(self.window.is_key_pressed(Key::Backspace, KeyRepeat::No));
        Ok(())
    }
}

impl ScreenSink {
    /// Window-ready pixels for a frame.
    pub fn render(pixels: &Pixels, out: &mut [u32]) {
        for (row, line) in pixels.iter().zip(out.chunks_mut(WIDTH)) {
            for (bit, px) in row.iter().zip(line.iter_mut()) {
                *px = if *bit { ON } else { OFF };
            }
        }
    }
}

impl PixelSink for ScreenSink {
    fn draw(&mut self, pixels: &Pixels) {
        Self::render(pixels, &mut self.pixel_buffer.borrow_mut());
    }
}

impl KeySource for ScreenKeys {
    fn pressed_keys(&mut self) -> KeySet {
        self.keys.get()
    }
}

/// Nearest window scale minifb supports.
pub fn scale_from_factor(factor: u32) -> Scale {
    match factor {
        0 | 1 => Scale::X1,
        2 => Scale::X2,
        3 | 4 => Scale::X4,
        5..=8 => Scale::X8,
        9..=16 => Scale::X16,
        _ => Scale::X32,
    }
}
