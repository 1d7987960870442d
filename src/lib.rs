//! A CHIP-8 interpreter core.
//!
//! [`Emulator`] owns the machine state and runs it one instruction at a time with
//! [`Emulator::tick`]; the 60 Hz timer and redraw work happens in
//! [`Emulator::step_timers`]. The screen, buzzer, keypad and font are reached
//! through the [`PixelSink`], [`BeepSink`], [`KeySource`] and [`FontLoader`] traits,
//! with minifb and cpal backends in [`window`] and [`sound`].

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod font;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod snapshot;
pub mod sound;
pub mod timer;
pub mod window;

pub use display::{FrameBuffer, PixelSink, Pixels};
pub use emulator::{Emulator, Synced};
pub use error::{BackendError, Chip8Error};
pub use font::{FontLoader, StaticFont};
pub use keyboard::{KeySet, KeySource};
pub use snapshot::DebugSnapshot;
pub use sound::BeepSink;
pub use timer::Clock;
