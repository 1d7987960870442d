use thiserror::Error;

use crate::memory::TypeAddr;

/// Everything that can stop the interpreter.
///
/// `UnknownOpcode`, `StackUnderflow` and `StackOverflow` are raised by [`tick`] and are
/// fatal: the program is corrupt or uses an instruction this dialect doesn't have, so
/// there is no sensible state to continue from. The load errors are raised at
/// construction, before a single instruction runs.
///
/// [`tick`]: crate::emulator::Emulator::tick
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X} at pc {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: TypeAddr },

    #[error("return with empty call stack (opcode {opcode:#06X} at pc {pc:#05X})")]
    StackUnderflow { opcode: u16, pc: TypeAddr },

    #[error("call stack full (opcode {opcode:#06X} at pc {pc:#05X})")]
    StackOverflow { opcode: u16, pc: TypeAddr },

    #[error("rom is too large ({size} bytes), at most {max} bytes fit")]
    RomTooLarge { size: usize, max: usize },

    #[error("font is too large ({size} bytes), at most {max} bytes fit")]
    FontTooLarge { size: usize, max: usize },

    #[error("failed to read rom: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures opening the desktop window or audio device.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio error: {0}")]
    Audio(String),
}

impl Chip8Error {
    /// Whether this error came from executing an instruction, as opposed to loading.
    pub fn is_fatal_execution(&self) -> bool {
        matches!(
            self,
            Self::UnknownOpcode { .. } | Self::StackUnderflow { .. } | Self::StackOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_name_opcode_and_pc() {
        let err = Chip8Error::UnknownOpcode {
            opcode: 0x8AB8,
            pc: 0x204,
        };
        assert_eq!(err.to_string(), "unknown opcode 0x8AB8 at pc 0x204");
        assert!(err.is_fatal_execution());

        let err = Chip8Error::RomTooLarge {
            size: 5000,
            max: 3584,
        };
        assert!(!err.is_fatal_execution());
    }
}
