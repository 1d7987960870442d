use std::fmt;

use crate::memory::TypeAddr;

/// A copy of the CPU-visible state, taken without touching the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSnapshot {
    pub pc: TypeAddr,
    pub sound_timer: u8,
    pub delay_timer: u8,
    /// Return addresses, oldest first.
    pub stack: Vec<TypeAddr>,
    pub registers: [u8; 16],
    pub index: u16,
}

impl DebugSnapshot {
    /// One `Vn: XX` line per register, for a text overlay.
    pub fn register_overlay(&self) -> String {
        self.registers
            .iter()
            .enumerate()
            .map(|(i, v)| format!("V{i:X}: {v:02X}\n"))
            .collect()
    }
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC {:03X}  I {:03X}  DT {:02X}  ST {:02X}  SP {}",
            self.pc,
            self.index,
            self.delay_timer,
            self.sound_timer,
            self.stack.len()
        )
    }
}
