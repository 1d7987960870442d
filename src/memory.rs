use log::debug;

use crate::error::Chip8Error;
use crate::font::FontLoader;
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_START: TypeAddr = 0x050;
pub const STACK_DEPTH: usize = 16;

pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    // program image from 200 -> FFF
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
        }
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    // rewinds onto the instruction just fetched
    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    pub fn fetch(&self) -> u16 {
        // big endian
        let (l, r) = (self.get(self.pc.0), self.get(self.pc.0.wrapping_add(1)));
        ((l as u16) << 8) | r as u16
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: u16) {
        self.index.set_addr(addr);
    }

    /// Copies a program image to 0x200 onwards.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Chip8Error> {
        let start_index = PROGRAM_START as usize;
        let max = MEMORY_SIZE - start_index;
        if bytes.len() > max {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max,
            });
        }
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        debug!("loaded {} byte rom at {:#05X}", bytes.len(), PROGRAM_START);
        Ok(())
    }

    /// Seeds the glyph sprites at 0x050; they must end before the program region.
    pub fn load_font(&mut self, loader: &dyn FontLoader) -> Result<(), Chip8Error> {
        let font = loader.font();
        let start_index = FONT_START as usize;
        let max = PROGRAM_START as usize - start_index;
        if font.len() > max {
            return Err(Chip8Error::FontTooLarge {
                size: font.len(),
                max,
            });
        }
        self.bytes[start_index..start_index + font.len()].copy_from_slice(font);
        debug!("loaded {} byte font at {:#05X}", font.len(), FONT_START);
        Ok(())
    }

    // power-on PC, I and stack; memory is left as is
    pub fn reset_pointers(&mut self) {
        self.pc = ProgramCounter::default();
        self.index = IndexRegister::default();
        self.stack.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFull;

#[derive(Debug, Clone, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), StackFull> {
        if self.addresses.len() == STACK_DEPTH {
            return Err(StackFull);
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    // oldest first
    pub fn as_slice(&self) -> &[TypeAddr] {
        &self.addresses
    }
}
