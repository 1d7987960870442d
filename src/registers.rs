use crate::memory::{TypeAddr, ADDR_MASK, PROGRAM_START};

// flag register
pub const VF: u8 = 0xF;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    // wraps, no flag
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(VF, flag as u8);
    }

    pub fn as_array(&self) -> [u8; 16] {
        self.registers
    }

    pub fn clear(&mut self) {
        self.registers = [0; 16];
    }
}

// Special registers

// always 12 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl Default for ProgramCounter {
    fn default() -> Self {
        Self(PROGRAM_START)
    }
}

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2) & ADDR_MASK;
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2) & ADDR_MASK;
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr & ADDR_MASK;
    }
}

// full 16 bits so FX1E can see overflow past 0xFFF; accesses through it are masked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(pub u16);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: u16) {
        self.0 = addr;
    }

    // true when the sum leaves the 12-bit address space
    pub fn add(&mut self, value: u8) -> bool {
        self.0 = self.0.wrapping_add(value as u16);
        self.0 > ADDR_MASK
    }

    pub fn offset(&self, offset: u16) -> TypeAddr {
        self.0.wrapping_add(offset) & ADDR_MASK
    }
}
