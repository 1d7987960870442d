use std::time::Instant;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    decode::{OpCodes, RawInstruction},
    display::{FrameBuffer, PixelSink},
    error::Chip8Error,
    font::{FontLoader, GLYPH_SIZE},
    keyboard::KeySource,
    memory::{Memory, TypeAddr, ADDR_MASK, FONT_START},
    registers::{Registers, VF},
    snapshot::DebugSnapshot,
    sound::BeepSink,
    timer::{Clock, Timer},
};

/// What one [`Emulator::sync`] call ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synced {
    pub instructions: u32,
    pub timer_steps: u32,
}

/// The whole machine: memory, registers, timers and screen, plus the three devices it
/// talks to while running.
///
/// Nothing here is shared. `tick` and `step_timers` both take `&mut self`, so whoever
/// drives the machine decides which of the two runs in a given slot (see [`sync`]),
/// and a `debug_snapshot` always sees the state between two of those calls.
///
/// [`sync`]: Emulator::sync
pub struct Emulator<P, B, K> {
    fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    rng: StdRng,
    pixels: P,
    sound: B,
    keys: K,
}

impl<P, B, K> Emulator<P, B, K>
where
    P: PixelSink,
    B: BeepSink,
    K: KeySource,
{
    /// Builds a machine with `font` seeded at 0x050 and `rom` at 0x200.
    pub fn new(
        font: &dyn FontLoader,
        rom: &[u8],
        pixels: P,
        sound: B,
        keys: K,
    ) -> Result<Self, Chip8Error> {
        let mut mem = Memory::new();
        mem.load_font(font)?;
        mem.load_rom(rom)?;

        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem,
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            rng: StdRng::from_entropy(),
            pixels,
            sound,
            keys,
        })
    }

    /// Makes CXNN reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Runs exactly one instruction.
    ///
    /// PC is moved past the instruction before it executes, so jumps overwrite the
    /// advanced value and skips add another 2 on top of it. An opcode nothing is
    /// registered for leaves PC on the offending instruction.
    pub fn tick(&mut self) -> Result<(), Chip8Error> {
        let pc = self.mem.pc.0;
        let raw = RawInstruction::new(self.mem.fetch());
        let ins = OpCodes::decode(raw).ok_or(Chip8Error::UnknownOpcode {
            opcode: raw.code(),
            pc,
        })?;
        trace!("{pc:03X}: {raw} {ins:?}");

        self.mem.increment_pc();
        self.execute_ins(ins, raw, pc)
    }

    fn execute_ins(
        &mut self,
        ins: OpCodes,
        raw: RawInstruction,
        pc: TypeAddr,
    ) -> Result<(), Chip8Error> {
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop().ok_or(Chip8Error::StackUnderflow {
                    opcode: raw.code(),
                    pc,
                })?;
                self.mem.set_pc(addr);
            }
            OpCodes::Jump(addr) => {
                self.mem.set_pc(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // PC already points at the instruction after the call
                self.mem
                    .stack
                    .push(self.mem.pc.0)
                    .map_err(|_| Chip8Error::StackOverflow {
                        opcode: raw.code(),
                        pc,
                    })?;
                self.mem.set_pc(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // The flag ops write VF first and then re-read their operands, so an
            // operand living in VF sees the fresh flag.
            OpCodes::Add(vx, vy) => {
                let (_, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_flag(carry);
                let z = self.regs.get(vx).wrapping_add(self.regs.get(vy));
                self.regs.set_register(vx, z);
            }
            OpCodes::SubtractForward(vx, vy) => {
                self.regs.set_flag(self.regs.get(vx) >= self.regs.get(vy)); // 1 = no borrow
                let z = self.regs.get(vx).wrapping_sub(self.regs.get(vy));
                self.regs.set_register(vx, z);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                self.regs.set_flag(self.regs.get(vy) >= self.regs.get(vx));
                let z = self.regs.get(vy).wrapping_sub(self.regs.get(vx));
                self.regs.set_register(vx, z);
            }
            OpCodes::RightShift(vx, _) => {
                self.regs.set_register(VF, self.regs.get(vx) & 1);
                self.regs.set_register(vx, self.regs.get(vx) >> 1);
            }
            OpCodes::LeftShift(vx, _) => {
                self.regs.set_register(VF, (self.regs.get(vx) >> 7) & 1);
                self.regs.set_register(vx, self.regs.get(vx) << 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.mem.set_pc(addr + self.regs.get(0) as u16);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                self.regs.set_flag(false);
                let sprite: Vec<u8> = (0..height as u16)
                    .map(|row| self.mem.get(self.mem.index.offset(row)))
                    .collect();

                let collision = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(collision);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keys.pressed_keys().contains(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keys.pressed_keys().contains(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.get()),
            OpCodes::GetKey(vx) => match self.keys.pressed_keys().first() {
                Some(key) => self.regs.set_register(vx, key),
                // nothing yet, run this instruction again next tick
                None => self.mem.decrement_pc(),
            },
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                let overflow =
                    self.mem.index.0 as u32 + self.regs.get(vx) as u32 > ADDR_MASK as u32;
                self.regs.set_flag(overflow);
                self.mem.index.add(self.regs.get(vx));
            }
            OpCodes::PointChar(vx) => {
                let char = self.regs.get(vx) as u16;
                self.mem.set_index(FONT_START + char * GLYPH_SIZE as u16);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (i, digit) in digits.iter().enumerate() {
                    self.mem.set(self.mem.index.offset(i as u16), *digit);
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                for reg in 0..=vx {
                    let reg_val = self.regs.get(reg);
                    self.mem.set(self.mem.index.offset(reg as u16), reg_val);
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                for reg in 0..=vx {
                    let reg_val = self.mem.get(self.mem.index.offset(reg as u16));
                    self.regs.set_register(reg, reg_val);
                }
            }
        }
        Ok(())
    }

    /// The 60 Hz step: count both timers down, show the screen if it changed, and
    /// keep the buzzer going while the sound timer is still running.
    pub fn step_timers(&mut self) {
        self.delay_timer.step();
        self.sound_timer.step();

        self.fb.flush(&mut self.pixels);

        if self.sound_timer.is_active() {
            self.sound.beep();
        }
    }

    /// Runs whatever `clock` says is due at `now`: instructions first, then timer
    /// steps.
    pub fn sync(&mut self, clock: &mut Clock, now: Instant) -> Result<Synced, Chip8Error> {
        let instructions = clock.cpu.due(now);
        for _ in 0..instructions {
            self.tick()?;
        }
        let timer_steps = clock.timers.due(now);
        for _ in 0..timer_steps {
            self.step_timers();
        }
        Ok(Synced {
            instructions,
            timer_steps,
        })
    }

    /// Power-on registers, PC, I, stack and timers, and a blank screen. Memory,
    /// including the loaded program and font, is kept.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.mem.reset_pointers();
        self.delay_timer.set(0);
        self.sound_timer.set(0);
        self.fb.clear_buffer();
        debug!("cpu reset");
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            pc: self.mem.pc.0,
            sound_timer: self.sound_timer.get(),
            delay_timer: self.delay_timer.get(),
            stack: self.mem.stack.as_slice().to_vec(),
            registers: self.regs.as_array(),
            index: self.mem.index.0,
        }
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn pixel_sink(&self) -> &P {
        &self.pixels
    }

    pub fn beep_sink(&self) -> &B {
        &self.sound
    }

    pub fn key_source(&self) -> &K {
        &self.keys
    }

    pub fn key_source_mut(&mut self) -> &mut K {
        &mut self.keys
    }
}
