mod common;

use chipvm::display::{HEIGHT, WIDTH};
use chipvm::{Chip8Error, StaticFont};
use common::{Beeps, Frames, Keypad, Machine, Rig};

#[test]
fn add_program_runs_to_completion() {
    // V0 = 0x0A, V1 = 0x05, V0 += V1
    let mut rig = Rig::new(&[0x60, 0x0A, 0x61, 0x05, 0x80, 0x14]);
    rig.ticks(3);

    let snap = rig.emu.debug_snapshot();
    assert_eq!(snap.registers[0x0], 0x0F);
    assert_eq!(snap.registers[0xF], 0);
    assert_eq!(snap.pc, 0x206);
}

#[test]
fn jump_lands_exactly_on_target() {
    let mut rig = Rig::new(&[0x1A, 0xBC]);
    rig.ticks(1);
    assert_eq!(rig.emu.debug_snapshot().pc, 0xABC);
}

#[test]
fn call_then_return_resumes_after_call() {
    // 200: call 206
    // 202: V0 = 1
    // 204: jump 204
    // 206: V1 = 2
    // 208: return
    let mut rig = Rig::new(&[0x22, 0x06, 0x60, 0x01, 0x12, 0x04, 0x61, 0x02, 0x00, 0xEE]);
    rig.ticks(1);
    let snap = rig.emu.debug_snapshot();
    assert_eq!(snap.pc, 0x206);
    assert_eq!(snap.stack, vec![0x202]);

    rig.ticks(2);
    let snap = rig.emu.debug_snapshot();
    assert_eq!(snap.pc, 0x202);
    assert!(snap.stack.is_empty());
    assert_eq!(snap.registers[1], 2);

    rig.ticks(1);
    assert_eq!(rig.emu.debug_snapshot().registers[0], 1);
}

#[test]
fn load_registers_reads_ascending_and_stops_at_x() {
    // I = 0x300, load V0..V3
    let mut rig = Rig::new(&[0xA3, 0x00, 0xF3, 0x65]);
    for (i, b) in [0x11, 0x22, 0x33, 0x44, 0x55].iter().enumerate() {
        rig.emu.mem.set(0x300 + i as u16, *b);
    }
    rig.emu.regs.set_register(0xF, 0x99);
    rig.ticks(2);

    let regs = rig.emu.debug_snapshot().registers;
    assert_eq!(&regs[..4], &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(regs[4], 0);
    assert_eq!(regs[0xF], 0x99);
}

#[test]
fn clear_screen_blanks_and_flushes_once() {
    // I = font "0", draw it, clear
    let mut rig = Rig::new(&[0xA0, 0x50, 0xD0, 0x05, 0x00, 0xE0]);
    rig.ticks(2);
    rig.emu.step_timers();
    assert_eq!(rig.frame_count(), 1);

    rig.ticks(1);
    assert!(rig.emu.display().is_dirty());
    assert!(rig.emu.display().pixels().iter().flatten().all(|p| !p));

    rig.emu.step_timers();
    rig.emu.step_timers();
    assert_eq!(rig.frame_count(), 2);
    let frames = rig.frames.0.borrow();
    assert!(frames[1].iter().flatten().all(|p| !p));
}

#[test]
fn drawing_twice_restores_screen_and_reports_collision() {
    // V0 = 62, V1 = 30 so the glyph wraps both edges; I = font "8"
    let mut rig = Rig::new(&[0x60, 62, 0x61, 30, 0xA0, 0x78, 0xD0, 0x15, 0xD0, 0x15]);
    rig.ticks(4);
    assert_eq!(rig.emu.regs.get(0xF), 0);
    let lit = rig.emu.display().pixels().iter().flatten().filter(|p| **p).count();
    // "8" is F0 90 F0 90 F0
    assert_eq!(lit, 4 + 2 + 4 + 2 + 4);
    assert!(rig.emu.display().get(62, 30));
    assert!(rig.emu.display().get(1, 31));
    assert!(!rig.emu.display().get(63, 31));
    assert!(rig.emu.display().get(0, 0));

    rig.ticks(1);
    assert_eq!(rig.emu.regs.get(0xF), 1);
    assert!(rig.emu.display().pixels().iter().flatten().all(|p| !p));
}

#[test]
fn draw_on_blank_area_clears_stale_flag() {
    let mut rig = Rig::new(&[0xA0, 0x50, 0xD0, 0x05]);
    rig.emu.regs.set_register(0xF, 1);
    rig.ticks(2);
    assert_eq!(rig.emu.regs.get(0xF), 0);
}

#[test]
fn sound_timer_beeps_while_positive() {
    // V0 = 2, ST = V0
    let mut rig = Rig::new(&[0x60, 0x02, 0xF0, 0x18]);
    rig.ticks(2);
    assert_eq!(rig.emu.debug_snapshot().sound_timer, 2);

    rig.emu.step_timers();
    assert_eq!(rig.emu.debug_snapshot().sound_timer, 1);
    assert_eq!(rig.beep_count(), 1);

    rig.emu.step_timers();
    assert_eq!(rig.emu.debug_snapshot().sound_timer, 0);
    assert_eq!(rig.beep_count(), 1);

    rig.emu.step_timers();
    assert_eq!(rig.emu.debug_snapshot().sound_timer, 0);
    assert_eq!(rig.beep_count(), 1);
}

#[test]
fn delay_timer_counts_down_at_timer_rate_only() {
    // V0 = 3, DT = V0, then spin reading DT into V1
    let mut rig = Rig::new(&[0x60, 0x03, 0xF0, 0x15, 0xF1, 0x07, 0x12, 0x04]);
    rig.ticks(2);
    rig.ticks(100);
    assert_eq!(rig.emu.regs.get(1), 3);

    for expected in [2, 1, 0, 0] {
        rig.emu.step_timers();
        rig.ticks(2);
        assert_eq!(rig.emu.regs.get(1), expected);
    }
}

#[test]
fn key_wait_takes_lowest_pressed_key() {
    let mut rig = Rig::new(&[0xF2, 0x0A, 0x12, 0x02]);
    rig.ticks(5);
    assert_eq!(rig.emu.debug_snapshot().pc, 0x200);

    *rig.keypad.0.borrow_mut() = [0xE, 0x9, 0xB].into_iter().collect();
    rig.ticks(1);
    assert_eq!(rig.emu.regs.get(2), 0x9);
    assert_eq!(rig.emu.debug_snapshot().pc, 0x202);
}

#[test]
fn snapshot_does_not_disturb_state() {
    let mut rig = Rig::new(&[0x60, 0x01, 0x22, 0x06, 0x00, 0x00, 0xA1, 0x23]);
    rig.ticks(3);
    let first = rig.emu.debug_snapshot();
    let second = rig.emu.debug_snapshot();
    assert_eq!(first, second);
    assert_eq!(first.index, 0x123);
    assert_eq!(first.stack, vec![0x204]);
    assert_eq!(first.registers[0], 1);
}

#[test]
fn unknown_opcode_reports_value_and_pc() {
    let mut rig = Rig::new(&[0x60, 0x01, 0x01, 0x23]);
    rig.ticks(1);
    let err = rig.emu.tick().unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::UnknownOpcode {
            opcode: 0x0123,
            pc: 0x202
        }
    ));
    assert_eq!(err.to_string(), "unknown opcode 0x0123 at pc 0x202");
}

#[test]
fn oversized_rom_is_rejected_at_load() {
    let rom = vec![0u8; 0xE01];
    let result = Machine::new(
        &StaticFont::default(),
        &rom,
        Frames::default(),
        Beeps::default(),
        Keypad::default(),
    );
    assert!(matches!(result, Err(Chip8Error::RomTooLarge { .. })));
}

#[test]
fn screen_dimensions() {
    let rig = Rig::new(&[]);
    assert_eq!(rig.emu.display().pixels().len(), HEIGHT);
    assert_eq!(rig.emu.display().pixels()[0].len(), WIDTH);
}
