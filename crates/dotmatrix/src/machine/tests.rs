use std::cell::RefCell;
use std::rc::Rc;

use dotmatrix_common::{
    Button, Display, FrameBuffer, Joypad, NullInput, NullRenderer, NullSpriteDecoder,
    NullTileDecoder, ScanlineRenderer, Shade, SpriteDecoder, TileDecoder,
};

use super::*;
use crate::cpu::AddressSpace;
use crate::{CoreError, MachineConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Collaborator that records every notification it receives.
#[derive(Clone, Default)]
struct Recorder {
    tiles: Rc<RefCell<Vec<u16>>>,
    sprites: Rc<RefCell<Vec<(u16, u8)>>>,
    lines: Rc<RefCell<Vec<u8>>>,
}

impl TileDecoder for Recorder {
    fn update_tile(&mut self, address: u16) {
        self.tiles.borrow_mut().push(address);
    }
}

impl SpriteDecoder for Recorder {
    fn update_sprite(&mut self, address: u16, value: u8) {
        self.sprites.borrow_mut().push((address, value));
    }
}

impl ScanlineRenderer for Recorder {
    fn render_scanline(&mut self, line: u8, _registers: &[u8; 12], display: &mut dyn Display) {
        self.lines.borrow_mut().push(line);
        display.set_pixel(line as usize, 0, Shade::Black.packed());
    }
}

fn blank_map() -> MemoryMap {
    MemoryMap::new(
        Box::new(NullInput),
        Box::new(NullTileDecoder),
        Box::new(NullSpriteDecoder),
    )
    .unwrap()
}

fn recording_map(recorder: &Recorder) -> MemoryMap {
    MemoryMap::new(
        Box::new(NullInput),
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
    )
    .unwrap()
}

/// 32 KiB plain ROM with `program` placed at the given offsets.
fn rom_with(program: &[(u16, &[u8])]) -> Vec<u8> {
    let mut rom = vec![0; 0x8000];
    for (address, bytes) in program {
        let start = *address as usize;
        rom[start..start + bytes.len()].copy_from_slice(bytes);
    }
    rom
}

fn machine(rom: Vec<u8>) -> GameBoy {
    GameBoy::with_config(MachineConfig::builder().rom(rom).build()).unwrap()
}

#[test]
fn timer_overflow_reloads_from_tma() {
    let mut mem = blank_map();
    let mut timer = Timer::new();
    mem.set_io(io::TMA, 0xAB);
    mem.set_io(io::TIMA, 0xFF);
    mem.set_io(io::TAC, 0x05);

    timer.step(4, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0xAB);
    assert_eq!(mem.io(io::IF) & 0x04, 0x04);

    timer.step(4, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0xAC);
    assert_eq!(timer.total_cycles(), 8);
}

#[test]
fn timer_eight_cycles_overflow_exactly_once() {
    let mut mem = blank_map();
    let mut timer = Timer::new();
    mem.set_io(io::TMA, 0xAB);
    mem.set_io(io::TIMA, 0xFF);
    mem.set_io(io::TAC, 0x05);

    timer.step(8, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0xAC);
    assert_eq!(mem.io(io::IF), 0x04);
}

#[test]
fn div_ticks_every_sixty_four_cycles() {
    let mut mem = blank_map();
    let mut timer = Timer::new();

    timer.step(63, &mut mem).unwrap();
    assert_eq!(mem.io(io::DIV), 0);
    timer.step(1, &mut mem).unwrap();
    assert_eq!(mem.io(io::DIV), 1);

    for _ in 0..255 {
        timer.step(64, &mut mem).unwrap();
    }
    assert_eq!(mem.io(io::DIV), 0);
}

#[test]
fn tima_respects_enable_bit_and_threshold() {
    let mut mem = blank_map();
    let mut timer = Timer::new();

    mem.set_io(io::TAC, 0x03);
    timer.step(1024, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0);

    let mut timer = Timer::new();
    mem.set_io(io::TAC, 0x04);
    timer.step(255, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0);
    timer.step(1, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 1);

    assert_eq!([0, 1, 2, 3].map(Timer::threshold), [64, 1, 4, 16]);
}

#[test]
fn tima_waits_full_threshold_after_enable() {
    let mut mem = blank_map();
    let mut timer = Timer::new();

    // Disabled period: firings must not count toward the threshold.
    mem.set_io(io::TAC, 0x00);
    timer.step(1024, &mut mem).unwrap();

    mem.set_io(io::TAC, 0x04);
    timer.step(4, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0);
    timer.step(251, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 0);
    timer.step(1, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 1);

    // Re-disabling restarts the count.
    timer.step(128, &mut mem).unwrap();
    mem.set_io(io::TAC, 0x00);
    timer.step(4, &mut mem).unwrap();
    mem.set_io(io::TAC, 0x04);
    timer.step(252, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 1);
    timer.step(4, &mut mem).unwrap();
    assert_eq!(mem.io(io::TIMA), 2);
}

#[test]
fn one_line_walks_all_phases() {
    let mut mem = blank_map();
    let mut ppu = PixelTiming::new(Box::new(NullRenderer), Box::new(FrameBuffer::default()));

    ppu.step(20, &mut mem).unwrap();
    assert_eq!(ppu.phase(), Phase::VramRead);
    assert_eq!(mem.io(io::STAT) & 0x03, 3);

    ppu.step(43, &mut mem).unwrap();
    assert_eq!(ppu.phase(), Phase::HBlank);
    assert_eq!(mem.io(io::STAT) & 0x03, 0);

    ppu.step(51, &mut mem).unwrap();
    assert_eq!(ppu.phase(), Phase::OamRead);
    assert_eq!(ppu.line(), 1);
    assert_eq!(mem.io(io::LY), 1);
    assert_eq!(ppu.elapsed(), 0);
}

#[test]
fn phase_remainders_carry_over() {
    let mut mem = blank_map();
    let mut ppu = PixelTiming::new(Box::new(NullRenderer), Box::new(FrameBuffer::default()));

    // 114 steps of 113 cycles is exactly 113 lines.
    for _ in 0..114 {
        ppu.step(113, &mut mem).unwrap();
    }
    assert_eq!(ppu.line(), 113);
    assert_eq!(ppu.phase(), Phase::OamRead);
    assert_eq!(ppu.elapsed(), 0);
    assert_eq!(mem.io(io::LY), 113);

    ppu.step(25, &mut mem).unwrap();
    assert_eq!(ppu.phase(), Phase::VramRead);
    assert_eq!(ppu.elapsed(), 5);
}

#[test]
fn frame_renders_every_line_then_enters_vblank() {
    init_logger();
    let recorder = Recorder::default();
    let framebuffer = Rc::new(RefCell::new(FrameBuffer::default()));
    let mut mem = blank_map();
    let mut ppu = PixelTiming::new(Box::new(recorder.clone()), Box::new(framebuffer.clone()));

    let mut completed = 0;
    for _ in 0..(144 * 114 / 4) {
        if ppu.step(4, &mut mem).unwrap() {
            completed += 1;
        }
    }
    assert_eq!(completed, 1);
    assert_eq!(ppu.frames(), 1);
    assert_eq!(ppu.phase(), Phase::VBlank);
    assert_eq!(mem.io(io::LY), 144);
    assert_eq!(mem.io(io::STAT) & 0x03, 1);
    assert_eq!(mem.io(io::IF) & 0x01, 0x01);
    assert_eq!(framebuffer.borrow().refreshes(), 1);
    assert_eq!(*recorder.lines.borrow(), (0..=143).collect::<Vec<u8>>());
    assert_eq!(framebuffer.borrow().pixel(143, 0), Some(Shade::Black.packed()));

    for _ in 0..10 {
        ppu.step(114, &mut mem).unwrap();
    }
    assert_eq!(ppu.line(), 0);
    assert_eq!(ppu.phase(), Phase::OamRead);
    assert_eq!(framebuffer.borrow().refreshes(), 1);
}

#[test]
fn lyc_match_raises_stat_interrupt_when_enabled() {
    let mut mem = blank_map();
    let mut ppu = PixelTiming::new(Box::new(NullRenderer), Box::new(FrameBuffer::default()));
    mem.set_io(io::LYC, 1);
    mem.set_io(io::STAT, 0x40);

    ppu.step(113, &mut mem).unwrap();
    assert_eq!(mem.io(io::IF), 0);

    ppu.step(1, &mut mem).unwrap();
    assert_eq!(mem.io(io::STAT), 0x46);
    assert_eq!(mem.io(io::IF), 0x02);

    // Same line: no second request.
    mem.set_io(io::IF, 0);
    ppu.step(10, &mut mem).unwrap();
    assert_eq!(mem.io(io::IF), 0);
}

#[test]
fn unmapped_reads_fail_and_writes_are_dropped() {
    init_logger();
    let mut mem = blank_map();
    assert_eq!(mem.get(0xE000), Err(CoreError::UnmappedAddress(0xE000)));
    assert_eq!(mem.get(0xFEA0), Err(CoreError::UnmappedAddress(0xFEA0)));
    assert_eq!(mem.set(0xFEA0, 0x12), Ok(()));
    assert_eq!(mem.region_at(0xFEA0), None);
}

#[test]
fn rom_is_write_protected_once_initialized() {
    init_logger();
    let mut mem = blank_map();
    mem.set(0x0100, 0x3C).unwrap();
    assert_eq!(mem.get(0x0100), Ok(0x3C));

    mem.mark_rom_initialized();
    mem.set(0x0100, 0x00).unwrap();
    mem.set(0x4000, 0x01).unwrap();
    assert_eq!(mem.get(0x0100), Ok(0x3C));
    assert_eq!(mem.get(0x4000), Ok(0x00));

    // RAM above 0x8000 stays writable.
    mem.set(0xC000, 0x77).unwrap();
    assert_eq!(mem.get(0xC000), Ok(0x77));
}

#[test]
fn oam_dma_copies_through_write_path() {
    let recorder = Recorder::default();
    let mut mem = recording_map(&recorder);
    for offset in 0..0xA0u16 {
        mem.set(0xC100 + offset, offset as u8).unwrap();
    }

    mem.set(io::DMA, 0xC1).unwrap();
    for offset in 0..0xA0u16 {
        assert_eq!(mem.get(0xFE00 + offset), Ok(offset as u8));
    }
    assert_eq!(mem.io(io::DMA), 0xC1);

    let sprites = recorder.sprites.borrow();
    assert_eq!(sprites.len(), 0xA0);
    assert_eq!(sprites[0], (0xFE00, 0x00));
    assert_eq!(sprites[0x9F], (0xFE9F, 0x9F));
}

#[test]
fn oam_dma_from_unmapped_page_fills_with_ff() {
    init_logger();
    let mut mem = blank_map();
    mem.set(0xFE00, 0x12).unwrap();

    assert_eq!(mem.set(io::DMA, 0xE0), Ok(()));
    assert_eq!(mem.get(0xFE00), Ok(0xFF));
    assert_eq!(mem.get(0xFE9F), Ok(0xFF));
    assert_eq!(mem.io(io::DMA), 0xE0);
}

#[test]
fn vram_writes_notify_tile_decoder() {
    let recorder = Recorder::default();
    let mut mem = recording_map(&recorder);
    mem.set(0x8010, 0xFF).unwrap();
    mem.set(0x9FFF, 0x01).unwrap();
    mem.set(0xC000, 0x01).unwrap();
    assert_eq!(*recorder.tiles.borrow(), vec![0x8010, 0x9FFF]);
}

#[test]
fn p1_combines_select_bits_with_input() {
    let pad = Rc::new(RefCell::new(Joypad::default()));
    let mut mem = MemoryMap::new(
        Box::new(pad.clone()),
        Box::new(NullTileDecoder),
        Box::new(NullSpriteDecoder),
    )
    .unwrap();
    pad.borrow_mut().set_pressed(Button::Start, true);

    // Select buttons (bit 5 low).
    mem.set(io::P1, 0x10).unwrap();
    assert_eq!(mem.get(io::P1), Ok(0xD7));

    // Select the d-pad instead; nothing held there.
    mem.set(io::P1, 0x2F).unwrap();
    assert_eq!(mem.io(io::P1), 0x20);
    assert_eq!(mem.get(io::P1), Ok(0xEF));
}

#[test]
fn io_side_effects() {
    let mut mem = blank_map();

    mem.set_io(io::STAT, 0x05);
    assert_eq!(mem.get(io::STAT), Ok(0x85));

    mem.set_io(io::DIV, 0x42);
    mem.set(io::DIV, 0x99).unwrap();
    assert_eq!(mem.get(io::DIV), Ok(0));

    mem.set_ly(90);
    assert_eq!(mem.get(io::LY), Ok(90));
    mem.set(io::LY, 12).unwrap();
    assert_eq!(mem.get(io::LY), Ok(0));

    mem.set(io::IE, 0x1F).unwrap();
    assert_eq!(mem.get(io::IE), Ok(0x1F));

    mem.set(io::LCDC, 0x91).unwrap();
    mem.set(io::WX, 0x07).unwrap();
    let registers = mem.lcd_registers();
    assert_eq!(registers[0], 0x91);
    assert_eq!(registers[11], 0x07);
}

#[test]
fn cartridge_header_selects_mapper() {
    let plain = Cartridge::parse(vec![0; 0x8000]).unwrap();
    assert_eq!(plain.kind(), MapperKind::None);
    assert_eq!(plain.rom_banks(), 2);

    let mut rom = vec![0; 0x8000];
    rom[0x147] = 0x03;
    rom[0x149] = 0x04;
    let mbc1 = Cartridge::parse(rom).unwrap();
    assert_eq!(mbc1.kind(), MapperKind::Mbc1Ram);
    assert_eq!(mbc1.ram_banks(), 4);

    let mut rom = vec![0; 0x8000];
    rom[0x147] = 0x05;
    assert_eq!(
        Cartridge::parse(rom).unwrap_err(),
        CoreError::UnsupportedCartridge(0x05)
    );

    assert_eq!(
        Cartridge::parse(vec![0; 3 * ROM_BANK_SIZE]).unwrap_err(),
        CoreError::RomTooLarge {
            banks: 3,
            max_banks: 2
        }
    );

    let mut rom = vec![0; 129 * ROM_BANK_SIZE];
    rom[0x147] = 0x01;
    assert_eq!(
        Cartridge::parse(rom).unwrap_err(),
        CoreError::RomTooLarge {
            banks: 129,
            max_banks: 128
        }
    );
}

#[test]
fn post_boot_state() {
    let mut gb = machine(rom_with(&[(0x4000, &[0x42])]));
    assert_eq!(*gb.registers(), crate::cpu::Registers::post_boot());
    assert!(gb.memory().rom_initialized());
    assert_eq!(gb.read(io::LCDC), Ok(0x91));
    assert_eq!(gb.read(io::STAT), Ok(0x85));
    assert_eq!(gb.read(io::BGP), Ok(0xFC));
    assert_eq!(gb.read(io::TAC), Ok(0xF8));
    assert_eq!(gb.read(io::IF), Ok(0x01));
    assert_eq!(gb.read(0x4000), Ok(0x42));
    assert!(!gb.interrupts().ime());
}

#[test]
fn cold_start_without_cartridge() {
    let mut gb = GameBoy::with_config(MachineConfig::builder().skip_boot(false).build()).unwrap();
    assert_eq!(gb.registers().pc, 0x0000);
    assert!(!gb.memory().rom_initialized());

    // INC A written straight into ROM space.
    gb.write(0x0000, 0x3C).unwrap();
    assert_eq!(gb.step(), Ok(1));
    assert_eq!(gb.registers().a, 1);
}

#[test]
fn step_frame_runs_to_vblank() {
    init_logger();
    let mut gb = machine(rom_with(&[]));

    gb.step_frame().unwrap();
    assert_eq!(gb.pixel_timing().frames(), 1);
    assert_eq!(gb.timer().total_cycles(), 144 * 114);
    assert_eq!(gb.registers().pc, 0x0100 + 144 * 114);
    assert_eq!(gb.read(io::LY), Ok(144));
}

#[test]
fn undefined_opcode_stops_the_loop() {
    init_logger();
    let mut gb = machine(rom_with(&[(0x0100, &[0x00, 0xDD])]));

    assert_eq!(gb.step(), Ok(1));
    assert_eq!(
        gb.step(),
        Err(CoreError::UndefinedOpcode {
            opcode: 0xDD,
            prefixed: false,
            pc: 0x0101
        })
    );
}

#[test]
fn halted_cpu_idles_one_cycle_per_step() {
    let mut gb = machine(rom_with(&[(0x0100, &[0x76])]));

    assert_eq!(gb.step(), Ok(1));
    assert!(gb.interrupts().halted());
    for _ in 0..10 {
        assert_eq!(gb.step(), Ok(1));
    }
    assert_eq!(gb.registers().pc, 0x0101);
    assert_eq!(gb.timer().total_cycles(), 11);
}

#[test]
fn timer_interrupt_wakes_halt_and_runs_handler() {
    init_logger();
    let program: &[u8] = &[
        0xAF, // XOR A
        0xE0, 0x0F, // LDH (IF),A
        0x3E, 0x04, // LD A,0x04
        0xE0, 0xFF, // LDH (IE),A
        0x3E, 0xFF, // LD A,0xFF
        0xE0, 0x05, // LDH (TIMA),A
        0x3E, 0x05, // LD A,0x05
        0xE0, 0x07, // LDH (TAC),A
        0xAF, // XOR A
        0xFB, // EI
        0x76, // HALT
        0x00, // NOP
    ];
    let handler: &[u8] = &[
        0x3C, // INC A
        0xD9, // RETI
    ];
    let mut gb = machine(rom_with(&[(0x0100, program), (0x0050, handler)]));

    let mut serviced = false;
    for _ in 0..200 {
        let cycles = gb.step().unwrap();
        if cycles > 12 {
            serviced = true;
            assert_eq!(gb.registers().pc, 0x0050);
        }
        if gb.registers().a == 1 && gb.registers().pc > 0x0100 {
            break;
        }
    }
    assert!(serviced);
    assert_eq!(gb.registers().a, 1);
    assert!(!gb.interrupts().halted());
    assert_eq!(gb.read(io::IF).map(|f| f & 0x04), Ok(0));
}

#[test]
fn stop_holds_pending_interrupts_until_joypad() {
    init_logger();
    let program: &[u8] = &[
        0x3E, 0x01, // LD A,0x01
        0xE0, 0xFF, // LDH (IE),A
        0xAF, // XOR A
        0xE0, 0x0F, // LDH (IF),A
        0xFB, // EI
        0x00, // NOP
        0x10, 0x00, // STOP
    ];
    let mut gb = machine(rom_with(&[(0x0100, program)]));

    while !gb.interrupts().stopped() {
        gb.step().unwrap();
    }
    assert!(gb.interrupts().ime());
    assert_eq!(gb.registers().pc, 0x010B);

    // More than a frame: VBlank becomes pending but is not serviced.
    for _ in 0..20_000 {
        assert_eq!(gb.step(), Ok(1));
    }
    assert!(gb.interrupts().stopped());
    assert!(gb.interrupts().ime());
    assert_eq!(gb.registers().pc, 0x010B);
    assert_eq!(gb.registers().sp, 0xFFFE);
    assert_eq!(gb.read(io::IF).map(|f| f & 0x01), Ok(0x01));

    gb.write(io::IE, 0x11).unwrap();
    crate::cpu::interrupts::request(gb.memory_mut(), crate::cpu::InterruptFlags::JOYPAD)
        .unwrap();
    assert_eq!(gb.step(), Ok(13));
    assert!(!gb.interrupts().stopped());
    assert_eq!(gb.registers().pc, 0x0040);
    assert_eq!(gb.read(io::IF).map(|f| f & 0x11), Ok(0x10));
}
