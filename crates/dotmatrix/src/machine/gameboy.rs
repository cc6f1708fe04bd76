use crate::config::MachineConfig;
use crate::cpu::{self, AddressSpace, Cpu, InterruptController, OpcodeTable, Registers};
use crate::error::Result;

use super::{Cartridge, MemoryMap, PixelTiming, Timer};

/// The whole machine: CPU, interrupt state, memory map, timer and LCD
/// timing, stepped together one instruction at a time.
pub struct GameBoy {
    cpu: Cpu,
    interrupts: InterruptController,
    memory: MemoryMap,
    timer: Timer,
    ppu: PixelTiming,
    cartridge: Cartridge,
    frame_ready: bool,
}

impl GameBoy {
    pub fn with_config(config: MachineConfig) -> Result<Self> {
        let MachineConfig {
            rom,
            skip_boot,
            display,
            input,
            tile_decoder,
            sprite_decoder,
            renderer,
        } = config;

        let table = OpcodeTable::build()?;
        let mut memory = MemoryMap::new(input, tile_decoder, sprite_decoder)?;

        let cartridge = if rom.is_empty() {
            Cartridge::empty()
        } else {
            let cartridge = Cartridge::parse(rom)?;
            memory.load_cartridge(&cartridge);
            memory.mark_rom_initialized();
            cartridge
        };

        let mut cpu = Cpu::new(table);
        if skip_boot {
            cpu.regs = Registers::post_boot();
            memory.apply_post_boot_io();
        }

        Ok(Self {
            cpu,
            interrupts: InterruptController::new(),
            memory,
            timer: Timer::new(),
            ppu: PixelTiming::new(renderer, display),
            cartridge,
            frame_ready: false,
        })
    }

    /// One tick of the driving loop: execute an instruction (or idle one
    /// cycle while halted or stopped), settle IME/HALT/STOP, service an
    /// interrupt, then advance the timer and LCD timing by the cycles
    /// spent. Returns the machine cycles consumed.
    pub fn step(&mut self) -> Result<u32> {
        let mut cycles = if self.interrupts.halted() || self.interrupts.stopped() {
            1
        } else {
            let executed = self.cpu.step(&mut self.memory)?;
            self.interrupts.end_instruction(&executed.context);
            executed.cycles
        };

        if let Some(dispatch) = self.interrupts.poll(&mut self.cpu.regs, &mut self.memory)? {
            cycles += dispatch;
        }

        self.timer.step(cycles, &mut self.memory)?;
        if self.ppu.step(cycles, &mut self.memory)? {
            self.frame_ready = true;
        }
        Ok(cycles)
    }

    /// Step until the LCD enters vertical blank.
    pub fn step_frame(&mut self) -> Result<()> {
        self.frame_ready = false;
        while !self.frame_ready {
            self.step()?;
        }
        Ok(())
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn memory(&self) -> &MemoryMap {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryMap {
        &mut self.memory
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn pixel_timing(&self) -> &PixelTiming {
        &self.ppu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Read through the memory map, side effects included.
    pub fn read(&mut self, address: u16) -> Result<u8> {
        self.memory.get(address)
    }

    /// Write through the memory map, side effects included.
    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        self.memory.set(address, value)
    }

    /// One-line register dump.
    pub fn dump_registers(&self) -> String {
        cpu::dump(&self.cpu.regs)
    }
}
