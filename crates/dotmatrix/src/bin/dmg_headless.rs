use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use dotmatrix::{GameBoy, MachineConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use dotmatrix_common::FrameBuffer;

const USAGE: &str = "Usage: dmg_headless <rom_path> [frames] [out_rgb24_path]

The rgb24 dump holds whatever a scanline renderer drew into the frame
buffer. No renderer is installed here, so it shows the blank (white) LCD.";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next().map(PathBuf::from) else {
        bail!("{USAGE}");
    };
    let frames: u32 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'\n{USAGE}"))?,
        None => 60,
    };
    let out_path = args.next().map(PathBuf::from);

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let framebuffer = Rc::new(RefCell::new(FrameBuffer::default()));
    let config = MachineConfig::builder()
        .rom(rom)
        .display(Box::new(framebuffer.clone()))
        .build();
    let mut gb = GameBoy::with_config(config).context("failed to build machine")?;
    log::info!(
        "loaded '{}': {:?}, {} ROM banks",
        rom_path.display(),
        gb.cartridge().kind(),
        gb.cartridge().rom_banks()
    );

    for frame in 0..frames {
        gb.step_frame()
            .with_context(|| format!("frame {frame}: {}", gb.dump_registers()))?;
    }

    println!(
        "{} frames ({} refreshes), {} cycles",
        frames,
        framebuffer.borrow().refreshes(),
        gb.timer().total_cycles()
    );
    println!("{}", gb.dump_registers());

    if let Some(out_path) = out_path {
        let mut buffer = Vec::new();
        framebuffer.borrow().write_rgb24(&mut buffer);
        std::fs::write(&out_path, &buffer)
            .with_context(|| format!("failed to write '{}'", out_path.display()))?;
        println!(
            "Wrote {} bytes ({}x{} rgb24) to '{}'",
            buffer.len(),
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            out_path.display()
        );
    }
    Ok(())
}
