use std::cell::RefCell;
use std::rc::Rc;

use crate::{Shade, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Sink for rendered pixels.
///
/// Scanline rendering calls `set_pixel` for every dot of a line, and the
/// LCD timing unit calls `request_refresh` once per frame when it enters
/// vertical blank. How and when the frame is presented is up to the host.
pub trait Display {
    fn set_pixel(&mut self, row: usize, col: usize, packed_color: u32);
    fn request_refresh(&mut self);
}

/// Display that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn set_pixel(&mut self, _row: usize, _col: usize, _packed_color: u32) {}
    fn request_refresh(&mut self) {}
}

/// In-memory 160x144 framebuffer of packed colours.
///
/// Headless hosts and tests use this to inspect what was drawn and how
/// many frames were completed.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    refreshes: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: vec![Shade::White.packed(); SCREEN_WIDTH * SCREEN_HEIGHT],
            refreshes: 0,
        }
    }
}

impl FrameBuffer {
    pub fn pixel(&self, row: usize, col: usize) -> Option<u32> {
        if row >= SCREEN_HEIGHT || col >= SCREEN_WIDTH {
            return None;
        }
        self.pixels.get(row * SCREEN_WIDTH + col).copied()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of `request_refresh` calls seen so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Write the frame as packed RGB24, row-major.
    pub fn write_rgb24(&self, out: &mut Vec<u8>) {
        out.reserve(self.pixels.len() * 3);
        for &packed in &self.pixels {
            let [r, g, b, _] = packed.to_le_bytes();
            out.extend_from_slice(&[r, g, b]);
        }
    }
}

impl Display for FrameBuffer {
    fn set_pixel(&mut self, row: usize, col: usize, packed_color: u32) {
        if row >= SCREEN_HEIGHT || col >= SCREEN_WIDTH {
            log::warn!("FrameBuffer: pixel ({row}, {col}) outside the LCD, dropped");
            return;
        }
        self.pixels[row * SCREEN_WIDTH + col] = packed_color;
    }

    fn request_refresh(&mut self) {
        self.refreshes = self.refreshes.wrapping_add(1);
    }
}

/// Lets a host keep a handle on a display it has handed to the core.
impl<D: Display + ?Sized> Display for Rc<RefCell<D>> {
    fn set_pixel(&mut self, row: usize, col: usize, packed_color: u32) {
        self.borrow_mut().set_pixel(row, col, packed_color);
    }

    fn request_refresh(&mut self) {
        self.borrow_mut().request_refresh();
    }
}
