use std::cell::RefCell;
use std::rc::Rc;

/// Joypad line reader wired to P1 (0xFF00).
///
/// The core treats the device as an opaque 4-bit reader: `get_keys` is
/// called whenever P1 is read and must return the low nibble of P1
/// (bit = 0 means pressed). Writes to P1 forward the register's upper
/// nibble through `set_input_column`, which selects the button or d-pad
/// column on real hardware.
pub trait InputDevice {
    fn get_keys(&mut self) -> u8;
    fn set_input_column(&mut self, nibble: u8);
}

/// Input device with nothing pressed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputDevice for NullInput {
    fn get_keys(&mut self) -> u8 {
        0x0F
    }

    fn set_input_column(&mut self, _nibble: u8) {}
}

impl<I: InputDevice + ?Sized> InputDevice for Rc<RefCell<I>> {
    fn get_keys(&mut self) -> u8 {
        self.borrow_mut().get_keys()
    }

    fn set_input_column(&mut self, nibble: u8) {
        self.borrow_mut().set_input_column(nibble);
    }
}

/// The eight DMG buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Line within its column (bit 0-3 of P1).
    fn line(self) -> u8 {
        match self {
            Button::Right | Button::A => 0,
            Button::Left | Button::B => 1,
            Button::Up | Button::Select => 2,
            Button::Down | Button::Start => 3,
        }
    }

    fn is_dpad(self) -> bool {
        matches!(self, Button::Right | Button::Left | Button::Up | Button::Down)
    }
}

/// Button matrix behind P1.
///
/// Pressed buttons are kept as set bits; the selected column(s) are
/// inverted into the low nibble on read. Column nibble bit 0 (P1 bit 4)
/// low selects the d-pad, bit 1 (P1 bit 5) low selects the buttons.
#[derive(Debug, Clone, Copy)]
pub struct Joypad {
    column: u8,
    buttons: u8,
    dpad: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            column: 0x03,
            buttons: 0,
            dpad: 0,
        }
    }
}

impl Joypad {
    pub fn set_pressed(&mut self, button: Button, pressed: bool) {
        let mask = 1u8 << button.line();
        let group = if button.is_dpad() {
            &mut self.dpad
        } else {
            &mut self.buttons
        };
        if pressed {
            *group |= mask;
        } else {
            *group &= !mask;
        }
    }
}

impl InputDevice for Joypad {
    fn get_keys(&mut self) -> u8 {
        let mut low = 0x0F;
        if self.column & 0x01 == 0 {
            low &= !self.dpad;
        }
        if self.column & 0x02 == 0 {
            low &= !self.buttons;
        }
        low & 0x0F
    }

    fn set_input_column(&mut self, nibble: u8) {
        self.column = nibble & 0x03;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joypad_reports_only_selected_column() {
        let mut pad = Joypad::default();
        pad.set_pressed(Button::Start, true);
        pad.set_pressed(Button::Left, true);

        // Nothing selected.
        assert_eq!(pad.get_keys(), 0x0F);

        // P1 bit 5 low: buttons.
        pad.set_input_column(0x01);
        assert_eq!(pad.get_keys(), 0b0111);

        // P1 bit 4 low: d-pad.
        pad.set_input_column(0x02);
        assert_eq!(pad.get_keys(), 0b1101);

        pad.set_pressed(Button::Left, false);
        assert_eq!(pad.get_keys(), 0x0F);
    }
}
