//! Range validation and bit/byte helpers.
//!
//! The instruction engine threads a signed accumulator between micro-ops;
//! these helpers are where that value is narrowed back to a register or
//! bus width, failing with `CoreError::Range` instead of truncating.

use crate::error::{CoreError, Result};

/// Narrow to a byte, rejecting anything outside `0..=0xFF`.
#[inline]
pub fn check_u8(value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| CoreError::Range {
        value: value as i64,
        bits: 8,
    })
}

/// Narrow to a word, rejecting anything outside `0..=0xFFFF`.
#[inline]
pub fn check_u16(value: i32) -> Result<u16> {
    u16::try_from(value).map_err(|_| CoreError::Range {
        value: value as i64,
        bits: 16,
    })
}

/// Addresses are words; kept separate so call sites read as intent.
#[inline]
pub fn check_address(value: i32) -> Result<u16> {
    check_u16(value)
}

#[inline]
pub fn bit(value: u8, index: u8) -> bool {
    debug_assert!(index < 8);
    value & (1 << index) != 0
}

#[inline]
pub fn with_bit(value: u8, index: u8, set: bool) -> u8 {
    debug_assert!(index < 8);
    if set {
        value | (1 << index)
    } else {
        value & !(1 << index)
    }
}

#[inline]
pub fn high_byte(value: u16) -> u8 {
    (value >> 8) as u8
}

#[inline]
pub fn low_byte(value: u16) -> u8 {
    value as u8
}

#[inline]
pub fn word(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

/// Reinterpret the low 8 bits as a two's-complement byte.
#[inline]
pub fn sign_extend(value: i32) -> i32 {
    value as u8 as i8 as i32
}
