//! Library root for the quadruped walker firmware.
//!
//! Re-exports all main modules: [`kinematics`], [`robot`], and [`tasks`].
//! The library is hardware independent; the ESP32 binary (`esp32` feature)
//! binds it to real peripherals.
#![cfg_attr(not(test), no_std)]

pub mod kinematics;
pub mod robot;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

/// Capacity of the serial line buffer, in bytes.
pub const LINE_BUF_SIZE: usize = 64;
/// Number of bytes pulled from the UART per read call.
pub const RX_CHUNK_SIZE: usize = 16;
