//! HTTP surface of the feeder cloud emulator.

pub mod api;
pub mod state;
