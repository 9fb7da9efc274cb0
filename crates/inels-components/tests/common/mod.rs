//! Shared helpers for the platform integration tests

#![allow(dead_code)]

mod mock_commander;
mod mock_device;

pub use mock_commander::*;
pub use mock_device::*;
