//! Device layer for iNELS entity adapters
//!
//! The MQTT device library is outside this workspace. This crate models the
//! parts of it the adapters consume:
//!
//! - [`Device`]: a snapshot of one device's availability, raw status and value
//! - [`DeviceHub`]: the state-change source entities subscribe to
//! - [`DeviceCommander`]: the blocking "set value" sink, run on the executor

mod command;
mod device;
mod hub;

pub use command::{submit, CommandError, CommandResult, DeviceCommander, LoopbackCommander};
pub use device::{Device, DeviceValue, SetValue, SwitchFeature, SwitchState};
pub use hub::{DeviceCallback, DeviceHub, ListenerId};
