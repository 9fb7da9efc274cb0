//! Core types for iNELS entity adapters
//!
//! This crate provides the vocabulary shared by the decoder, the device layer
//! and the platform adapters: entity platforms, device hardware identifiers,
//! decoded native values and the host-facing entity state.

mod hardware;
mod platform;
mod state;
mod value;

pub mod units;

pub use hardware::{DeviceType, HardwareType, TypeParseError};
pub use platform::Platform;
pub use state::{Attributes, EntityState};
pub use value::NativeValue;

/// State value reported for an entity whose device is unavailable
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// State value for a toggle or binary entity that is on
pub const STATE_ON: &str = "on";

/// State value for a toggle or binary entity that is off
pub const STATE_OFF: &str = "off";

/// Well-known state attribute names
pub mod attrs {
    pub const FRIENDLY_NAME: &str = "friendly_name";
    pub const UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";
    pub const DEVICE_CLASS: &str = "device_class";
    pub const ICON: &str = "icon";
    pub const BRIGHTNESS: &str = "brightness";
    pub const SUPPORTED_COLOR_MODES: &str = "supported_color_modes";
}
