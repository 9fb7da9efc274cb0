//! iNELS entity platforms
//!
//! Adapters that present iNELS devices as host entities. Each platform
//! module exposes a `setup` function that picks the devices it serves and
//! builds their entities; [`setup_entry`] runs all of them and wires every
//! entity to its device's state changes.

mod entity;
mod setup;

pub mod binary_sensor;
pub mod light;
pub mod sensor;
pub mod switch;

pub use binary_sensor::{resolve_binary_descriptors, BinarySensorDescription, InelsBinarySensor};
pub use entity::{EntityBase, InelsEntity, ToggleEntity, TurnOffParams, TurnOnParams};
pub use light::{InelsLight, InelsLightChannel, LightChannelDescription};
pub use sensor::{resolve_descriptors, InelsSensor, SensorDescription};
pub use setup::{setup_entry, InelsPlatforms};
pub use switch::InelsSwitch;
