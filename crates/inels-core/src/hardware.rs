//! Device hardware identifiers and device categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a hardware or device type identifier
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("hardware type cannot be empty")]
    EmptyHardwareType,

    #[error("unknown device type '{0}' (expected sensor, light, switch, twochanneldimmer or bus)")]
    UnknownDeviceType(String),
}

/// iNELS device model, as reported by the device library (e.g. "RFTI-10B")
///
/// Every model this crate has a wire layout for gets its own variant so that
/// dispatch tables are checked for exhaustiveness. Anything else is carried
/// through as [`HardwareType::Other`] and resolves to no entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HardwareType {
    /// RFTI-10B wireless temperature sensor with internal and external probe
    Rfti10B,
    /// SA3-01B bus relay with temperature input
    Sa301B,
    /// DA3-22M bus two-channel dimmer
    Da322M,
    /// GTR3-50 bus thermostat / multisensor
    Gtr350,
    /// GSB3-90SX bus button array / multisensor
    Gsb390Sx,
    /// RFDAC-71B wireless dimming actuator
    Rfdac71B,
    /// A model without a known wire layout
    Other(String),
}

impl HardwareType {
    /// The wire identifier of this model
    pub fn as_str(&self) -> &str {
        match self {
            HardwareType::Rfti10B => "RFTI-10B",
            HardwareType::Sa301B => "SA3-01B",
            HardwareType::Da322M => "DA3-22M",
            HardwareType::Gtr350 => "GTR3-50",
            HardwareType::Gsb390Sx => "GSB3-90SX",
            HardwareType::Rfdac71B => "RFDAC-71B",
            HardwareType::Other(s) => s,
        }
    }

    /// Whether this model has a known wire layout
    pub fn is_known(&self) -> bool {
        !matches!(self, HardwareType::Other(_))
    }
}

impl FromStr for HardwareType {
    type Err = TypeParseError;

    /// Parsing is case-insensitive and accepts `_` in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeParseError::EmptyHardwareType);
        }
        let normalized = trimmed.to_ascii_uppercase().replace('_', "-");
        Ok(match normalized.as_str() {
            "RFTI-10B" => HardwareType::Rfti10B,
            "SA3-01B" => HardwareType::Sa301B,
            "DA3-22M" => HardwareType::Da322M,
            "GTR3-50" => HardwareType::Gtr350,
            "GSB3-90SX" => HardwareType::Gsb390Sx,
            "RFDAC-71B" => HardwareType::Rfdac71B,
            _ => HardwareType::Other(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for HardwareType {
    type Error = TypeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HardwareType> for String {
    fn from(hw: HardwareType) -> String {
        hw.as_str().to_string()
    }
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device category reported by the device library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Sensor,
    Light,
    Switch,
    TwoChannelDimmer,
    /// A bus module whose category is decided by its hardware type
    Bus,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Sensor => "sensor",
            DeviceType::Light => "light",
            DeviceType::Switch => "switch",
            DeviceType::TwoChannelDimmer => "twochanneldimmer",
            DeviceType::Bus => "bus",
        }
    }
}

impl FromStr for DeviceType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sensor" => Ok(DeviceType::Sensor),
            "light" => Ok(DeviceType::Light),
            "switch" => Ok(DeviceType::Switch),
            "twochanneldimmer" => Ok(DeviceType::TwoChannelDimmer),
            "bus" => Ok(DeviceType::Bus),
            other => Err(TypeParseError::UnknownDeviceType(other.to_string())),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
