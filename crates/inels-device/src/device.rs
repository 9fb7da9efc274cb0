//! Device snapshot

use inels_core::{DeviceType, HardwareType};
use inels_status::{RawStatus, StatusSource};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// State of a switching device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchState {
    pub on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
}

/// An optional reading a switch may expose as a state attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchFeature {
    Temperature,
    Overflow,
    Power,
}

impl SwitchFeature {
    /// Attribute name the feature is published under
    pub fn name(&self) -> &'static str {
        match self {
            SwitchFeature::Temperature => "temperature",
            SwitchFeature::Overflow => "overflow",
            SwitchFeature::Power => "power",
        }
    }

    /// Read the feature from a switch state. Missing readings are `null`.
    pub fn read(&self, state: &SwitchState) -> serde_json::Value {
        match self {
            SwitchFeature::Temperature => json!(state.temperature),
            SwitchFeature::Overflow => json!(state.overflow),
            SwitchFeature::Power => json!(state.power),
        }
    }
}

/// The decoded value a device library keeps for a device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceValue {
    /// Sensor-only devices; everything lives in the raw status
    #[default]
    Status,
    /// Single-output light level, 0..=100
    Level(u8),
    /// Per-channel output levels, 0..=100
    Channels(Vec<u8>),
    Switch(SwitchState),
}

/// A value to write to a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetValue {
    Level(u8),
    Channels(Vec<u8>),
    On(bool),
}

/// Snapshot of one device as reported by the device library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub unique_id: String,
    /// Display name
    pub title: String,
    pub device_type: DeviceType,
    pub hardware_type: HardwareType,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub raw_status: RawStatus,
    #[serde(default)]
    pub value: DeviceValue,
    #[serde(default)]
    pub features: Vec<SwitchFeature>,
}

fn default_available() -> bool {
    true
}

impl Device {
    pub fn new(
        unique_id: impl Into<String>,
        title: impl Into<String>,
        device_type: DeviceType,
        hardware_type: HardwareType,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            title: title.into(),
            device_type,
            hardware_type,
            available: true,
            raw_status: RawStatus::default(),
            value: DeviceValue::Status,
            features: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<RawStatus>) -> Self {
        self.raw_status = status.into();
        self
    }

    pub fn with_value(mut self, value: DeviceValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_features(mut self, features: Vec<SwitchFeature>) -> Self {
        self.features = features;
        self
    }

    /// Light level, for single-output lights
    pub fn level(&self) -> Option<u8> {
        match &self.value {
            DeviceValue::Level(level) => Some(*level),
            _ => None,
        }
    }

    /// Channel levels, for multi-channel dimmers
    pub fn channels(&self) -> Option<&[u8]> {
        match &self.value {
            DeviceValue::Channels(channels) => Some(channels),
            _ => None,
        }
    }

    pub fn switch_state(&self) -> Option<&SwitchState> {
        match &self.value {
            DeviceValue::Switch(state) => Some(state),
            _ => None,
        }
    }

    /// Apply a written value to this snapshot, as the device would report it back
    pub fn apply(&mut self, value: &SetValue) {
        match value {
            SetValue::On(on) => match &mut self.value {
                DeviceValue::Switch(state) => state.on = *on,
                other => {
                    *other = DeviceValue::Switch(SwitchState {
                        on: *on,
                        ..SwitchState::default()
                    })
                }
            },
            SetValue::Level(level) => self.value = DeviceValue::Level(*level),
            SetValue::Channels(channels) => self.value = DeviceValue::Channels(channels.clone()),
        }
    }
}

impl StatusSource for Device {
    fn is_available(&self) -> bool {
        self.available
    }

    fn raw_status(&self) -> &RawStatus {
        &self.raw_status
    }
}
