//! Device builders for platform tests

use inels_core::{DeviceType, HardwareType};
use inels_device::{Device, DeviceHub, DeviceValue, SwitchFeature, SwitchState};
use inels_status::field_table;
use std::sync::Arc;

/// Builder for device snapshots with a synthetic status dump
#[derive(Debug, Clone)]
pub struct MockDevice {
    device: Device,
    tokens: Vec<String>,
}

impl MockDevice {
    /// A device whose status holds `00` in every slot its hardware's table reads
    pub fn new(unique_id: &str, device_type: DeviceType, hardware_type: HardwareType) -> Self {
        let len = field_table(&hardware_type)
            .map(|table| table.min_status_len())
            .unwrap_or(0);
        Self {
            device: Device::new(unique_id, unique_id.to_uppercase(), device_type, hardware_type),
            tokens: vec!["00".to_string(); len],
        }
    }

    pub fn sensor(unique_id: &str, hardware_type: HardwareType) -> Self {
        Self::new(unique_id, DeviceType::Sensor, hardware_type)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.device.title = title.to_string();
        self
    }

    /// Set the token at a status position, growing the status if needed
    pub fn with_token(mut self, position: usize, token: &str) -> Self {
        if position >= self.tokens.len() {
            self.tokens.resize(position + 1, "00".to_string());
        }
        self.tokens[position] = token.to_string();
        self
    }

    /// Replace the status with exactly these tokens
    pub fn with_tokens(mut self, tokens: &[&str]) -> Self {
        self.tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.device.value = DeviceValue::Level(level);
        self
    }

    pub fn with_channels(mut self, channels: &[u8]) -> Self {
        self.device.value = DeviceValue::Channels(channels.to_vec());
        self
    }

    pub fn with_switch(mut self, state: SwitchState) -> Self {
        self.device.value = DeviceValue::Switch(state);
        self
    }

    pub fn with_features(mut self, features: &[SwitchFeature]) -> Self {
        self.device.features = features.to_vec();
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.device.available = false;
        self
    }

    pub fn build(self) -> Device {
        self.device.with_status(self.tokens)
    }
}

/// A hub seeded with the given devices
pub fn hub_with(devices: impl IntoIterator<Item = Device>) -> Arc<DeviceHub> {
    let hub = Arc::new(DeviceHub::new());
    for device in devices {
        hub.publish(device);
    }
    hub
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_device_status() {
        let device = MockDevice::sensor("t", HardwareType::Rfti10B)
            .with_token(2, "86")
            .build();
        assert_eq!(device.raw_status.len(), 5);
        assert_eq!(device.raw_status.get(2), Some("86"));
        assert_eq!(device.title, "T");
    }
}
