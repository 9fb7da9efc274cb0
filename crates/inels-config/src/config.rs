//! Typed bridge configuration

use inels_core::{DeviceType, HardwareType};
use inels_device::{Device, DeviceValue, SwitchFeature};
use inels_status::{field_table, RawStatus};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::loader::load_yaml;

pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Broker connection settings, carried for the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_MQTT_PORT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Default tracing filter directive
    #[serde(default = "default_level")]
    pub default: String,
}

fn default_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            default: default_level(),
        }
    }
}

/// A statically configured device and its initial state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub unique_id: String,
    /// Display name, defaults to the unique id
    #[serde(default)]
    pub title: Option<String>,
    pub device_type: DeviceType,
    pub hardware_type: HardwareType,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Raw status dump, newline-delimited hex tokens
    #[serde(default)]
    pub status: RawStatus,
    #[serde(default)]
    pub value: DeviceValue,
    #[serde(default)]
    pub features: Vec<SwitchFeature>,
}

fn default_available() -> bool {
    true
}

impl DeviceConfig {
    /// Sensor devices must report every token their hardware's layout reads
    fn validate_status(&self) -> ConfigResult<()> {
        if self.device_type != DeviceType::Sensor {
            return Ok(());
        }
        let Some(table) = field_table(&self.hardware_type) else {
            return Ok(());
        };
        if self.status.len() < table.min_status_len() {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "device '{}' ({}) has {} status tokens, the {} layout needs {}",
                    self.unique_id,
                    self.hardware_type,
                    self.status.len(),
                    table.name(),
                    table.min_status_len()
                ),
            });
        }
        Ok(())
    }

    pub fn to_device(&self) -> Device {
        let title = self.title.clone().unwrap_or_else(|| self.unique_id.clone());
        Device::new(
            self.unique_id.clone(),
            title,
            self.device_type,
            self.hardware_type.clone(),
        )
        .with_available(self.available)
        .with_status(self.status.clone())
        .with_value(self.value.clone())
        .with_features(self.features.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InelsConfig {
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl InelsConfig {
    /// Parse a resolved YAML document
    pub fn from_yaml(yaml: Value) -> ConfigResult<Self> {
        if !yaml.is_mapping() {
            return Err(ConfigError::InvalidValue {
                key: "root".to_string(),
                reason: "configuration must be a mapping".to_string(),
            });
        }
        serde_yaml::from_value(yaml).map_err(|e| ConfigError::InvalidValue {
            key: "root".to_string(),
            reason: e.to_string(),
        })
    }

    /// Reject configurations the bridge cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.mqtt.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                message: "mqtt.host must not be empty".to_string(),
            });
        }
        if self.mqtt.port == 0 {
            return Err(ConfigError::ValidationFailed {
                message: "mqtt.port must be non-zero".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.unique_id.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    message: "device unique_id must not be empty".to_string(),
                });
            }
            if !seen.insert(device.unique_id.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    message: format!("duplicate device unique_id '{}'", device.unique_id),
                });
            }
            if !device.hardware_type.is_known() {
                debug!(
                    device = %device.unique_id,
                    hardware = %device.hardware_type,
                    "Unrecognised hardware type"
                );
            }
            device.validate_status()?;
        }
        Ok(())
    }

    /// Initial device snapshots, in configuration order
    pub fn devices(&self) -> Vec<Device> {
        self.devices.iter().map(DeviceConfig::to_device).collect()
    }
}

/// Load, parse and validate a configuration file
pub fn load_config(
    config_dir: impl Into<PathBuf>,
    file: impl AsRef<Path>,
) -> ConfigResult<InelsConfig> {
    let yaml = load_yaml(config_dir, file)?;
    let config = InelsConfig::from_yaml(yaml)?;
    config.validate()?;
    info!(
        host = %config.mqtt.host,
        port = config.mqtt.port,
        devices = config.devices.len(),
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(yaml: &str) -> ConfigResult<InelsConfig> {
        InelsConfig::from_yaml(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse("mqtt:\n  host: broker.local\n").unwrap();
        assert_eq!(config.mqtt.port, DEFAULT_MQTT_PORT);
        assert_eq!(config.logger.default, "info");
        assert!(config.devices.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_devices() {
        let config = parse(
            r#"
mqtt:
  host: broker.local
devices:
  - unique_id: "0a1b"
    title: Garden
    device_type: sensor
    hardware_type: RFTI-10B
    status: "00\n08\n86\n00\n00\n"
  - unique_id: lamp
    device_type: light
    hardware_type: rfdac_71b
    value:
      level: 40
  - unique_id: boiler
    device_type: bus
    hardware_type: SA3-01B
    available: false
    value:
      switch:
        on: true
        temperature: 45.5
    features: [temperature]
"#,
        )
        .unwrap();
        config.validate().unwrap();

        let devices = config.devices();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].title, "Garden");
        assert_eq!(devices[0].raw_status.get(2), Some("86"));
        assert_eq!(devices[1].title, "lamp");
        assert_eq!(devices[1].hardware_type, HardwareType::Rfdac71B);
        assert_eq!(devices[1].level(), Some(40));
        assert!(!devices[2].available);
        assert_eq!(devices[2].features, vec![SwitchFeature::Temperature]);
        assert_eq!(devices[2].switch_state().unwrap().temperature, Some(45.5));
    }

    #[test]
    fn test_unknown_hardware_is_accepted() {
        let config = parse(
            r#"
mqtt:
  host: h
devices:
  - {unique_id: x, device_type: sensor, hardware_type: RFXX-1}
"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(
            config.devices[0].hardware_type,
            HardwareType::Other("RFXX-1".to_string())
        );
    }

    #[test]
    fn test_bad_device_type() {
        let result = parse(
            r#"
mqtt:
  host: h
devices:
  - {unique_id: x, device_type: toaster, hardware_type: RFTI-10B}
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validation() {
        let empty_host = parse("mqtt:\n  host: ' '\n").unwrap();
        assert!(matches!(
            empty_host.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));

        let zero_port = parse("mqtt:\n  host: h\n  port: 0\n").unwrap();
        assert!(zero_port.validate().is_err());

        let duplicate = parse(
            r#"
mqtt:
  host: h
devices:
  - {unique_id: a, device_type: switch, hardware_type: RFSC-61}
  - {unique_id: a, device_type: light, hardware_type: RFDAC-71B}
"#,
        )
        .unwrap();
        match duplicate.validate() {
            Err(ConfigError::ValidationFailed { message }) => assert!(message.contains("'a'")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_sensor_status_must_cover_its_layout() {
        let missing = parse(
            r#"
mqtt:
  host: h
devices:
  - {unique_id: gtr, device_type: sensor, hardware_type: GTR3-50}
  - {unique_id: lamp, device_type: light, hardware_type: RFDAC-71B}
"#,
        )
        .unwrap();
        match missing.validate() {
            Err(ConfigError::ValidationFailed { message }) => {
                assert!(message.contains("'gtr'"), "{}", message);
                assert!(message.contains("needs 13"), "{}", message);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        let short = parse(
            "mqtt:\n  host: h\ndevices:\n  - unique_id: t\n    device_type: sensor\n    \
             hardware_type: RFTI-10B\n    status: \"00\\n00\\n\"\n",
        )
        .unwrap();
        assert!(matches!(short.validate(), Err(ConfigError::ValidationFailed { .. })));

        // Only sensor devices are decoded from their status
        let relay = parse(
            r#"
mqtt:
  host: h
devices:
  - {unique_id: sa3, device_type: bus, hardware_type: SA3-01B}
"#,
        )
        .unwrap();
        relay.validate().unwrap();
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(matches!(
            parse("- a\n- b\n"),
            Err(ConfigError::InvalidValue { key, .. }) if key == "root"
        ));
    }

    #[test]
    fn test_load_config_with_secret_and_include() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("secrets.yaml"), "mqtt_password: s3cret\n").unwrap();
        fs::write(
            dir.path().join("devices.yaml"),
            format!(
                "- unique_id: gtr\n  title: Hall\n  device_type: sensor\n  \
                 hardware_type: GTR3-50\n  status: {:?}\n",
                "00\n".repeat(13)
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("inels.yaml"),
            r#"
mqtt:
  host: broker.local
  port: 1884
  username: bridge
  password: !secret mqtt_password
logger:
  default: debug
devices: !include devices.yaml
"#,
        )
        .unwrap();

        let config = load_config(dir.path(), "inels.yaml").unwrap();
        assert_eq!(config.mqtt.port, 1884);
        assert_eq!(config.mqtt.password.as_deref(), Some("s3cret"));
        assert_eq!(config.logger.default, "debug");
        assert_eq!(config.devices()[0].hardware_type, HardwareType::Gtr350);
    }

    #[test]
    fn test_password_not_serialized() {
        let config = parse("mqtt:\n  host: h\n  password: p\n").unwrap();
        let rendered = serde_yaml::to_string(&config).unwrap();
        assert!(!rendered.contains("password"));
    }
}
