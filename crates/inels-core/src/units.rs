//! Units of measurement, device classes and icons expected by the host's
//! presentation layer. The strings are part of the external contract.

pub const TEMP_CELSIUS: &str = "°C";
pub const PERCENTAGE: &str = "%";
pub const LIGHT_LUX: &str = "lux";

pub const ICON_LIGHT: &str = "mdi:lightbulb";
pub const ICON_SWITCH: &str = "mdi:power-socket-eu";
pub const ICON_BATTERY: &str = "mdi:battery-50";
pub const ICON_TEMPERATURE: &str = "mdi:thermometer";
pub const ICON_HUMIDITY: &str = "mdi:water-percent";
pub const ICON_DEW_POINT: &str = "mdi:thermometer-water";
pub const ICON_LIGHT_IN: &str = "mdi:brightness-5";

/// Sensor device classes used by the adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorDeviceClass {
    Battery,
    Temperature,
    Illuminance,
    Humidity,
}

impl SensorDeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorDeviceClass::Battery => "battery",
            SensorDeviceClass::Temperature => "temperature",
            SensorDeviceClass::Illuminance => "illuminance",
            SensorDeviceClass::Humidity => "humidity",
        }
    }
}

/// Binary sensor device classes used by the adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinarySensorDeviceClass {
    /// On means low battery
    Battery,
}

impl BinarySensorDeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinarySensorDeviceClass::Battery => "battery",
        }
    }
}

/// Light color modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorMode {
    OnOff,
    Brightness,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::OnOff => "onoff",
            ColorMode::Brightness => "brightness",
        }
    }
}
