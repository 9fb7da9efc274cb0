//! Sensor platform
//!
//! One entity per descriptor per device. The descriptor set and the field
//! table are both chosen from the device's hardware type.

use inels_core::units::{
    SensorDeviceClass, ICON_BATTERY, ICON_DEW_POINT, ICON_HUMIDITY, ICON_LIGHT_IN,
    ICON_TEMPERATURE, LIGHT_LUX, PERCENTAGE, TEMP_CELSIUS,
};
use inels_core::{attrs, DeviceType, EntityState, HardwareType, NativeValue, Platform};
use inels_device::Device;
use inels_status::{
    analog_temperature, battery_level, dew_point, field_table, humidity, light_intensity,
    temperature_in, temperature_out, DecodeError, DecodeFn, DecodeResult, FieldIndexTable,
};
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error};

use crate::entity::{EntityBase, InelsEntity};

/// Static description of one sensor a device exposes
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub device_class: SensorDeviceClass,
    pub icon: &'static str,
    pub unit: &'static str,
    pub value: DecodeFn,
}

pub static SENSOR_DESCRIPTION_TEMPERATURE: [SensorDescription; 3] = [
    SensorDescription {
        key: "battery_level",
        name: "Battery",
        device_class: SensorDeviceClass::Battery,
        icon: ICON_BATTERY,
        unit: PERCENTAGE,
        value: battery_level,
    },
    SensorDescription {
        key: "temp_in",
        name: "Temperature In",
        device_class: SensorDeviceClass::Temperature,
        icon: ICON_TEMPERATURE,
        unit: TEMP_CELSIUS,
        value: temperature_in,
    },
    SensorDescription {
        key: "temp_out",
        name: "Temperature Out",
        device_class: SensorDeviceClass::Temperature,
        icon: ICON_TEMPERATURE,
        unit: TEMP_CELSIUS,
        value: temperature_out,
    },
];

pub static SENSOR_DESCRIPTION_TEMPERATURE_GENERIC: [SensorDescription; 1] = [SensorDescription {
    key: "temp_in",
    name: "Temperature",
    device_class: SensorDeviceClass::Temperature,
    icon: ICON_TEMPERATURE,
    unit: TEMP_CELSIUS,
    value: temperature_in,
}];

pub static SENSOR_DESCRIPTION_MULTISENSOR: [SensorDescription; 5] = [
    SensorDescription {
        key: "temp_in",
        name: "Temperature",
        device_class: SensorDeviceClass::Temperature,
        icon: ICON_TEMPERATURE,
        unit: TEMP_CELSIUS,
        value: temperature_in,
    },
    SensorDescription {
        key: "light_in",
        name: "Light intensity",
        device_class: SensorDeviceClass::Illuminance,
        icon: ICON_LIGHT_IN,
        unit: LIGHT_LUX,
        value: light_intensity,
    },
    SensorDescription {
        key: "ain",
        name: "Analog temperature",
        device_class: SensorDeviceClass::Temperature,
        icon: ICON_TEMPERATURE,
        unit: TEMP_CELSIUS,
        value: analog_temperature,
    },
    SensorDescription {
        key: "humidity",
        name: "Humidity",
        device_class: SensorDeviceClass::Humidity,
        icon: ICON_HUMIDITY,
        unit: PERCENTAGE,
        value: humidity,
    },
    SensorDescription {
        key: "dew_point",
        name: "Dew point",
        device_class: SensorDeviceClass::Temperature,
        icon: ICON_DEW_POINT,
        unit: TEMP_CELSIUS,
        value: dew_point,
    },
];

/// Descriptor set and field table for a hardware type
///
/// Returns `None` for hardware that exposes no sensors. The table is the
/// hardware's layout from [`field_table`].
pub fn resolve_descriptors(
    hardware: &HardwareType,
) -> Option<(&'static [SensorDescription], &'static FieldIndexTable)> {
    let descriptions: &'static [SensorDescription] = match hardware {
        HardwareType::Rfti10B => &SENSOR_DESCRIPTION_TEMPERATURE,
        HardwareType::Sa301B | HardwareType::Da322M => &SENSOR_DESCRIPTION_TEMPERATURE_GENERIC,
        HardwareType::Gtr350 | HardwareType::Gsb390Sx => &SENSOR_DESCRIPTION_MULTISENSOR,
        HardwareType::Rfdac71B | HardwareType::Other(_) => return None,
    };
    field_table(hardware).map(|table| (descriptions, table))
}

/// A sensor entity decoding one field of a device's status
pub struct InelsSensor {
    base: EntityBase,
    description: &'static SensorDescription,
    table: &'static FieldIndexTable,
    value: RwLock<NativeValue>,
}

impl InelsSensor {
    /// Create the entity and decode its initial value
    pub fn new(
        device: &Device,
        description: &'static SensorDescription,
        table: &'static FieldIndexTable,
    ) -> DecodeResult<Self> {
        let value = (description.value)(device, table)?;
        let sensor = Self {
            base: EntityBase::with_suffix(device, description.key, Some(description.name)),
            description,
            table,
            value: RwLock::new(value),
        };
        sensor.refresh_state();
        Ok(sensor)
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }

    pub fn native_value(&self) -> NativeValue {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh_state(&self) -> EntityState {
        let mut attributes = self.base.base_attributes(Some(self.description.icon));
        attributes.insert(
            attrs::UNIT_OF_MEASUREMENT.to_string(),
            json!(self.description.unit),
        );
        attributes.insert(
            attrs::DEVICE_CLASS.to_string(),
            json!(self.description.device_class.as_str()),
        );

        self.base.refresh(
            Platform::Sensor,
            self.native_value().to_state_string(),
            attributes,
        )
    }
}

impl InelsEntity for InelsSensor {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn device_id(&self) -> &str {
        self.base.device_id()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn handle_update(&self, device: &Device) -> Result<(), DecodeError> {
        self.base.set_device(device);
        let result = (self.description.value)(device, self.table);
        match &result {
            Ok(value) => *self.value.write().unwrap_or_else(PoisonError::into_inner) = *value,
            Err(e) => error!(
                entity = %self.base.unique_id(),
                error = %e,
                "Failed to decode sensor value"
            ),
        }
        self.refresh_state();
        result.map(|_| ())
    }

    fn state(&self) -> EntityState {
        self.base
            .current_state()
            .unwrap_or_else(|| self.refresh_state())
    }
}

/// Build sensor entities for every sensor device with known hardware
pub fn setup(devices: &[Device]) -> DecodeResult<Vec<Arc<InelsSensor>>> {
    let mut entities = Vec::new();
    for device in devices.iter().filter(|d| d.device_type == DeviceType::Sensor) {
        let Some((descriptions, table)) = resolve_descriptors(&device.hardware_type) else {
            debug!(
                device = %device.unique_id,
                hardware = %device.hardware_type,
                "No sensors for hardware type"
            );
            continue;
        };
        for description in descriptions {
            entities.push(Arc::new(InelsSensor::new(device, description, table)?));
        }
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inels_core::STATE_UNAVAILABLE;
    use inels_status::TEMP_SENSOR_DATA;
    use std::thread;
    use std::time::Duration;

    fn rfti(status: &str) -> Device {
        Device::new("rfti", "Garden", DeviceType::Sensor, HardwareType::Rfti10B).with_status(status)
    }

    fn rfti_sensor(status: &str, index: usize) -> InelsSensor {
        InelsSensor::new(
            &rfti(status),
            &SENSOR_DESCRIPTION_TEMPERATURE[index],
            &TEMP_SENSOR_DATA,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_descriptors() {
        let (set, table) = resolve_descriptors(&HardwareType::Rfti10B).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(table.name(), "temp_sensor");

        let (set, table) = resolve_descriptors(&HardwareType::Da322M).unwrap();
        assert_eq!(set[0].key, "temp_in");
        assert_eq!(table.name(), "two_channel_dimmer");

        let (gtr, gtr_table) = resolve_descriptors(&HardwareType::Gtr350).unwrap();
        let (gsb, gsb_table) = resolve_descriptors(&HardwareType::Gsb390Sx).unwrap();
        assert!(std::ptr::eq(gtr, gsb));
        assert_ne!(gtr_table.name(), gsb_table.name());

        assert!(resolve_descriptors(&HardwareType::Rfdac71B).is_none());
        assert!(resolve_descriptors(&HardwareType::Other("XYZ".into())).is_none());
    }

    #[test]
    fn test_descriptor_tables_cover_their_fields() {
        for hardware in [
            HardwareType::Rfti10B,
            HardwareType::Sa301B,
            HardwareType::Da322M,
            HardwareType::Gtr350,
            HardwareType::Gsb390Sx,
        ] {
            let (set, table) = resolve_descriptors(&hardware).unwrap();
            assert_eq!(field_table(&hardware), Some(table));
            let status = "00\n".repeat(table.min_status_len());
            let device =
                Device::new("d", "D", DeviceType::Sensor, hardware.clone()).with_status(status);
            for description in set {
                assert!(
                    (description.value)(&device, table).is_ok(),
                    "{} on {}",
                    description.key,
                    hardware
                );
            }
        }
    }

    #[test]
    fn test_sensor_state() {
        let sensor = rfti_sensor("00\n08\n86\n00\n00\n", 1);

        assert_eq!(sensor.unique_id(), "rfti-temp_in");
        assert_eq!(sensor.name(), "Garden-Temperature In");
        assert_eq!(sensor.native_value(), NativeValue::Float(343.12));

        let state = sensor.state();
        assert_eq!(state.state, "343.12");
        assert_eq!(
            state.attribute::<String>(attrs::UNIT_OF_MEASUREMENT).as_deref(),
            Some("°C")
        );
        assert_eq!(
            state.attribute::<String>(attrs::DEVICE_CLASS).as_deref(),
            Some("temperature")
        );
        assert_eq!(
            state.attribute::<String>(attrs::ICON).as_deref(),
            Some("mdi:thermometer")
        );
    }

    #[test]
    fn test_reading_state_does_not_touch_timestamps() {
        let sensor = rfti_sensor("00\n08\n86\n00\n00\n", 1);

        let first = sensor.state();
        thread::sleep(Duration::from_millis(5));
        let second = sensor.state();
        assert_eq!(first.last_updated, second.last_updated);
        assert_eq!(first.last_changed, second.last_changed);
    }

    #[test]
    fn test_change_and_revert_between_reads_is_recorded() {
        let sensor = rfti_sensor("00\n08\n86\n00\n00\n", 1);
        let before = sensor.state();

        thread::sleep(Duration::from_millis(5));
        sensor.handle_update(&rfti("00\n10\n00\n00\n00\n")).unwrap();
        thread::sleep(Duration::from_millis(5));
        sensor.handle_update(&rfti("00\n08\n86\n00\n00\n")).unwrap();

        let after = sensor.state();
        assert_eq!(after.state, before.state);
        assert!(after.last_changed > before.last_changed);
        assert!(after.last_updated > before.last_updated);
    }

    #[test]
    fn test_unchanged_update_keeps_last_changed() {
        let sensor = rfti_sensor("00\n08\n86\n00\n00\n", 1);
        let before = sensor.state();

        thread::sleep(Duration::from_millis(5));
        sensor.handle_update(&rfti("00\n08\n86\n00\n00\n")).unwrap();

        let after = sensor.state();
        assert_eq!(after.last_changed, before.last_changed);
        assert!(after.last_updated > before.last_updated);
    }

    #[test]
    fn test_handle_update_replaces_value() {
        let sensor = rfti_sensor("00\n00\n00\n00\n00\n", 0);
        assert_eq!(sensor.native_value(), NativeValue::Integer(100));

        sensor.handle_update(&rfti("01\n00\n00\n00\n00\n")).unwrap();
        assert_eq!(sensor.native_value(), NativeValue::Integer(0));
        assert_eq!(sensor.state().state, "0");

        sensor
            .handle_update(&rfti("01\n00\n00\n00\n00\n").with_available(false))
            .unwrap();
        assert_eq!(sensor.native_value(), NativeValue::Unavailable);
        assert_eq!(sensor.state().state, STATE_UNAVAILABLE);
    }

    #[test]
    fn test_handle_update_keeps_value_on_error() {
        let sensor = rfti_sensor("00\n10\n00\n00\n00\n", 1);
        let err = sensor.handle_update(&rfti("00\n")).unwrap_err();
        assert!(matches!(err, DecodeError::FieldOutOfRange { .. }));
        assert_eq!(sensor.native_value(), NativeValue::Float(0.16));
        assert_eq!(sensor.state().state, "0.16");
    }

    #[test]
    fn test_setup_skips_non_sensor_devices() {
        let devices = vec![
            rfti("00\n00\n00\n00\n00\n"),
            Device::new("lamp", "Lamp", DeviceType::Light, HardwareType::Rfdac71B),
            Device::new("x", "Unknown", DeviceType::Sensor, HardwareType::Other("X-1".into())),
        ];
        let sensors = setup(&devices).unwrap();
        let ids: Vec<&str> = sensors.iter().map(|s| s.unique_id()).collect();
        assert_eq!(ids, vec!["rfti-battery_level", "rfti-temp_in", "rfti-temp_out"]);
    }
}
