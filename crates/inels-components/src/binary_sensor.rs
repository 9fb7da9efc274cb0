//! Binary sensor platform

use inels_core::units::{BinarySensorDeviceClass, ICON_BATTERY};
use inels_core::{
    attrs, DeviceType, EntityState, HardwareType, NativeValue, Platform, STATE_OFF, STATE_ON,
};
use inels_device::Device;
use inels_status::{
    battery_low, digital_input, field_table, DecodeError, DecodeFn, DecodeResult, FieldIndexTable,
};
use serde_json::json;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::error;

use crate::entity::{EntityBase, InelsEntity};

pub struct BinarySensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub device_class: Option<BinarySensorDeviceClass>,
    pub icon: Option<&'static str>,
    pub value: DecodeFn,
}

pub static BINARY_SENSOR_DESCRIPTION_BATTERY: [BinarySensorDescription; 1] =
    [BinarySensorDescription {
        key: "battery_low",
        name: "Battery low",
        device_class: Some(BinarySensorDeviceClass::Battery),
        icon: Some(ICON_BATTERY),
        value: battery_low,
    }];

pub static BINARY_SENSOR_DESCRIPTION_DIGITAL_INPUT: [BinarySensorDescription; 1] =
    [BinarySensorDescription {
        key: "digital_input",
        name: "Digital input",
        device_class: None,
        icon: None,
        value: digital_input,
    }];

/// Binary descriptor set and field table for a hardware type
pub fn resolve_binary_descriptors(
    hardware: &HardwareType,
) -> Option<(&'static [BinarySensorDescription], &'static FieldIndexTable)> {
    let descriptions: &'static [BinarySensorDescription] = match hardware {
        HardwareType::Rfti10B => &BINARY_SENSOR_DESCRIPTION_BATTERY,
        HardwareType::Gtr350 => &BINARY_SENSOR_DESCRIPTION_DIGITAL_INPUT,
        HardwareType::Sa301B
        | HardwareType::Da322M
        | HardwareType::Gsb390Sx
        | HardwareType::Rfdac71B
        | HardwareType::Other(_) => return None,
    };
    field_table(hardware).map(|table| (descriptions, table))
}

pub struct InelsBinarySensor {
    base: EntityBase,
    description: &'static BinarySensorDescription,
    table: &'static FieldIndexTable,
    value: RwLock<NativeValue>,
}

impl InelsBinarySensor {
    pub fn new(
        device: &Device,
        description: &'static BinarySensorDescription,
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

    /// None while the device is unavailable
    pub fn is_on(&self) -> Option<bool> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_bool()
    }

    fn refresh_state(&self) -> EntityState {
        let mut attributes = self.base.base_attributes(self.description.icon);
        if let Some(class) = self.description.device_class {
            attributes.insert(attrs::DEVICE_CLASS.to_string(), json!(class.as_str()));
        }

        let state = if self.is_on() == Some(true) {
            STATE_ON
        } else {
            STATE_OFF
        };
        self.base
            .refresh(Platform::BinarySensor, state.to_string(), attributes)
    }
}

impl InelsEntity for InelsBinarySensor {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn platform(&self) -> Platform {
        Platform::BinarySensor
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
                "Failed to decode binary sensor"
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

pub fn setup(devices: &[Device]) -> DecodeResult<Vec<Arc<InelsBinarySensor>>> {
    let mut entities = Vec::new();
    for device in devices.iter().filter(|d| d.device_type == DeviceType::Sensor) {
        if let Some((descriptions, table)) = resolve_binary_descriptors(&device.hardware_type) {
            for description in descriptions {
                entities.push(Arc::new(InelsBinarySensor::new(device, description, table)?));
            }
        }
    }
    Ok(entities)
}
