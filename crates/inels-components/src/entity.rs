//! Shared entity behaviour

use async_trait::async_trait;
use inels_core::{attrs, Attributes, EntityState, Platform, STATE_UNAVAILABLE};
use inels_device::{CommandResult, Device};
use inels_status::DecodeError;
use serde_json::json;
use std::sync::{PoisonError, RwLock};

/// An entity backed by one iNELS device
pub trait InelsEntity: Send + Sync {
    fn unique_id(&self) -> &str;

    fn name(&self) -> &str;

    fn platform(&self) -> Platform;

    /// Unique id of the device this entity follows
    fn device_id(&self) -> &str;

    fn available(&self) -> bool;

    /// Refresh from a new device snapshot
    ///
    /// The cached value is replaced unconditionally. On a decode error the
    /// previous value is kept and the error is returned.
    fn handle_update(&self, device: &Device) -> Result<(), DecodeError>;

    /// Current host-facing state
    fn state(&self) -> EntityState;
}

/// Arguments to a turn-on command
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnOnParams {
    /// Host brightness, 0..=255
    pub brightness: Option<u8>,
}

/// Arguments to a turn-off command
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnOffParams {
    /// Requested transition in seconds
    pub transition: Option<f64>,
}

/// An entity that can be switched on and off
#[async_trait]
pub trait ToggleEntity: InelsEntity {
    fn is_on(&self) -> bool;

    async fn turn_on(&self, params: TurnOnParams) -> CommandResult<()>;

    async fn turn_off(&self, params: TurnOffParams) -> CommandResult<()>;
}

/// Identity, device snapshot and last published state shared by all adapters
pub struct EntityBase {
    unique_id: String,
    name: String,
    device_id: String,
    device: RwLock<Device>,
    last_state: RwLock<Option<EntityState>>,
}

impl EntityBase {
    /// Entity named after its device
    pub fn new(device: &Device) -> Self {
        Self::with_ids(device, device.unique_id.clone(), device.title.clone())
    }

    /// Entity for one facet of a device: `"{id}-{key}"`, named `"{title}-{name}"`
    pub fn with_suffix(device: &Device, key: &str, name: Option<&str>) -> Self {
        let unique_id = format!("{}-{}", device.unique_id, key);
        let name = match name {
            Some(name) if !name.is_empty() => format!("{}-{}", device.title, name),
            _ => device.title.clone(),
        };
        Self::with_ids(device, unique_id, name)
    }

    fn with_ids(device: &Device, unique_id: String, name: String) -> Self {
        Self {
            unique_id,
            name,
            device_id: device.unique_id.clone(),
            device: RwLock::new(device.clone()),
            last_state: RwLock::new(None),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// A copy of the latest device snapshot
    pub fn device(&self) -> Device {
        self.device
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_device(&self, device: &Device) {
        *self.device.write().unwrap_or_else(PoisonError::into_inner) = device.clone();
    }

    pub fn available(&self) -> bool {
        self.device
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .available
    }

    /// Attributes every entity carries
    pub fn base_attributes(&self, icon: Option<&str>) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(attrs::FRIENDLY_NAME.to_string(), json!(self.name));
        if let Some(icon) = icon {
            attributes.insert(attrs::ICON.to_string(), json!(icon));
        }
        attributes
    }

    /// Recompute the published state, keeping last_changed when the value is unchanged
    ///
    /// Called on construction and on every device notification. Reads go
    /// through [`EntityBase::current_state`] and never move the timestamps.
    pub fn refresh(
        &self,
        platform: Platform,
        state: String,
        attributes: Attributes,
    ) -> EntityState {
        let state = if self.available() {
            state
        } else {
            STATE_UNAVAILABLE.to_string()
        };

        let mut last = self
            .last_state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let new_state = match last.as_ref() {
            Some(previous) => previous.with_update(state, attributes),
            None => EntityState::new(self.unique_id.clone(), platform, state, attributes),
        };
        *last = Some(new_state.clone());
        new_state
    }

    /// The state published by the last refresh
    pub fn current_state(&self) -> Option<EntityState> {
        self.last_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inels_core::{DeviceType, HardwareType};

    fn device() -> Device {
        Device::new("0a1b", "Bedroom", DeviceType::Sensor, HardwareType::Rfti10B)
    }

    #[test]
    fn test_identity() {
        let base = EntityBase::new(&device());
        assert_eq!(base.unique_id(), "0a1b");
        assert_eq!(base.name(), "Bedroom");

        let base = EntityBase::with_suffix(&device(), "temp_in", Some("Temperature In"));
        assert_eq!(base.unique_id(), "0a1b-temp_in");
        assert_eq!(base.name(), "Bedroom-Temperature In");
        assert_eq!(base.device_id(), "0a1b");

        let base = EntityBase::with_suffix(&device(), "1", None);
        assert_eq!(base.name(), "Bedroom");
    }

    #[test]
    fn test_unavailable_overrides_state() {
        let base = EntityBase::new(&device().with_available(false));
        let state = base.refresh(Platform::Sensor, "21.5".to_string(), Attributes::new());
        assert!(state.is_unavailable());
    }

    #[test]
    fn test_refresh_keeps_last_changed() {
        let base = EntityBase::new(&device());
        assert!(base.current_state().is_none());

        let first = base.refresh(Platform::Sensor, "1".to_string(), Attributes::new());
        let second = base.refresh(Platform::Sensor, "1".to_string(), Attributes::new());
        assert_eq!(first.last_changed, second.last_changed);
        assert_eq!(base.current_state().unwrap().last_updated, second.last_updated);
    }

    #[test]
    fn test_refresh_records_every_change() {
        let base = EntityBase::new(&device());
        let first = base.refresh(Platform::Sensor, "1".to_string(), Attributes::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        base.refresh(Platform::Sensor, "2".to_string(), Attributes::new());
        let back = base.refresh(Platform::Sensor, "1".to_string(), Attributes::new());
        assert!(back.last_changed > first.last_changed);
    }
}
