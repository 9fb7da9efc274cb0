//! Switch platform

use async_trait::async_trait;
use inels_core::units::ICON_SWITCH;
use inels_core::{DeviceType, EntityState, HardwareType, Platform, STATE_OFF, STATE_ON};
use inels_device::{submit, CommandResult, Device, DeviceCommander, SetValue, SwitchState};
use inels_status::DecodeError;
use std::sync::Arc;
use tracing::debug;

use crate::entity::{EntityBase, InelsEntity, ToggleEntity, TurnOffParams, TurnOnParams};

pub struct InelsSwitch {
    base: EntityBase,
    commander: Arc<dyn DeviceCommander>,
}

impl InelsSwitch {
    pub fn new(device: &Device, commander: Arc<dyn DeviceCommander>) -> Self {
        let switch = Self {
            base: EntityBase::new(device),
            commander,
        };
        switch.refresh_state();
        switch
    }

    /// Whether setup should create a switch for this device
    pub fn handles(device: &Device) -> bool {
        match device.device_type {
            DeviceType::Switch => true,
            DeviceType::Bus => device.hardware_type == HardwareType::Sa301B,
            DeviceType::Sensor | DeviceType::Light | DeviceType::TwoChannelDimmer => false,
        }
    }

    async fn set(&self, on: bool) -> CommandResult<()> {
        if !self.base.available() {
            debug!(entity = %self.base.unique_id(), "Device unavailable, ignoring command");
            return Ok(());
        }
        submit(
            self.commander.clone(),
            self.base.device_id().to_string(),
            SetValue::On(on),
        )
        .await
    }

    fn refresh_state(&self) -> EntityState {
        let device = self.base.device();
        let mut attributes = self.base.base_attributes(Some(ICON_SWITCH));

        // Feature readings are published even when the device has no switch state yet
        let switch_state = device.switch_state().cloned().unwrap_or_default();
        for feature in &device.features {
            attributes.insert(feature.name().to_string(), feature.read(&switch_state));
        }

        let state = if switch_state.on { STATE_ON } else { STATE_OFF };
        self.base
            .refresh(Platform::Switch, state.to_string(), attributes)
    }
}

impl InelsEntity for InelsSwitch {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn platform(&self) -> Platform {
        Platform::Switch
    }

    fn device_id(&self) -> &str {
        self.base.device_id()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn handle_update(&self, device: &Device) -> Result<(), DecodeError> {
        self.base.set_device(device);
        self.refresh_state();
        Ok(())
    }

    fn state(&self) -> EntityState {
        self.base
            .current_state()
            .unwrap_or_else(|| self.refresh_state())
    }
}

#[async_trait]
impl ToggleEntity for InelsSwitch {
    fn is_on(&self) -> bool {
        self.base
            .device()
            .switch_state()
            .map(|state: &SwitchState| state.on)
            .unwrap_or(false)
    }

    async fn turn_on(&self, _params: TurnOnParams) -> CommandResult<()> {
        self.set(true).await
    }

    async fn turn_off(&self, _params: TurnOffParams) -> CommandResult<()> {
        self.set(false).await
    }
}

pub fn setup(devices: &[Device], commander: &Arc<dyn DeviceCommander>) -> Vec<Arc<InelsSwitch>> {
    devices
        .iter()
        .filter(|device| InelsSwitch::handles(device))
        .map(|device| Arc::new(InelsSwitch::new(device, commander.clone())))
        .collect()
}
