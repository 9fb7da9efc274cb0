//! Light platform
//!
//! Device levels are 0..=100; the host works in brightness 0..=255.

use async_trait::async_trait;
use inels_core::units::{ColorMode, ICON_LIGHT};
use inels_core::{
    attrs, Attributes, DeviceType, EntityState, HardwareType, Platform, STATE_OFF, STATE_ON,
};
use inels_device::{submit, CommandResult, Device, DeviceCommander, SetValue};
use inels_status::DecodeError;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::entity::{EntityBase, InelsEntity, ToggleEntity, TurnOffParams, TurnOnParams};

const LEVEL_MAX: u8 = 100;
const BRIGHTNESS_SCALE: f64 = 2.55;

/// Device level to host brightness
pub fn level_to_brightness(level: u8) -> u8 {
    (f64::from(level) * BRIGHTNESS_SCALE).round().min(255.0) as u8
}

/// Host brightness to device level, truncating
pub fn brightness_to_level(brightness: u8) -> u8 {
    ((f64::from(brightness) / BRIGHTNESS_SCALE) as u8).min(LEVEL_MAX)
}

fn color_modes(brightness: bool) -> Vec<&'static str> {
    let mode = if brightness {
        ColorMode::Brightness
    } else {
        ColorMode::OnOff
    };
    vec![mode.as_str()]
}

/// Host brightness for a level, `None` when the light is off or not dimmable
fn brightness_for(supports_brightness: bool, level: u8) -> Option<u8> {
    (supports_brightness && level > 0).then(|| level_to_brightness(level))
}

fn light_attributes(base: &EntityBase, supports_brightness: bool, level: u8) -> Attributes {
    let mut attributes = base.base_attributes(Some(ICON_LIGHT));
    attributes.insert(
        attrs::SUPPORTED_COLOR_MODES.to_string(),
        json!(color_modes(supports_brightness)),
    );
    if let Some(brightness) = brightness_for(supports_brightness, level) {
        attributes.insert(attrs::BRIGHTNESS.to_string(), json!(brightness));
    }
    attributes
}

fn on_off(on: bool) -> String {
    let state = if on { STATE_ON } else { STATE_OFF };
    state.to_string()
}

/// Single-output light
pub struct InelsLight {
    base: EntityBase,
    commander: Arc<dyn DeviceCommander>,
    supports_brightness: bool,
}

impl InelsLight {
    pub fn new(device: &Device, commander: Arc<dyn DeviceCommander>) -> Self {
        let light = Self {
            base: EntityBase::new(device),
            commander,
            supports_brightness: device.hardware_type == HardwareType::Rfdac71B,
        };
        light.refresh_state();
        light
    }

    fn level(&self) -> u8 {
        self.base.device().level().unwrap_or(0)
    }

    /// Host brightness, only for dimmable hardware that is on
    pub fn brightness(&self) -> Option<u8> {
        brightness_for(self.supports_brightness, self.level())
    }

    pub fn supports_brightness(&self) -> bool {
        self.supports_brightness
    }

    fn refresh_state(&self) -> EntityState {
        let level = self.level();
        let attributes = light_attributes(&self.base, self.supports_brightness, level);
        self.base
            .refresh(Platform::Light, on_off(level > 0), attributes)
    }
}

impl InelsEntity for InelsLight {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn platform(&self) -> Platform {
        Platform::Light
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
impl ToggleEntity for InelsLight {
    fn is_on(&self) -> bool {
        self.level() > 0
    }

    async fn turn_on(&self, params: TurnOnParams) -> CommandResult<()> {
        let level = params.brightness.map(brightness_to_level).unwrap_or(LEVEL_MAX);
        submit(
            self.commander.clone(),
            self.base.device_id().to_string(),
            SetValue::Level(level),
        )
        .await
    }

    async fn turn_off(&self, params: TurnOffParams) -> CommandResult<()> {
        if let Some(transition) = params.transition {
            debug!(
                entity = %self.base.unique_id(),
                transition,
                "Transition not supported, switching off"
            );
        }
        submit(
            self.commander.clone(),
            self.base.device_id().to_string(),
            SetValue::Level(0),
        )
        .await
    }
}

/// Which channel of a multi-channel dimmer an entity drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightChannelDescription {
    pub channel_number: usize,
    pub channel_index: usize,
}

impl LightChannelDescription {
    pub const fn new(channel_number: usize, channel_index: usize) -> Self {
        Self {
            channel_number,
            channel_index,
        }
    }
}

/// One output of a two-channel dimmer
pub struct InelsLightChannel {
    base: EntityBase,
    description: LightChannelDescription,
    commander: Arc<dyn DeviceCommander>,
    supports_brightness: bool,
}

impl InelsLightChannel {
    pub fn new(
        device: &Device,
        description: LightChannelDescription,
        commander: Arc<dyn DeviceCommander>,
    ) -> Self {
        let index = description.channel_index.to_string();
        let base = EntityBase::with_suffix(device, &index, Some(&index));
        let channel = Self {
            base,
            description,
            commander,
            supports_brightness: device.hardware_type == HardwareType::Da322M,
        };
        channel.refresh_state();
        channel
    }

    pub fn description(&self) -> LightChannelDescription {
        self.description
    }

    fn level(&self) -> u8 {
        self.base
            .device()
            .channels()
            .and_then(|channels| channels.get(self.description.channel_index).copied())
            .unwrap_or(0)
    }

    pub fn brightness(&self) -> Option<u8> {
        brightness_for(self.supports_brightness, self.level())
    }

    fn refresh_state(&self) -> EntityState {
        let level = self.level();
        let attributes = light_attributes(&self.base, self.supports_brightness, level);
        self.base
            .refresh(Platform::Light, on_off(level > 0), attributes)
    }

    /// Current channel vector with this channel's slot replaced
    fn channels_with(&self, level: u8) -> Vec<u8> {
        let mut channels = self
            .base
            .device()
            .channels()
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        let len = channels
            .len()
            .max(self.description.channel_number)
            .max(self.description.channel_index + 1);
        channels.resize(len, 0);
        channels[self.description.channel_index] = level;
        channels
    }
}

impl InelsEntity for InelsLightChannel {
    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn platform(&self) -> Platform {
        Platform::Light
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
impl ToggleEntity for InelsLightChannel {
    fn is_on(&self) -> bool {
        self.level() > 0
    }

    async fn turn_on(&self, params: TurnOnParams) -> CommandResult<()> {
        let level = params.brightness.map(brightness_to_level).unwrap_or(LEVEL_MAX);
        submit(
            self.commander.clone(),
            self.base.device_id().to_string(),
            SetValue::Channels(self.channels_with(level)),
        )
        .await
    }

    async fn turn_off(&self, params: TurnOffParams) -> CommandResult<()> {
        if let Some(transition) = params.transition {
            debug!(
                entity = %self.base.unique_id(),
                transition,
                "Transition not supported, switching off"
            );
        }
        submit(
            self.commander.clone(),
            self.base.device_id().to_string(),
            SetValue::Channels(self.channels_with(0)),
        )
        .await
    }
}

/// Channels per two-channel dimmer
const DIMMER_CHANNELS: usize = 2;

pub fn setup(
    devices: &[Device],
    commander: &Arc<dyn DeviceCommander>,
) -> (Vec<Arc<InelsLight>>, Vec<Arc<InelsLightChannel>>) {
    let mut lights = Vec::new();
    let mut channels = Vec::new();

    for device in devices {
        match device.device_type {
            DeviceType::Light => lights.push(Arc::new(InelsLight::new(device, commander.clone()))),
            DeviceType::TwoChannelDimmer => {
                for index in 0..DIMMER_CHANNELS {
                    channels.push(Arc::new(InelsLightChannel::new(
                        device,
                        LightChannelDescription::new(DIMMER_CHANNELS, index),
                        commander.clone(),
                    )));
                }
            }
            DeviceType::Sensor | DeviceType::Switch | DeviceType::Bus => {}
        }
    }
    (lights, channels)
}
