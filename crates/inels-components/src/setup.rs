//! Platform setup for a set of devices

use inels_core::EntityState;
use inels_device::{DeviceCommander, DeviceHub, ListenerId};
use inels_status::DecodeResult;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entity::{InelsEntity, ToggleEntity};
use crate::{binary_sensor, light, sensor, switch};
use crate::{InelsBinarySensor, InelsLight, InelsLightChannel, InelsSensor, InelsSwitch};

/// Entities created for a hub, grouped by platform
pub struct InelsPlatforms {
    pub sensors: Vec<Arc<InelsSensor>>,
    pub binary_sensors: Vec<Arc<InelsBinarySensor>>,
    pub lights: Vec<Arc<InelsLight>>,
    pub light_channels: Vec<Arc<InelsLightChannel>>,
    pub switches: Vec<Arc<InelsSwitch>>,
    listeners: Vec<ListenerId>,
}

/// Create every platform's entities and subscribe them to their devices
#[instrument(skip_all, fields(devices = hub.device_count()))]
pub fn setup_entry(
    hub: &DeviceHub,
    commander: Arc<dyn DeviceCommander>,
) -> DecodeResult<InelsPlatforms> {
    let devices = hub.devices();

    let sensors = sensor::setup(&devices)?;
    let binary_sensors = binary_sensor::setup(&devices)?;
    let (lights, light_channels) = light::setup(&devices, &commander);
    let switches = switch::setup(&devices, &commander);

    let mut platforms = InelsPlatforms {
        sensors,
        binary_sensors,
        lights,
        light_channels,
        switches,
        listeners: Vec::new(),
    };

    for entity in platforms.entities() {
        let device_id = entity.device_id().to_string();
        let listener = hub.subscribe(device_id, move |device| {
            // Decode errors are logged by the entity
            let _ = entity.handle_update(device);
        });
        platforms.listeners.push(listener);
    }

    info!(
        sensors = platforms.sensors.len(),
        binary_sensors = platforms.binary_sensors.len(),
        lights = platforms.lights.len() + platforms.light_channels.len(),
        switches = platforms.switches.len(),
        "Set up iNELS platforms"
    );
    Ok(platforms)
}

impl InelsPlatforms {
    /// All entities, in platform order
    pub fn entities(&self) -> Vec<Arc<dyn InelsEntity>> {
        let mut entities: Vec<Arc<dyn InelsEntity>> = Vec::with_capacity(self.len());
        entities.extend(self.binary_sensors.iter().map(|e| e.clone() as Arc<dyn InelsEntity>));
        entities.extend(self.lights.iter().map(|e| e.clone() as Arc<dyn InelsEntity>));
        entities.extend(self.light_channels.iter().map(|e| e.clone() as Arc<dyn InelsEntity>));
        entities.extend(self.sensors.iter().map(|e| e.clone() as Arc<dyn InelsEntity>));
        entities.extend(self.switches.iter().map(|e| e.clone() as Arc<dyn InelsEntity>));
        entities
    }

    /// Entities that accept on/off commands
    pub fn toggles(&self) -> Vec<Arc<dyn ToggleEntity>> {
        let mut toggles: Vec<Arc<dyn ToggleEntity>> = Vec::new();
        toggles.extend(self.lights.iter().map(|e| e.clone() as Arc<dyn ToggleEntity>));
        toggles.extend(self.light_channels.iter().map(|e| e.clone() as Arc<dyn ToggleEntity>));
        toggles.extend(self.switches.iter().map(|e| e.clone() as Arc<dyn ToggleEntity>));
        toggles
    }

    pub fn entity(&self, unique_id: &str) -> Option<Arc<dyn InelsEntity>> {
        self.entities().into_iter().find(|e| e.unique_id() == unique_id)
    }

    pub fn toggle(&self, unique_id: &str) -> Option<Arc<dyn ToggleEntity>> {
        self.toggles().into_iter().find(|e| e.unique_id() == unique_id)
    }

    /// Current state of every entity
    pub fn states(&self) -> Vec<EntityState> {
        self.entities().iter().map(|e| e.state()).collect()
    }

    pub fn state(&self, unique_id: &str) -> Option<EntityState> {
        self.entity(unique_id).map(|e| e.state())
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
            + self.binary_sensors.len()
            + self.lights.len()
            + self.light_channels.len()
            + self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach every entity from the hub
    pub fn unload(&self, hub: &DeviceHub) {
        for listener in &self.listeners {
            hub.unsubscribe(*listener);
        }
    }
}
