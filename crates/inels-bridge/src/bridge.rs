//! Hub, commander and platforms wired together

use anyhow::{Context, Result};
use inels_components::{setup_entry, InelsPlatforms};
use inels_config::InelsConfig;
use inels_core::EntityState;
use inels_device::{DeviceCommander, DeviceHub, LoopbackCommander};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Bridge {
    hub: Arc<DeviceHub>,
    platforms: Arc<InelsPlatforms>,
}

impl Bridge {
    /// Seed the hub with the configured devices and set up every platform
    pub fn start(config: &InelsConfig) -> Result<Self> {
        let hub = Arc::new(DeviceHub::new());
        for device in config.devices() {
            hub.publish(device);
        }

        let commander: Arc<dyn DeviceCommander> = Arc::new(LoopbackCommander::new(hub.clone()));
        let platforms = setup_entry(&hub, commander).context("setting up iNELS platforms")?;

        for state in platforms.states() {
            log_state(&state);
        }

        Ok(Self {
            hub,
            platforms: Arc::new(platforms),
        })
    }

    pub fn hub(&self) -> &Arc<DeviceHub> {
        &self.hub
    }

    pub fn platforms(&self) -> &InelsPlatforms {
        &self.platforms
    }

    pub fn entity_count(&self) -> usize {
        self.platforms.len()
    }

    /// Log the entities of every device that publishes a new snapshot
    ///
    /// The bridge keeps the hub alive, so this runs until its task is aborted.
    pub async fn watch(self) {
        let mut rx = self.hub.subscribe_all();
        loop {
            match rx.recv().await {
                Ok(device) => {
                    debug!(device = %device.unique_id, "Device updated");
                    for entity in self.platforms.entities() {
                        if entity.device_id() == device.unique_id {
                            log_state(&entity.state());
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "State watcher lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub fn stop(&self) {
        self.platforms.unload(&self.hub);
    }
}

fn log_state(state: &EntityState) {
    info!(
        entity = %state.unique_id,
        platform = %state.platform,
        state = %state.state,
        attributes = %serde_json::Value::Object(state.attributes.clone().into_iter().collect()),
        "Entity state"
    );
}
