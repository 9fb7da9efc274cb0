//! Device commands
//!
//! Writing a value to a device is blocking I/O owned by the device library.
//! Adapters hand each write to the blocking executor and await its result;
//! no ordering is imposed between writes.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{DeviceHub, SetValue};

/// Result type for device commands
pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("device '{unique_id}' rejected the command: {reason}")]
    Rejected { unique_id: String, reason: String },

    #[error("device '{unique_id}' not found")]
    DeviceNotFound { unique_id: String },

    #[error("executor failed to run the command: {reason}")]
    ExecutorFailed { reason: String },
}

/// Blocking sink for device writes
pub trait DeviceCommander: Send + Sync + 'static {
    fn set_value(&self, unique_id: &str, value: SetValue) -> CommandResult<()>;
}

/// Run a write on the blocking executor and wait for it to finish
pub async fn submit(
    commander: Arc<dyn DeviceCommander>,
    unique_id: String,
    value: SetValue,
) -> CommandResult<()> {
    debug!(device = %unique_id, ?value, "Submitting device command");
    let result = tokio::task::spawn_blocking(move || commander.set_value(&unique_id, value))
        .await
        .map_err(|e| CommandError::ExecutorFailed {
            reason: e.to_string(),
        })?;

    if let Err(e) = &result {
        warn!(error = %e, "Device command failed");
    }
    result
}

/// Commander that applies writes straight to the hub's snapshot
///
/// Stands in for a device that echoes every accepted write back as its new
/// state, which is what the bus does for the supported actuators.
pub struct LoopbackCommander {
    hub: Arc<DeviceHub>,
}

impl LoopbackCommander {
    pub fn new(hub: Arc<DeviceHub>) -> Self {
        Self { hub }
    }
}

impl DeviceCommander for LoopbackCommander {
    fn set_value(&self, unique_id: &str, value: SetValue) -> CommandResult<()> {
        let Some(device) = self.hub.get(unique_id) else {
            return Err(CommandError::DeviceNotFound {
                unique_id: unique_id.to_string(),
            });
        };
        if !device.available {
            return Err(CommandError::Rejected {
                unique_id: unique_id.to_string(),
                reason: "device is unavailable".to_string(),
            });
        }

        self.hub.update(unique_id, |device| device.apply(&value));
        Ok(())
    }
}
