//! Recording command sink

use inels_device::{CommandError, CommandResult, DeviceCommander, SetValue};
use std::sync::Mutex;

/// Commander that records every write instead of sending it
#[derive(Debug, Default)]
pub struct MockCommander {
    sent: Mutex<Vec<(String, SetValue)>>,
    reject: bool,
}

impl MockCommander {
    pub fn new() -> Self {
        Self::default()
    }

    /// A commander whose device rejects every write
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, SetValue)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(String, SetValue)> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl DeviceCommander for MockCommander {
    fn set_value(&self, unique_id: &str, value: SetValue) -> CommandResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((unique_id.to_string(), value));
        if self.reject {
            return Err(CommandError::Rejected {
                unique_id: unique_id.to_string(),
                reason: "rejected by mock".to_string(),
            });
        }
        Ok(())
    }
}
