//! Host-facing entity state

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Platform;

/// Ordered state attributes, kept in insertion order for stable presentation
pub type Attributes = IndexMap<String, serde_json::Value>;

/// The state of one entity at a point in time
///
/// Holds the displayed state string, its attributes and the timestamps for
/// when the value last changed and when it was last written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    /// Unique id of the entity (device unique id, optionally suffixed)
    pub unique_id: String,

    /// Platform the entity belongs to
    pub platform: Platform,

    /// The state value (e.g., "on", "off", "21.5", "unavailable")
    pub state: String,

    #[serde(default)]
    pub attributes: Attributes,

    /// When the state value last changed
    pub last_changed: DateTime<Utc>,

    /// When the state was last written, even if the value didn't change
    pub last_updated: DateTime<Utc>,
}

impl EntityState {
    pub fn new(
        unique_id: impl Into<String>,
        platform: Platform,
        state: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        let now = Utc::now();
        Self {
            unique_id: unique_id.into(),
            platform,
            state: state.into(),
            attributes,
            last_changed: now,
            last_updated: now,
        }
    }

    /// Create an updated state, preserving last_changed if the value is the same
    pub fn with_update(&self, new_state: impl Into<String>, new_attributes: Attributes) -> Self {
        let now = Utc::now();
        let new_state = new_state.into();
        let state_changed = self.state != new_state;

        Self {
            unique_id: self.unique_id.clone(),
            platform: self.platform,
            state: new_state,
            attributes: new_attributes,
            last_changed: if state_changed {
                now
            } else {
                self.last_changed
            },
            last_updated: now,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.state == crate::STATE_UNAVAILABLE
    }

    /// Get an attribute value by key
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl PartialEq for EntityState {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps are not compared
        self.unique_id == other.unique_id
            && self.platform == other.platform
            && self.state == other.state
            && self.attributes == other.attributes
    }
}
