//! Device state-change source
//!
//! The hub keeps the latest snapshot of every device and notifies
//! subscribers when a device publishes a new one. Delivery is synchronous,
//! in the publisher's thread, in subscription order. There is no
//! back-pressure: the last published snapshot wins.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, instrument, trace};

use crate::Device;

/// Default channel capacity for snapshot streams
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A unique identifier for a device listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with the new snapshot of a device
pub type DeviceCallback = Arc<dyn Fn(&Device) + Send + Sync>;

pub struct DeviceHub {
    /// Latest snapshot per device unique id
    devices: DashMap<String, Device>,
    /// Per-device callbacks, in subscription order
    listeners: DashMap<String, Vec<(ListenerId, DeviceCallback)>>,
    /// Every published snapshot, for observers of all devices
    stream: broadcast::Sender<Device>,
    next_listener_id: AtomicU64,
}

impl DeviceHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (stream, _) = broadcast::channel(capacity);
        Self {
            devices: DashMap::new(),
            listeners: DashMap::new(),
            stream,
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to state changes of one device
    pub fn subscribe<F>(&self, unique_id: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&Device) + Send + Sync + 'static,
    {
        let unique_id = unique_id.into();
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::SeqCst));
        trace!(device = %unique_id, listener = id.0, "Subscribing to device");

        self.listeners
            .entry(unique_id)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut removed = false;
        for mut entry in self.listeners.iter_mut() {
            let before = entry.value().len();
            entry.value_mut().retain(|(listener, _)| *listener != id);
            removed |= entry.value().len() != before;
        }
        removed
    }

    /// Receive every snapshot published to the hub
    pub fn subscribe_all(&self) -> broadcast::Receiver<Device> {
        self.stream.subscribe()
    }

    /// Store a new snapshot and notify the device's subscribers
    #[instrument(skip(self, device), fields(device = %device.unique_id))]
    pub fn publish(&self, device: Device) {
        debug!(available = device.available, "Publishing device state");
        self.devices.insert(device.unique_id.clone(), device.clone());
        self.notify(device);
    }

    /// Mutate the stored snapshot of a device in place and publish the result
    ///
    /// Returns false if the device is unknown.
    #[instrument(skip(self, f))]
    pub fn update(&self, unique_id: &str, f: impl FnOnce(&mut Device)) -> bool {
        let device = {
            let Some(mut entry) = self.devices.get_mut(unique_id) else {
                return false;
            };
            f(entry.value_mut());
            entry.value().clone()
        };
        debug!(available = device.available, "Updated device state");
        self.notify(device);
        true
    }

    fn notify(&self, device: Device) {
        // Clone the callbacks out so no map guard is held while they run
        let callbacks: Vec<DeviceCallback> = self
            .listeners
            .get(&device.unique_id)
            .map(|l| l.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();

        for callback in callbacks {
            callback(&device);
        }

        // No receivers is not an error
        let _ = self.stream.send(device);
    }

    /// Mark a device available or unavailable
    pub fn set_available(&self, unique_id: &str, available: bool) -> bool {
        self.update(unique_id, |device| device.available = available)
    }

    pub fn get(&self, unique_id: &str) -> Option<Device> {
        self.devices.get(unique_id).map(|d| d.clone())
    }

    /// All device snapshots, ordered by unique id
    pub fn devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.iter().map(|r| r.value().clone()).collect();
        devices.sort_by(|a, b| a.unique_id.cmp(&b.unique_id));
        devices
    }

    /// Number of listeners registered for a device
    pub fn listener_count(&self, unique_id: &str) -> usize {
        self.listeners.get(unique_id).map(|l| l.len()).unwrap_or(0)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl Default for DeviceHub {
    fn default() -> Self {
        Self::new()
    }
}
