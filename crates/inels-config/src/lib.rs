//! YAML configuration for the iNELS bridge
//!
//! Files are plain YAML with three custom tags:
//!
//! - `!include path` - Include another YAML file, relative to the including file
//! - `!secret key` - Substitute from secrets.yaml in the config directory
//! - `!env_var VAR` - Substitute an environment variable
//!
//! # Example
//!
//! ```ignore
//! use inels_config::load_config;
//!
//! let config = load_config("/config", "inels.yaml")?;
//! for device in config.devices() {
//!     println!("{}", device.unique_id);
//! }
//! ```

mod config;
mod error;
mod loader;
mod secrets;

pub use config::{load_config, DeviceConfig, InelsConfig, LoggerConfig, MqttConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, load_yaml_string, YamlLoader};
pub use secrets::Secrets;

pub use serde_yaml::Value;
