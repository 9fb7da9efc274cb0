//! Decoded entity values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{STATE_OFF, STATE_ON, STATE_UNAVAILABLE};

/// A value decoded from a device, ready for presentation
///
/// `Unavailable` is distinct from any numeric zero: it means the device
/// itself was unavailable and nothing was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeValue {
    Unavailable,
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl NativeValue {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NativeValue::Unavailable)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::Integer(i) => Some(*i as f64),
            NativeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The state string the host displays for this value
    pub fn to_state_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Unavailable => f.write_str(STATE_UNAVAILABLE),
            NativeValue::Integer(i) => write!(f, "{}", i),
            NativeValue::Float(v) => write!(f, "{}", v),
            NativeValue::Bool(true) => f.write_str(STATE_ON),
            NativeValue::Bool(false) => f.write_str(STATE_OFF),
        }
    }
}
