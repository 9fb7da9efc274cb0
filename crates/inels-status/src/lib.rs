//! Status decoding for iNELS devices
//!
//! iNELS devices report their state as a newline-delimited dump of hex
//! tokens, one token per field slot. The layout is fixed per hardware
//! family, so each family has a [`FieldIndexTable`] naming which token
//! positions, concatenated in order, form each logical field.
//!
//! # Example
//!
//! ```
//! use inels_status::{extract_field, parse_field, RawStatus};
//!
//! let status = RawStatus::parse("00\n00\n00\n00\n86\n08\n");
//! assert_eq!(extract_field(&status, &[4, 5]).unwrap(), "0x8608");
//! assert_eq!(parse_field(&status, &[4, 5]).unwrap(), 34312);
//! ```

mod decode;
mod decoders;
mod error;
mod field;
mod raw;

pub use decode::{
    decode_battery, decode_flag, decode_numeric_field, extract_field, parse_field, Scale,
    StatusSource,
};
pub use decoders::{
    analog_temperature, battery_level, battery_low, dew_point, digital_input, humidity,
    light_intensity, temperature_in, temperature_out, DecodeFn,
};
pub use error::{DecodeError, DecodeResult};
pub use field::{
    field_table, DataField, FieldIndexTable, BUTTONARRAY_DATA, RELAY_DATA, TEMP_SENSOR_DATA,
    THERMOSTAT_DATA, TWOCHANNELDIMMER_DATA,
};
pub use raw::RawStatus;

/// Prefix marking an extracted field as a hexadecimal literal
pub const HEX_PREFIX: &str = "0x";
