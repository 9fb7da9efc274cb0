//! Named field decoders
//!
//! Each decoder reads one logical field through the hardware's field table.
//! They share the [`DecodeFn`] signature so descriptor tables can reference
//! them directly.

use inels_core::NativeValue;

use crate::decode::{decode_battery, decode_flag, decode_numeric_field, Scale, StatusSource};
use crate::error::{DecodeError, DecodeResult};
use crate::{DataField, FieldIndexTable};

/// Signature shared by all field decoders
pub type DecodeFn = fn(&dyn StatusSource, &FieldIndexTable) -> DecodeResult<NativeValue>;

fn positions(table: &FieldIndexTable, field: DataField) -> DecodeResult<&'static [usize]> {
    table.positions(field).ok_or(DecodeError::MissingField {
        field,
        table: table.name(),
    })
}

fn scaled(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
    field: DataField,
) -> DecodeResult<NativeValue> {
    // Unavailable devices never reach the table lookup
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }
    decode_numeric_field(source, positions(table, field)?, Scale::Hundredths)
}

/// Battery level, 100 or 0
pub fn battery_level(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }
    decode_battery(source, positions(table, DataField::Battery)?)
}

/// Low-battery flag, set whenever the battery field is non-zero
pub fn battery_low(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }
    decode_flag(source, positions(table, DataField::Battery)?)
}

pub fn digital_input(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }
    decode_flag(source, positions(table, DataField::DigitalIn)?)
}

pub fn temperature_in(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::TempIn)
}

pub fn temperature_out(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::TempOut)
}

pub fn light_intensity(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::LightIn)
}

pub fn analog_temperature(
    source: &dyn StatusSource,
    table: &FieldIndexTable,
) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::Ain)
}

pub fn humidity(source: &dyn StatusSource, table: &FieldIndexTable) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::Humidity)
}

pub fn dew_point(source: &dyn StatusSource, table: &FieldIndexTable) -> DecodeResult<NativeValue> {
    scaled(source, table, DataField::DewPoint)
}
