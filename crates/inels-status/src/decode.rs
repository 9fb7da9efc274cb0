//! Positional hex-field extraction and numeric decoding

use inels_core::NativeValue;
use tracing::trace;

use crate::error::{DecodeError, DecodeResult};
use crate::{RawStatus, HEX_PREFIX};

/// Anything that carries a raw status and an availability flag
pub trait StatusSource {
    fn is_available(&self) -> bool;

    fn raw_status(&self) -> &RawStatus;
}

/// A bare status is always considered available
impl StatusSource for RawStatus {
    fn is_available(&self) -> bool {
        true
    }

    fn raw_status(&self) -> &RawStatus {
        self
    }
}

/// Fixed-point scale applied to a parsed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Integer fields, divided by 1
    Raw,
    /// Physical quantities transmitted in hundredths
    Hundredths,
}

impl Scale {
    pub fn divisor(&self) -> f64 {
        match self {
            Scale::Raw => 1.0,
            Scale::Hundredths => 100.0,
        }
    }
}

/// Concatenate the tokens at `positions`, in order, into a `0x` literal
pub fn extract_field(status: &RawStatus, positions: &[usize]) -> DecodeResult<String> {
    if positions.is_empty() {
        return Err(DecodeError::EmptyField);
    }

    let mut literal = String::with_capacity(HEX_PREFIX.len() + positions.len() * 2);
    literal.push_str(HEX_PREFIX);
    for &position in positions {
        let token = status.get(position).ok_or(DecodeError::FieldOutOfRange {
            position,
            len: status.len(),
        })?;
        literal.push_str(token);
    }

    trace!(?positions, %literal, "Extracted field");
    Ok(literal)
}

/// Extract a field and parse it as a base-16 integer
pub fn parse_field(status: &RawStatus, positions: &[usize]) -> DecodeResult<u64> {
    let literal = extract_field(status, positions)?;
    let digits = &literal[HEX_PREFIX.len()..];

    // from_str_radix would accept a leading '+', which is not a hex digit
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex { literal });
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 16 {
        return Err(DecodeError::FieldTooWide {
            digits: digits.len(),
        });
    }

    u64::from_str_radix(significant, 16).map_err(|_| DecodeError::InvalidHex { literal })
}

/// Decode a scaled numeric field, or `Unavailable` if the source is unavailable
///
/// Availability is checked before the status is touched at all.
pub fn decode_numeric_field(
    source: &dyn StatusSource,
    positions: &[usize],
    scale: Scale,
) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }

    let raw = parse_field(source.raw_status(), positions)?;
    Ok(NativeValue::Float(raw as f64 / scale.divisor()))
}

/// Decode a battery field as full (100) when zero, depleted (0) otherwise
pub fn decode_battery(source: &dyn StatusSource, positions: &[usize]) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }

    let raw = parse_field(source.raw_status(), positions)?;
    Ok(NativeValue::Integer(if raw == 0 { 100 } else { 0 }))
}

/// Decode a field as a flag that is set when non-zero
pub fn decode_flag(source: &dyn StatusSource, positions: &[usize]) -> DecodeResult<NativeValue> {
    if !source.is_available() {
        return Ok(NativeValue::Unavailable);
    }

    let raw = parse_field(source.raw_status(), positions)?;
    Ok(NativeValue::Bool(raw != 0))
}
