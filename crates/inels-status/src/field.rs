//! Logical fields and the per-hardware token layouts that carry them

use inels_core::HardwareType;
use std::fmt;

/// A logical field carried in a device status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    Battery,
    TempIn,
    TempOut,
    LightIn,
    /// Analog input, wired to a temperature probe
    Ain,
    Humidity,
    DewPoint,
    /// Digital input contact
    DigitalIn,
}

impl DataField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataField::Battery => "battery",
            DataField::TempIn => "temp_in",
            DataField::TempOut => "temp_out",
            DataField::LightIn => "light_in",
            DataField::Ain => "ain",
            DataField::Humidity => "humidity",
            DataField::DewPoint => "dew_point",
            DataField::DigitalIn => "din",
        }
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps each logical field to the ordered token positions that form it
///
/// Position order is authoritative: `[2, 1]` reads token 2 then token 1,
/// which reassembles a little-endian 16-bit value.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldIndexTable {
    name: &'static str,
    fields: &'static [(DataField, &'static [usize])],
}

impl FieldIndexTable {
    pub const fn new(name: &'static str, fields: &'static [(DataField, &'static [usize])]) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Token positions for a field, if the table declares it
    pub fn positions(&self, field: DataField) -> Option<&'static [usize]> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, positions)| *positions)
    }

    pub fn contains(&self, field: DataField) -> bool {
        self.positions(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = DataField> + '_ {
        self.fields.iter().map(|(f, _)| *f)
    }

    /// Minimum number of status tokens a device must report for this table
    pub fn min_status_len(&self) -> usize {
        self.fields
            .iter()
            .flat_map(|(_, positions)| positions.iter())
            .map(|p| p + 1)
            .max()
            .unwrap_or(0)
    }
}

/// RFTI-10B: battery flag, then little-endian internal and external temperature
pub static TEMP_SENSOR_DATA: FieldIndexTable = FieldIndexTable::new(
    "temp_sensor",
    &[
        (DataField::Battery, &[0]),
        (DataField::TempIn, &[2, 1]),
        (DataField::TempOut, &[4, 3]),
    ],
);

/// SA3-01B: relay state and reserved bytes, big-endian temperature at 4..=5
pub static RELAY_DATA: FieldIndexTable =
    FieldIndexTable::new("relay", &[(DataField::TempIn, &[4, 5])]);

/// DA3-22M: two channel outputs and flags, big-endian temperature at 6..=7
pub static TWOCHANNELDIMMER_DATA: FieldIndexTable =
    FieldIndexTable::new("two_channel_dimmer", &[(DataField::TempIn, &[6, 7])]);

/// GTR3-50: little-endian readings starting at token 0, digital input last
pub static THERMOSTAT_DATA: FieldIndexTable = FieldIndexTable::new(
    "thermostat",
    &[
        (DataField::TempIn, &[1, 0]),
        (DataField::LightIn, &[5, 4, 3, 2]),
        (DataField::Ain, &[7, 6]),
        (DataField::Humidity, &[9, 8]),
        (DataField::DewPoint, &[11, 10]),
        (DataField::DigitalIn, &[12]),
    ],
);

/// GSB3-90SX: two button-state tokens, then the same readings as GTR3-50
pub static BUTTONARRAY_DATA: FieldIndexTable = FieldIndexTable::new(
    "button_array",
    &[
        (DataField::TempIn, &[3, 2]),
        (DataField::LightIn, &[7, 6, 5, 4]),
        (DataField::Ain, &[9, 8]),
        (DataField::Humidity, &[11, 10]),
        (DataField::DewPoint, &[13, 12]),
    ],
);

/// The field layout for a hardware type, if it reports decodable readings
pub fn field_table(hardware: &HardwareType) -> Option<&'static FieldIndexTable> {
    match hardware {
        HardwareType::Rfti10B => Some(&TEMP_SENSOR_DATA),
        HardwareType::Sa301B => Some(&RELAY_DATA),
        HardwareType::Da322M => Some(&TWOCHANNELDIMMER_DATA),
        HardwareType::Gtr350 => Some(&THERMOSTAT_DATA),
        HardwareType::Gsb390Sx => Some(&BUTTONARRAY_DATA),
        HardwareType::Rfdac71B | HardwareType::Other(_) => None,
    }
}
