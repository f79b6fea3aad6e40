use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;
use strum_macros::Display;

use crate::constants::{DATAPOINT_TAG_LEN, MAX_DATAPOINT_LEN};
use crate::error::DecodeError;
use crate::frame::{DeviceModel, FrameHeader, MacAddress};

/// Data-point kinds carried in the plaintext payload, keyed by the type byte
/// of the `(type, 0x10, length)` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DataPointType {
    Motion = 0x03,
    Temperature = 0x04,
    Humidity = 0x06,
    Illuminance = 0x07,
    Moisture = 0x08,
    Conductivity = 0x09,
    BatteryLevel = 0x0A,
    TemperatureHumidity = 0x0D,
    MotionWithIlluminance = 0x0F,
    Formaldehyde = 0x10,
    OnOffState = 0x12,
    MosquitoTablet = 0x13,
    IdleTime = 0x17,
}

impl DataPointType {
    /// The fixed value length for this kind; a mismatched declared length is
    /// a hard decode failure.
    pub fn expected_len(self) -> u8 {
        match self {
            DataPointType::Motion => 1,
            DataPointType::Temperature => 2,
            DataPointType::Humidity => 2,
            DataPointType::Illuminance => 3,
            DataPointType::Moisture => 1,
            DataPointType::Conductivity => 2,
            DataPointType::BatteryLevel => 1,
            DataPointType::TemperatureHumidity => 4,
            DataPointType::MotionWithIlluminance => 3,
            DataPointType::Formaldehyde => 2,
            DataPointType::OnOffState => 1,
            DataPointType::MosquitoTablet => 1,
            DataPointType::IdleTime => 4,
        }
    }
}

/// Sparse record of the measurements decoded from one advertisement.
///
/// Constructed empty, populated by [`decode`], consumed immediately by the
/// reporter; never retained across decode cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub model: DeviceModel,
    pub address: MacAddress,
    /// °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f32>,
    /// %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    /// µS/cm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conductivity: Option<u16>,
    /// lx
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illuminance: Option<u32>,
    /// Soil moisture, %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moisture: Option<u8>,
    /// mg/m³
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formaldehyde: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Mosquito tablet remaining, %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet: Option<u8>,
    /// Seconds since last motion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time: Option<u32>,
}

impl MeasurementResult {
    pub fn new(model: DeviceModel, address: MacAddress) -> Self {
        Self {
            model,
            address,
            temperature: None,
            humidity: None,
            battery_level: None,
            conductivity: None,
            illuminance: None,
            moisture: None,
            formaldehyde: None,
            motion: None,
            is_active: None,
            tablet: None,
            idle_time: None,
        }
    }

    /// True once at least one measurement field is populated.
    pub fn has_any(&self) -> bool {
        self.temperature.is_some()
            || self.humidity.is_some()
            || self.battery_level.is_some()
            || self.conductivity.is_some()
            || self.illuminance.is_some()
            || self.moisture.is_some()
            || self.formaldehyde.is_some()
            || self.motion.is_some()
            || self.is_active.is_some()
            || self.tablet.is_some()
            || self.idle_time.is_some()
    }
}

fn u24_le(value: &[u8]) -> u32 {
    u32::from(value[0]) | u32::from(value[1]) << 8 | u32::from(value[2]) << 16
}

/// Decode the single data point at the header's payload offset into a
/// [`MeasurementResult`]. The frame must already be plaintext.
///
/// The second tag byte is a fixed 0x10 marker; firmware revisions disagree on
/// it, so it is carried but not validated.
pub fn decode(
    raw: &[u8],
    header: &FrameHeader,
    model: DeviceModel,
    address: MacAddress,
) -> Result<MeasurementResult, DecodeError> {
    let offset = header.payload_offset;
    let tag_end = offset + DATAPOINT_TAG_LEN;
    if raw.len() < tag_end + 1 {
        return Err(DecodeError::Truncated {
            needed: tag_end + 1,
            actual: raw.len(),
        });
    }

    let declared = raw[offset + 2];
    if declared < 1 || declared > MAX_DATAPOINT_LEN {
        return Err(DecodeError::LengthOutOfRange { declared });
    }
    let value_end = tag_end + declared as usize;
    if raw.len() < value_end {
        return Err(DecodeError::Truncated {
            needed: value_end,
            actual: raw.len(),
        });
    }

    let type_byte = raw[offset];
    let data_type = DataPointType::try_from(type_byte)
        .map_err(|_| DecodeError::UnknownType { data_type: type_byte })?;
    if declared != data_type.expected_len() {
        return Err(DecodeError::LengthMismatch {
            data_type,
            declared,
            expected: data_type.expected_len(),
        });
    }

    let value = &raw[tag_end..value_end];
    let mut result = MeasurementResult::new(model, address);
    match data_type {
        DataPointType::Motion => {
            result.motion = Some(value[0] != 0);
        }
        DataPointType::Temperature => {
            result.temperature = Some(i16::from_le_bytes([value[0], value[1]]) as f32 / 10.0);
        }
        DataPointType::Humidity => {
            result.humidity = Some(i16::from_le_bytes([value[0], value[1]]) as f32 / 10.0);
        }
        DataPointType::Illuminance => {
            result.illuminance = Some(u24_le(value));
        }
        DataPointType::Moisture => {
            result.moisture = Some(value[0]);
        }
        DataPointType::Conductivity => {
            result.conductivity = Some(u16::from_le_bytes([value[0], value[1]]));
        }
        DataPointType::BatteryLevel => {
            result.battery_level = Some(value[0]);
        }
        DataPointType::TemperatureHumidity => {
            result.temperature = Some(i16::from_le_bytes([value[0], value[1]]) as f32 / 10.0);
            result.humidity = Some(i16::from_le_bytes([value[2], value[3]]) as f32 / 10.0);
        }
        DataPointType::MotionWithIlluminance => {
            result.illuminance = Some(u24_le(value));
            result.motion = Some(true);
        }
        DataPointType::Formaldehyde => {
            result.formaldehyde = Some(u16::from_le_bytes([value[0], value[1]]) as f32 / 100.0);
        }
        DataPointType::OnOffState => {
            result.is_active = Some(value[0] != 0);
        }
        DataPointType::MosquitoTablet => {
            result.tablet = Some(value[0]);
        }
        DataPointType::IdleTime => {
            let idle = u32::from_le_bytes([value[0], value[1], value[2], value[3]]);
            result.idle_time = Some(idle);
            result.motion = Some(idle == 0);
        }
    }
    Ok(result)
}
