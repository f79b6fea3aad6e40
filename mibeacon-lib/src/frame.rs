use std::fmt;
use std::str::FromStr;

use modular_bitfield::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Serialize, Serializer};
use strum_macros::Display;
use thiserror::Error;

use crate::constants::{
    BASE_PAYLOAD_OFFSET, CAPABILITY_PAYLOAD_OFFSET, MAC_LEN, MAC_OFFSET, MIN_FRAME_LEN,
};
use crate::error::ClassifyError;

/// The 16-bit frame control word at the start of every service data entry.
///
/// The flag bits live in byte 0, the protocol version nibble in byte 1.
#[bitfield(bytes = 2)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameControl {
    #[skip]
    __: B3,
    pub is_encrypted: bool,
    pub has_mac: bool,
    pub has_capability: bool,
    pub has_data: bool,
    pub is_mesh: bool,
    pub is_registered: bool,
    pub is_solicited: bool,
    pub auth_mode: B2,
    pub version: B4,
}

/// A 48-bit device address in display byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Build an address from the in-frame MAC field, which is stored in
    /// reverse display order.
    pub fn from_reversed(frame_bytes: &[u8]) -> Self {
        debug_assert_eq!(frame_bytes.len(), MAC_LEN);
        let mut mac = [0u8; 6];
        for (out, byte) in mac.iter_mut().zip(frame_bytes.iter().rev()) {
            *out = *byte;
        }
        Self(mac)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Error, Debug, Clone)]
#[error("invalid MAC address: {0:?}")]
pub struct InvalidMacAddress(String);

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InvalidMacAddress(s.to_string());
        let mut mac = [0u8; 6];
        let mut parts = s.split(':');
        for out in &mut mac {
            let part = parts.next().ok_or_else(bad)?;
            if part.len() != 2 {
                return Err(bad());
            }
            *out = u8::from_str_radix(part, 16).map_err(|_| bad())?;
        }
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self(mac))
    }
}

/// Device models recognized by product id (frame bytes 2-3, little-endian).
///
/// Exactly one model matches an accepted frame; unknown product ids are
/// rejected, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum DeviceModel {
    /// MiFlora plant sensor
    #[strum(to_string = "HHCCJCY01")]
    Hhccjcy01 = 0x0098,
    /// FlowerPot / RoPot
    #[strum(to_string = "HHCCPOT002")]
    Hhccpot002 = 0x015D,
    /// Round body, segment LCD hygrometer
    #[strum(to_string = "LYWSDCGQ")]
    Lywsdcgq = 0x01AA,
    /// Formaldehyde sensor, OLED display
    #[strum(to_string = "JQJCY01YM")]
    Jqjcy01ym = 0x02DF,
    /// Round body, e-ink hygrometer
    #[strum(to_string = "CGG1")]
    Cgg1 = 0x0347,
    /// VegTrug Grow Care Garden
    #[strum(to_string = "GCLS002")]
    Gcls002 = 0x03BC,
    /// BLE nightlight; broadcasts without an in-frame MAC
    #[strum(to_string = "MUE4094RT")]
    Mue4094rt = 0x03DD,
    /// Mosquito repellent, smart version
    #[strum(to_string = "WX08ZM")]
    Wx08zm = 0x040A,
    /// Rectangular body, e-ink clock
    #[strum(to_string = "LYWSD02")]
    Lywsd02 = 0x045B,
    /// Small square body, segment LCD; encrypts its payload
    #[strum(to_string = "LYWSD03MMC")]
    Lywsd03mmc = 0x055B,
    /// Cleargrass alarm clock, segment LCD
    #[strum(to_string = "CGD1")]
    Cgd1 = 0x0576,
}

impl DeviceModel {
    /// Whether frames from this model carry the MAC address at bytes 5-10.
    /// The nightlight omits it, shifting the data-point region down 6 bytes.
    pub fn has_mac_in_frame(self) -> bool {
        !matches!(self, DeviceModel::Mue4094rt)
    }
}

impl Serialize for DeviceModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Header fields derived from a classified frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub has_data: bool,
    pub has_capability: bool,
    pub has_encrypted_payload: bool,
    /// Product id, little-endian bytes 2-3
    pub sensor_type: u16,
    /// Rolling frame counter, byte 4
    pub packet_sequence: u8,
    /// Offset of the data-point region (ciphertext region for encrypted frames)
    pub payload_offset: usize,
    /// In-frame MAC address, absent on MAC-less models
    pub mac: Option<MacAddress>,
}

/// Classify a raw service data entry: validate length and the data flag,
/// resolve the device model from the product id, and compute the data-point
/// offset. Pure function, no side effects on the buffer.
pub fn classify(raw: &[u8]) -> Result<(FrameHeader, DeviceModel), ClassifyError> {
    if raw.len() < MIN_FRAME_LEN {
        return Err(ClassifyError::TooShort { actual: raw.len() });
    }

    let control = FrameControl::from_bytes([raw[0], raw[1]]);
    if !control.has_data() {
        return Err(ClassifyError::NoData);
    }

    let sensor_type = u16::from_le_bytes([raw[2], raw[3]]);
    let model = DeviceModel::try_from(sensor_type)
        .map_err(|_| ClassifyError::UnknownDevice { sensor_type })?;

    let mut payload_offset = if control.has_capability() {
        CAPABILITY_PAYLOAD_OFFSET
    } else {
        BASE_PAYLOAD_OFFSET
    };
    let mac = if model.has_mac_in_frame() {
        Some(MacAddress::from_reversed(
            &raw[MAC_OFFSET..MAC_OFFSET + MAC_LEN],
        ))
    } else {
        payload_offset -= MAC_LEN;
        None
    };

    let header = FrameHeader {
        has_data: control.has_data(),
        has_capability: control.has_capability(),
        has_encrypted_payload: control.is_encrypted(),
        sensor_type,
        packet_sequence: raw[4],
        payload_offset,
        mac,
    };
    Ok((header, model))
}
