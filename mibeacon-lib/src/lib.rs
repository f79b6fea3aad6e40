//! Decoder for the MiBeacon service-data format broadcast by Xiaomi
//! environmental BLE sensors, including AES-CCM payload decryption for
//! devices that encrypt their advertisements.

pub mod constants;
pub mod crypto;
pub mod dedup;
pub mod error;
pub mod frame;
pub mod measurement;
pub mod report;
pub mod sensor;

pub use crypto::decrypt;
pub use dedup::DuplicateFilter;
pub use error::{BeaconError, ClassifyError, CryptoError, DecodeError};
pub use frame::{DeviceModel, FrameControl, FrameHeader, MacAddress, classify};
pub use measurement::{DataPointType, MeasurementResult, decode};
pub use sensor::{SERVICE_UUID, Sensor};
