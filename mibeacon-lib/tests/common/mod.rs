//! Shared fixtures and helpers for the integration tests

// Not every test file uses every item from this shared module
#[allow(unused_imports)]
pub use mibeacon_lib::constants::*;
#[allow(unused_imports)]
pub use mibeacon_lib::error::{BeaconError, ClassifyError, CryptoError, DecodeError};
#[allow(unused_imports)]
pub use mibeacon_lib::frame::{DeviceModel, FrameControl, FrameHeader, MacAddress, classify};
#[allow(unused_imports)]
pub use mibeacon_lib::measurement::{DataPointType, MeasurementResult, decode};
#[allow(unused_imports)]
pub use mibeacon_lib::{DuplicateFilter, SERVICE_UUID, Sensor, decrypt};

/// Decode hex fixture data
#[allow(dead_code)]
pub fn hex_to_vec(hex_data: &str) -> Vec<u8> {
    hex::decode(hex_data).expect("Failed to decode hex")
}

/// Captured MiFlora frame: capability byte present, illuminance 1753 lx
#[allow(dead_code)]
pub const MIFLORA_ILLUMINANCE: &str = "71209800a964aab58d7cc40d071003d90600";

/// Captured LYWSDCGQ frame: no capability byte, 21.1 °C / 53.6 %
#[allow(dead_code)]
pub const LYWSDCGQ_TEMP_HUM: &str = "5020aa01c2f56630342d580d1004d3001802";

/// Captured encrypted LYWSD03MMC frame (23 bytes, 5-byte ciphertext)
#[allow(dead_code)]
pub const ENCRYPTED_TEMPERATURE: &str = "58585b053da4c1384e1678da616677d52e00009f1f0f10";

/// The same frame after decryption: flag bit cleared, plaintext spliced in
#[allow(dead_code)]
pub const DECRYPTED_TEMPERATURE: &str = "50585b053da4c1384e1678041002d3002e00009f1f0f10";

/// Bindkey provisioned for the encrypted fixture
#[allow(dead_code)]
pub const BINDKEY_HEX: &str = "e9efaa6873f9f9c87a5e75a5f814801c";

/// Build a MiFlora-shaped frame around an arbitrary data point
#[allow(dead_code)]
pub fn flora_frame(datapoint_hex: &str) -> Vec<u8> {
    let mut raw = hex_to_vec("71209800a964aab58d7cc40d");
    raw.extend_from_slice(&hex_to_vec(datapoint_hex));
    raw
}

/// Display-order address of the MiFlora fixtures
#[allow(dead_code)]
pub fn flora_mac() -> MacAddress {
    "C4:7C:8D:B5:AA:64".parse().unwrap()
}

/// Display-order address of the encrypted fixture
#[allow(dead_code)]
pub fn lywsd03mmc_mac() -> MacAddress {
    "78:16:4E:38:C1:A4".parse().unwrap()
}

#[allow(dead_code)]
pub fn bindkey() -> [u8; 16] {
    hex_to_vec(BINDKEY_HEX).try_into().unwrap()
}
