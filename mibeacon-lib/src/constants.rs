// Wire-format constants for MiBeacon service data

/// 16-bit service-data UUID the sensors advertise under (0xFE95)
pub const SERVICE_UUID16: u16 = 0xFE95;

/// Minimum service data length accepted by the classifier
pub const MIN_FRAME_LEN: usize = 14;

/// Offset of the in-frame MAC address (reversed display order)
pub const MAC_OFFSET: usize = 5;

/// Length of the in-frame MAC address
pub const MAC_LEN: usize = 6;

/// Data-point region offset without a capability byte
pub const BASE_PAYLOAD_OFFSET: usize = 11;

/// Data-point region offset with a capability byte
pub const CAPABILITY_PAYLOAD_OFFSET: usize = 12;

/// Total length of an encrypted frame with a 4-byte payload (battery)
pub const ENCRYPTED_FRAME_SHORT: usize = 22;

/// Total length of an encrypted frame with a 5-byte payload (temperature or humidity)
pub const ENCRYPTED_FRAME_LONG: usize = 23;

/// Offset of the ciphertext region in an encrypted frame
pub const CIPHERTEXT_OFFSET: usize = 11;

/// Length of the rolling payload counter following the ciphertext
pub const COUNTER_LEN: usize = 3;

/// Length of the CCM authentication tag
pub const TAG_LEN: usize = 4;

/// Length of the CCM nonce
pub const NONCE_LEN: usize = 12;

/// Length of the pre-shared per-device key
pub const BINDKEY_LEN: usize = 16;

/// Fixed additional authenticated data for every encrypted frame
pub const CCM_AAD: [u8; 1] = [0x11];

/// Bytes in a data-point tag: type, fixed 0x10 marker, declared length
pub const DATAPOINT_TAG_LEN: usize = 3;

/// Largest declared data-point value length
pub const MAX_DATAPOINT_LEN: u8 = 4;
