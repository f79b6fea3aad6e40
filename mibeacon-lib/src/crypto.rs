use aes::Aes128;
use ccm::Ccm;
use ccm::aead::generic_array::GenericArray;
use ccm::aead::{AeadInPlace, KeyInit};
use ccm::consts::{U4, U12};
use tracing::trace;
use zeroize::Zeroize;

use crate::constants::{
    BINDKEY_LEN, CCM_AAD, CIPHERTEXT_OFFSET, COUNTER_LEN, ENCRYPTED_FRAME_LONG,
    ENCRYPTED_FRAME_SHORT, NONCE_LEN, TAG_LEN,
};
use crate::error::CryptoError;
use crate::frame::FrameControl;

/// AES-128 in CCM mode with a 4-byte tag and a 12-byte nonce, matching the
/// sensor firmware.
type BeaconCcm = Ccm<Aes128, U4, U12>;

/// Assemble the 12-byte nonce: in-frame MAC reversed (byte 10 down to byte 5),
/// product id, frame counter, then the 3-byte rolling counter that trails the
/// ciphertext.
fn build_nonce(raw: &[u8], ciphertext_len: usize) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    for (out, byte) in nonce[..6].iter_mut().zip(raw[5..11].iter().rev()) {
        *out = *byte;
    }
    nonce[6..8].copy_from_slice(&raw[2..4]);
    nonce[8] = raw[4];
    let counter_offset = CIPHERTEXT_OFFSET + ciphertext_len;
    nonce[9..12].copy_from_slice(&raw[counter_offset..counter_offset + COUNTER_LEN]);
    nonce
}

/// Authenticate and decrypt the payload of an encrypted frame in place.
///
/// Only frames of exactly 22 bytes (4-byte payload) or 23 bytes (5-byte
/// payload) are decryptable. On success the plaintext overwrites the
/// ciphertext region at offset 11 and the encrypted flag in byte 0 is
/// cleared, so the frame decodes as plaintext afterwards. On any failure the
/// buffer is left byte-for-byte unmodified.
pub fn decrypt(raw: &mut [u8], bindkey: &[u8; BINDKEY_LEN]) -> Result<(), CryptoError> {
    if raw.len() != ENCRYPTED_FRAME_SHORT && raw.len() != ENCRYPTED_FRAME_LONG {
        return Err(CryptoError::WrongSize { actual: raw.len() });
    }
    let control = FrameControl::from_bytes([raw[0], raw[1]]);
    if !control.is_encrypted() {
        return Err(CryptoError::NotEncrypted);
    }

    let ciphertext_len = raw.len() - CIPHERTEXT_OFFSET - COUNTER_LEN - TAG_LEN;
    let tag_offset = raw.len() - TAG_LEN;
    let mut nonce = build_nonce(raw, ciphertext_len);

    // Decrypt a scratch copy so an authentication failure cannot leak
    // partial plaintext into the frame.
    let mut scratch = [0u8; 5];
    let scratch = &mut scratch[..ciphertext_len];
    scratch.copy_from_slice(&raw[CIPHERTEXT_OFFSET..CIPHERTEXT_OFFSET + ciphertext_len]);

    let cipher = BeaconCcm::new(GenericArray::from_slice(bindkey));
    let verdict = cipher.decrypt_in_place_detached(
        GenericArray::from_slice(&nonce),
        &CCM_AAD,
        scratch,
        GenericArray::from_slice(&raw[tag_offset..]),
    );

    if verdict.is_err() {
        trace!(
            nonce = %hex::encode(nonce),
            tag = %hex::encode(&raw[tag_offset..]),
            ciphertext = %hex::encode(&raw[CIPHERTEXT_OFFSET..CIPHERTEXT_OFFSET + ciphertext_len]),
            "authenticated decryption failed"
        );
        nonce.zeroize();
        scratch.zeroize();
        return Err(CryptoError::AuthFailed);
    }

    raw[CIPHERTEXT_OFFSET..CIPHERTEXT_OFFSET + ciphertext_len].copy_from_slice(scratch);
    raw[..2].copy_from_slice(&control.with_is_encrypted(false).into_bytes());
    nonce.zeroize();
    scratch.zeroize();
    Ok(())
}
