use std::collections::HashMap;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::constants::{BINDKEY_LEN, SERVICE_UUID16};
use crate::crypto::decrypt;
use crate::dedup::DuplicateFilter;
use crate::error::{BeaconError, ClassifyError, CryptoError};
use crate::frame::{MacAddress, classify};
use crate::measurement::{MeasurementResult, decode};

const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805F9B34FB;

/// Full 128-bit form of the 16-bit service UUID 0xFE95.
pub const SERVICE_UUID: Uuid =
    Uuid::from_u128(BLUETOOTH_BASE_UUID | (SERVICE_UUID16 as u128) << 96);

/// One tracked physical sensor: its advertised address plus the pre-shared
/// bindkey for models that encrypt their payload.
///
/// The wrapper runs the decode pipeline over the service data of each
/// advertisement; all cross-advertisement state lives in the caller-owned
/// [`DuplicateFilter`].
#[derive(Debug, Clone)]
pub struct Sensor {
    address: MacAddress,
    bindkey: Option<[u8; BINDKEY_LEN]>,
}

impl Sensor {
    pub fn new(address: MacAddress, bindkey: Option<[u8; BINDKEY_LEN]>) -> Self {
        Self { address, bindkey }
    }

    pub fn address(&self) -> MacAddress {
        self.address
    }

    /// Run classify → duplicate filter → decrypt → decode on one service
    /// data entry. `Ok(None)` is a dropped duplicate, a normal outcome.
    ///
    /// Decryption rewrites the payload region of `data` in place.
    pub fn handle_service_data(
        &self,
        filter: &mut DuplicateFilter,
        uuid: &Uuid,
        data: &mut [u8],
    ) -> Result<Option<MeasurementResult>, BeaconError> {
        if *uuid != SERVICE_UUID {
            return Err(ClassifyError::ServiceUuidMismatch.into());
        }

        let (header, model) = classify(data)?;
        if header.has_data && filter.is_duplicate(self.address, header.packet_sequence) {
            debug!(
                address = %self.address,
                sequence = header.packet_sequence,
                "duplicate frame dropped"
            );
            return Ok(None);
        }

        if header.has_encrypted_payload {
            let bindkey = self.bindkey.as_ref().ok_or(CryptoError::MissingKey)?;
            decrypt(data, bindkey)?;
        }

        let result = decode(data, &header, model, self.address)?;
        Ok(Some(result))
    }

    /// Try every service data entry of one advertisement independently and
    /// return the last decoded result, if any. Failed entries are logged and
    /// skipped; one bad entry never aborts the others.
    pub fn handle_advertisement(
        &self,
        filter: &mut DuplicateFilter,
        service_data: &mut HashMap<Uuid, Vec<u8>>,
    ) -> Option<MeasurementResult> {
        let mut found = None;
        for (uuid, data) in service_data.iter_mut() {
            if *uuid != SERVICE_UUID {
                continue;
            }
            match self.handle_service_data(filter, uuid, data) {
                Ok(Some(result)) => found = Some(result),
                Ok(None) => {}
                Err(err) => {
                    trace!(address = %self.address, %err, "service data entry not decoded");
                }
            }
        }
        found
    }
}
