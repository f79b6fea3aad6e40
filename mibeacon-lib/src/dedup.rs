use std::collections::HashMap;

use crate::frame::MacAddress;

/// Suppresses immediate retransmissions of the same frame, tracking the last
/// seen frame counter per device address.
///
/// The counter wraps at 256 with no reordering tolerance: a replayed counter
/// value, or a wrap that lands on the stored byte, is indistinguishable from
/// a retransmission and is dropped. Accepted limitation of the format.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    last_seen: HashMap<MacAddress, u8>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the frame counter for `address` and report whether it repeats
    /// the previous one.
    pub fn is_duplicate(&mut self, address: MacAddress, sequence: u8) -> bool {
        self.last_seen.insert(address, sequence) == Some(sequence)
    }
}
