use crate::bitpack::{BitStream, Pack};
use crate::presence::PresenceWindow;

pub const PROTOCOL_MAGIC: u32 = 0x5445_5448;
pub const PROTOCOL_VERSION: u16 = 1;

/// Bits a packed [`PacketHeader`] occupies.
pub const HEADER_BITS: usize = 32 + 16 + 32 + 64;

const SEQUENCE_WRAP_THRESHOLD: u32 = u32::MAX / 2;

/// `true` if `s1` was sent after `s2`, allowing the counter to wrap.
#[inline]
pub fn sequence_greater_than(s1: u32, s2: u32) -> bool {
    ((s1 > s2) && (s1 - s2 <= SEQUENCE_WRAP_THRESHOLD))
        || ((s1 < s2) && (s2 - s1 > SEQUENCE_WRAP_THRESHOLD))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub magic: u32,
    pub version: u16,
    pub sequence: u32,
    /// Sequences the sender has received from us.
    pub receipts: PresenceWindow,
}

impl PacketHeader {
    pub fn new(sequence: u32, receipts: PresenceWindow) -> Self {
        Self {
            magic: PROTOCOL_MAGIC,
            version: PROTOCOL_VERSION,
            sequence,
            receipts,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == PROTOCOL_MAGIC && self.version == PROTOCOL_VERSION
    }
}

impl Pack for PacketHeader {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        self.magic.pack(stream);
        self.version.pack(stream);
        self.sequence.pack(stream);
        self.receipts.pack(stream);
    }
}
