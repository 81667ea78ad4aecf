use thiserror::Error;

use super::header::{PacketHeader, HEADER_BITS, PROTOCOL_MAGIC, PROTOCOL_VERSION};
use crate::bitpack::{BitCounter, BitStream, BitpackError, Pack, Packer, Unpacker, WORD_BITS};

pub const MAX_PACKET_SIZE: usize = 1200;

const WORD_BYTES: usize = WORD_BITS / 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error(
        "unexpected protocol {magic:#010x} v{version} (want {want_magic:#010x} v{want_version})",
        want_magic = PROTOCOL_MAGIC,
        want_version = PROTOCOL_VERSION
    )]
    InvalidHeader { magic: u32, version: u16 },
    #[error("packet too short: {needed} bits needed, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("packet length {len} is not a multiple of {word} bytes", word = WORD_BYTES)]
    Misaligned { len: usize },
    #[error("packet larger than {max} bytes: {len}", max = MAX_PACKET_SIZE)]
    TooLarge { len: usize },
    #[error(transparent)]
    Bitpack(#[from] BitpackError),
}

/// A word-aligned datagram: a [`PacketHeader`] followed by bit-packed
/// payload fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    words: Vec<u32>,
}

impl Packet {
    /// Words needed to hold `size_bytes`, rounded up to whole words.
    pub fn words_for(size_bytes: usize) -> usize {
        size_bytes.div_ceil(WORD_BYTES)
    }

    pub fn new(size_bytes: usize) -> Self {
        Self {
            words: vec![0; Self::words_for(size_bytes)],
        }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn size_bytes(&self) -> usize {
        self.words.len() * WORD_BYTES
    }

    /// Overwrites the packet with `header` and whatever `write` packs after
    /// it. Returns the number of bits used.
    ///
    /// # Panics
    ///
    /// If `write` runs past the end of the packet. [`Packet::pack_payload`]
    /// checks the payload size first.
    pub fn pack<F>(&mut self, mut header: PacketHeader, write: F) -> Result<usize, PacketError>
    where
        F: FnOnce(&mut Packer<'_>),
    {
        let available = self.words.len() * WORD_BITS;
        if available < HEADER_BITS {
            return Err(BitpackError::OutOfCapacity {
                requested: HEADER_BITS,
                available,
            }
            .into());
        }

        self.words.fill(0);
        let mut packer = Packer::new(&mut self.words);
        header.pack(&mut packer);
        write(&mut packer);
        Ok(packer.current_bit())
    }

    /// Overwrites the packet with `header` followed by `payload`, after
    /// measuring that both fit. Returns the number of bits used.
    pub fn pack_payload<T: Pack>(
        &mut self,
        header: PacketHeader,
        payload: &mut T,
    ) -> Result<usize, PacketError> {
        let mut counter = BitCounter::new();
        payload.pack(&mut counter);
        let payload_bits = counter.current_bit();

        let available = self.words.len() * WORD_BITS;
        if available >= HEADER_BITS && HEADER_BITS + payload_bits > available {
            return Err(BitpackError::OutOfCapacity {
                requested: payload_bits,
                available: available - HEADER_BITS,
            }
            .into());
        }

        self.pack(header, |packer| payload.pack(packer))
    }

    /// Reads the header and then `payload_bits` worth of fields through
    /// `read`. Packets too short for both are rejected before anything is
    /// read.
    pub fn unpack<T, F>(&self, payload_bits: usize, read: F) -> Result<(PacketHeader, T), PacketError>
    where
        F: FnOnce(&mut Unpacker<'_>) -> T,
    {
        let needed = HEADER_BITS + payload_bits;
        let available = self.words.len() * WORD_BITS;
        if available < needed {
            return Err(PacketError::Truncated { needed, available });
        }

        let mut unpacker = Unpacker::new(&self.words);
        let mut header = PacketHeader::default();
        header.pack(&mut unpacker);
        if !header.is_valid() {
            return Err(PacketError::InvalidHeader {
                magic: header.magic,
                version: header.version,
            });
        }

        let payload = read(&mut unpacker);
        Ok((header, payload))
    }

    /// Wire bytes; each word is big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_be_bytes()).collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() > MAX_PACKET_SIZE {
            return Err(PacketError::TooLarge { len: bytes.len() });
        }

        if bytes.len() % WORD_BYTES != 0 {
            return Err(PacketError::Misaligned { len: bytes.len() });
        }

        let words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(Self { words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::PresenceWindow;

    #[test]
    fn size_rounds_up_to_words() {
        assert_eq!(Packet::words_for(0), 0);
        assert_eq!(Packet::words_for(1), 1);
        assert_eq!(Packet::words_for(4), 1);
        assert_eq!(Packet::words_for(5), 2);
        assert_eq!(Packet::new(63).size_bytes(), 64);
    }

    #[test]
    fn header_and_payload_round_trip() {
        let mut packet = Packet::new(64);
        let header = PacketHeader::new(12, PresenceWindow::new(10, 0b101));

        let used = packet
            .pack(header, |packer| {
                packer.write_bits(0b101, 3);
                let mut value = 0xabcd_u16;
                value.pack(packer);
            })
            .unwrap();
        assert_eq!(used, HEADER_BITS + 19);

        let (received, payload) = packet
            .unpack(19, |unpacker| {
                let flags = unpacker.read_bits(3);
                let mut value = 0u16;
                value.pack(unpacker);
                (flags, value)
            })
            .unwrap();
        assert_eq!(received, header);
        assert_eq!(payload, (0b101, 0xabcd));
    }

    #[test]
    fn repacking_clears_old_bits() {
        let mut packet = Packet::new(32);
        packet
            .pack(PacketHeader::new(1, PresenceWindow::default()), |packer| {
                packer.write_bits(u32::MAX, 32)
            })
            .unwrap();
        packet
            .pack(PacketHeader::new(2, PresenceWindow::default()), |_| {})
            .unwrap();

        let (_, rest) = packet.unpack(32, |unpacker| unpacker.read_bits(32)).unwrap();
        assert_eq!(rest, 0);
    }

    #[test]
    fn bytes_are_big_endian_words() {
        let mut packet = Packet::new(20);
        packet
            .pack(PacketHeader::new(7, PresenceWindow::default()), |_| {})
            .unwrap();

        let bytes = packet.to_bytes();
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[..4], &PROTOCOL_MAGIC.to_be_bytes());
        assert_eq!(Packet::from_bytes(&bytes), Ok(packet));
    }

    #[test]
    fn invalid_magic_is_rejected() {
        let mut packet = Packet::new(32);
        packet
            .pack(PacketHeader::new(1, PresenceWindow::default()), |_| {})
            .unwrap();
        let mut bytes = packet.to_bytes();
        bytes[0] ^= 0xff;

        let packet = Packet::from_bytes(&bytes).unwrap();
        assert!(matches!(
            packet.unpack(0, |_| ()),
            Err(PacketError::InvalidHeader { version: PROTOCOL_VERSION, .. })
        ));
    }

    #[test]
    fn short_packets_are_rejected() {
        let packet = Packet::new(8);
        assert_eq!(
            packet.unpack(0, |_| ()),
            Err(PacketError::Truncated { needed: HEADER_BITS, available: 64 })
        );

        let packet = Packet::new(20);
        assert_eq!(
            packet.unpack(17, |_| ()),
            Err(PacketError::Truncated { needed: HEADER_BITS + 17, available: 160 })
        );
    }

    #[test]
    fn header_must_fit_when_packing() {
        let mut packet = Packet::new(16);
        assert_eq!(
            packet.pack(PacketHeader::new(1, PresenceWindow::default()), |_| {}),
            Err(PacketError::Bitpack(BitpackError::OutOfCapacity {
                requested: HEADER_BITS,
                available: 128,
            }))
        );
    }

    #[test]
    fn malformed_byte_lengths_are_rejected() {
        assert_eq!(Packet::from_bytes(&[0; 6]), Err(PacketError::Misaligned { len: 6 }));
        assert_eq!(
            Packet::from_bytes(&vec![0; MAX_PACKET_SIZE + 4]),
            Err(PacketError::TooLarge { len: MAX_PACKET_SIZE + 4 })
        );
        assert_eq!(Packet::from_bytes(&[]).map(|p| p.size_bytes()), Ok(0));
    }
}
