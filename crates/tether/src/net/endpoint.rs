use std::time::Instant;

use super::header::PacketHeader;
use super::packet::{Packet, PacketError};
use super::tracking::{AckTracker, ReceiveTracker};
use crate::bitpack::Pack;
use crate::presence::PresenceWindow;

const MAX_PENDING: usize = 256;

#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub packets_acked: u64,
    pub packets_rejected: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub rtt_ms: f32,
    pub rtt_variance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Received<T> {
    pub sequence: u32,
    pub payload: T,
    /// Our sequences the peer confirmed with this packet.
    pub acked: Vec<u32>,
}

/// One side of a packet exchange: numbers outgoing packets, echoes receipts
/// for incoming ones and matches the peer's receipts against what it sent.
#[derive(Debug)]
pub struct Endpoint {
    packet_bytes: usize,
    next_sequence: u32,
    received: ReceiveTracker,
    acks: AckTracker,
    stats: NetworkStats,
}

impl Endpoint {
    pub fn new(packet_bytes: usize) -> Self {
        Self {
            packet_bytes,
            // 0 is never sent
            next_sequence: 1,
            received: ReceiveTracker::new(),
            acks: AckTracker::new(MAX_PENDING),
            stats: NetworkStats::default(),
        }
    }

    pub fn send<T: Pack>(&mut self, payload: &mut T, now: Instant) -> Result<Packet, PacketError> {
        let sequence = self.next_sequence;
        let receipts = self.received.receipts().unwrap_or_default();

        let mut packet = Packet::new(self.packet_bytes);
        packet.pack_payload(PacketHeader::new(sequence, receipts), payload)?;

        self.next_sequence = self.next_sequence.wrapping_add(1).max(1);
        self.acks.track_packet(sequence, now);
        self.stats.packets_sent += 1;
        self.stats.bytes_sent += packet.size_bytes() as u64;
        log::trace!("sent #{sequence} ({} bytes)", packet.size_bytes());
        Ok(packet)
    }

    /// Decodes `bytes`. Duplicates and packets too old to track yield
    /// `Ok(None)`.
    pub fn receive<T: Pack + Default>(
        &mut self,
        bytes: &[u8],
        payload_bits: usize,
        now: Instant,
    ) -> Result<Option<Received<T>>, PacketError> {
        let decoded = Packet::from_bytes(bytes).and_then(|packet| {
            packet.unpack(payload_bits, |unpacker| {
                let mut payload = T::default();
                payload.pack(unpacker);
                payload
            })
        });
        let (header, payload) = match decoded {
            Ok(decoded) => decoded,
            Err(err) => {
                self.stats.packets_rejected += 1;
                log::warn!("dropping malformed packet: {err}");
                return Err(err);
            }
        };

        self.stats.bytes_received += bytes.len() as u64;
        if !self.received.record_received(header.sequence) {
            log::debug!("ignoring duplicate or stale #{}", header.sequence);
            return Ok(None);
        }
        self.stats.packets_received += 1;

        // Sequence 0 is never sent, so a default window carries no receipts.
        let acked = if header.receipts == PresenceWindow::default() {
            Vec::new()
        } else {
            self.acks.process_receipts(&header.receipts, now)
        };
        self.stats.packets_acked += acked.len() as u64;
        self.stats.rtt_ms = self.acks.srtt();
        self.stats.rtt_variance = self.acks.rtt_var();

        Ok(Some(Received {
            sequence: header.sequence,
            payload,
            acked,
        }))
    }

    pub fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    pub fn unacked_count(&self) -> usize {
        self.acks.unacked_count()
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }
}
