use std::collections::VecDeque;
use std::time::Instant;

use crate::presence::PresenceWindow;

#[derive(Debug, Clone)]
pub struct PendingPacket {
    pub sequence: u32,
    pub send_time: Instant,
    pub acked: bool,
}

/// Sent sequences waiting for the peer's receipts, plus a smoothed RTT.
#[derive(Debug)]
pub struct AckTracker {
    pending: VecDeque<PendingPacket>,
    max_pending: usize,
    srtt: f32,
    rtt_var: f32,
}

impl AckTracker {
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(max_pending),
            max_pending,
            srtt: 100.0,
            rtt_var: 50.0,
        }
    }

    pub fn track_packet(&mut self, sequence: u32, now: Instant) {
        while self.pending.len() >= self.max_pending {
            self.pending.pop_front();
        }

        self.pending.push_back(PendingPacket {
            sequence,
            send_time: now,
            acked: false,
        });
    }

    /// Marks every pending sequence present in `receipts` as acknowledged
    /// and returns the newly acknowledged ones, oldest first.
    pub fn process_receipts(&mut self, receipts: &PresenceWindow, now: Instant) -> Vec<u32> {
        let mut acked_sequences = Vec::new();
        let mut rtt_samples = Vec::new();

        for pending in &mut self.pending {
            if pending.acked || !receipts.contains(pending.sequence) {
                continue;
            }

            pending.acked = true;
            acked_sequences.push(pending.sequence);
            rtt_samples.push(now.duration_since(pending.send_time).as_secs_f32() * 1000.0);
        }

        for rtt in rtt_samples {
            self.update_rtt(rtt);
        }

        while self.pending.front().is_some_and(|p| p.acked) {
            self.pending.pop_front();
        }

        acked_sequences
    }

    fn update_rtt(&mut self, rtt: f32) {
        const ALPHA: f32 = 0.125;
        const BETA: f32 = 0.25;

        let diff = (rtt - self.srtt).abs();
        self.rtt_var = (1.0 - BETA) * self.rtt_var + BETA * diff;
        self.srtt = (1.0 - ALPHA) * self.srtt + ALPHA * rtt;
    }

    /// Smoothed round-trip time in milliseconds.
    pub fn srtt(&self) -> f32 {
        self.srtt
    }

    pub fn rtt_var(&self) -> f32 {
        self.rtt_var
    }

    pub fn unacked_count(&self) -> usize {
        self.pending.iter().filter(|p| !p.acked).count()
    }
}

/// Receipt window for incoming sequences, echoed back in every outgoing
/// header.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiveTracker {
    receipts: PresenceWindow,
    received_any: bool,
}

impl ReceiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` for duplicates and for sequences too old to track.
    pub fn record_received(&mut self, sequence: u32) -> bool {
        if !self.received_any {
            self.receipts = PresenceWindow::new(sequence, 0);
            self.received_any = true;
            return true;
        }

        if sequence < self.receipts.oldest() || self.receipts.contains(sequence) {
            return false;
        }
        self.receipts.mark_present(sequence);
        true
    }

    /// What to acknowledge. Before anything arrived this is `None`, since an
    /// empty window would still claim its `latest` index.
    pub fn receipts(&self) -> Option<PresenceWindow> {
        self.received_any.then_some(self.receipts)
    }
}
