use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// In-memory link: datagrams arrive a fixed number of frames after they were
/// sent, and every `drop_every`-th one never arrives.
#[derive(Debug, Default)]
pub struct Loopback {
    in_flight: VecDeque<(u64, Vec<u8>)>,
    latency_frames: u64,
    drop_every: u32,
    sent: u32,
    dropped: u64,
}

impl Loopback {
    pub fn new(latency_frames: usize, drop_every: u32) -> Self {
        Self {
            latency_frames: latency_frames as u64,
            drop_every,
            ..Self::default()
        }
    }

    pub fn send(&mut self, frame: u64, bytes: Vec<u8>) {
        self.sent = self.sent.wrapping_add(1);
        if self.drop_every > 0 && self.sent % self.drop_every == 0 {
            self.dropped += 1;
            log::trace!("dropped datagram {} sent on frame {frame}", self.sent);
            return;
        }
        self.in_flight.push_back((frame + self.latency_frames, bytes));
    }

    /// Datagrams due by `frame`, in send order.
    pub fn take_ready(&mut self, frame: u64) -> Vec<Vec<u8>> {
        let mut ready = Vec::new();
        while self.in_flight.front().is_some_and(|(due, _)| *due <= frame) {
            if let Some((_, bytes)) = self.in_flight.pop_front() {
                ready.push(bytes);
            }
        }
        ready
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Repeatable pseudo-random value in `[0, 1]` for `seed`.
pub fn noise(seed: u64) -> f64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    hasher.finish() as f64 / u64::MAX as f64
}
