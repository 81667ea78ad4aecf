use serde::{Deserialize, Serialize};

use crate::bitpack::{BitStream, Pack};

pub const WINDOW_SIZE: u32 = 32;

/// Which of the 32 indices before `latest` have been seen.
///
/// `latest` itself is always present. Bit `latest - target - 1` of
/// `presence` holds `target` for `target` in `[latest - 32, latest)`, so bit
/// 0 is the index just before `latest` and bit 31 the oldest one tracked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresenceWindow {
    latest: u32,
    presence: u32,
}

impl PresenceWindow {
    pub fn new(latest: u32, presence: u32) -> Self {
        Self { latest, presence }
    }

    pub fn latest(&self) -> u32 {
        self.latest
    }

    pub fn present_flags(&self) -> u32 {
        self.presence
    }

    /// Oldest index still inside the window.
    pub fn oldest(&self) -> u32 {
        self.latest.saturating_sub(WINDOW_SIZE)
    }

    /// Records `index` as seen. Indices that already fell out of the window
    /// are ignored.
    pub fn mark_present(&mut self, index: u32) {
        if index < self.oldest() {
            return;
        }

        if index > self.latest {
            let diff = index - self.latest;
            self.presence = if diff > WINDOW_SIZE {
                0
            } else {
                (1 << (diff - 1)) | self.presence.checked_shl(diff).unwrap_or(0)
            };
            self.latest = index;
        } else if index < self.latest {
            self.presence |= 1 << (self.latest - index - 1);
        }
    }

    /// Merges two windows tracked independently. Argument order does not
    /// matter.
    pub fn combine(a: PresenceWindow, b: PresenceWindow) -> PresenceWindow {
        if a.latest == b.latest {
            return PresenceWindow::new(a.latest, a.presence | b.presence);
        }

        let (smaller, bigger) = if a.latest < b.latest { (a, b) } else { (b, a) };
        if bigger.oldest() > smaller.latest {
            return PresenceWindow::new(bigger.latest, 0);
        }

        let diff = bigger.latest - smaller.latest;
        let shifted = smaller.presence.checked_shl(diff).unwrap_or(0);
        PresenceWindow::new(bigger.latest, (1 << (diff - 1)) | shifted | bigger.presence)
    }

    pub fn contains(&self, target: u32) -> bool {
        if target == self.latest {
            return true;
        }
        if target > self.latest || target < self.oldest() {
            return false;
        }
        self.presence & (1 << (self.latest - target - 1)) != 0
    }

    /// Every present index, newest first.
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        let window = *self;
        (window.oldest()..=window.latest)
            .rev()
            .filter(move |&index| window.contains(index))
    }
}

impl Pack for PresenceWindow {
    fn pack<S: BitStream>(&mut self, stream: &mut S) {
        self.latest.pack(stream);
        self.presence.pack(stream);
    }
}
