use crate::frame::WorldFrame;
use crate::input::Input;

const EMPTY: u32 = u32::MAX;

/// Ring of recent ticks: the input each tick consumed and the frame it
/// produced. Slots are preallocated and overwritten in place.
#[derive(Debug, Clone)]
pub struct TickHistory {
    frames: Vec<WorldFrame>,
    inputs: Vec<Input>,
    ticks: Vec<u32>,
}

impl TickHistory {
    /// Enough slots to cover `duration` seconds of ticks, and never fewer
    /// than two.
    pub fn slots_for(duration: f64, timestep: f64) -> usize {
        ((duration / timestep).ceil() as usize).max(2)
    }

    pub fn new(capacity: usize, template: &WorldFrame) -> Self {
        assert!(capacity > 0, "history needs at least one slot");
        Self {
            frames: vec![template.clone(); capacity],
            inputs: vec![Input::default(); capacity],
            ticks: vec![EMPTY; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.ticks.len()
    }

    fn slot(&self, tick: u32) -> usize {
        tick as usize % self.capacity()
    }

    pub fn record(&mut self, tick: u32, input: &Input, frame: &WorldFrame) {
        let slot = self.slot(tick);
        self.frames[slot].copy_from(frame);
        self.inputs[slot] = *input;
        self.ticks[slot] = tick;
    }

    pub fn frame(&self, tick: u32) -> Option<&WorldFrame> {
        let slot = self.slot(tick);
        (self.ticks[slot] == tick && tick != EMPTY).then(|| &self.frames[slot])
    }

    pub fn input(&self, tick: u32) -> Option<&Input> {
        let slot = self.slot(tick);
        (self.ticks[slot] == tick && tick != EMPTY).then(|| &self.inputs[slot])
    }

    /// Most recent recorded tick strictly before `tick`.
    pub fn latest_before(&self, tick: u32) -> Option<(u32, &WorldFrame)> {
        self.ticks
            .iter()
            .enumerate()
            .filter(|&(_, &recorded)| recorded != EMPTY && recorded < tick)
            .max_by_key(|&(_, &recorded)| recorded)
            .map(|(slot, &recorded)| (recorded, &self.frames[slot]))
    }

    pub fn clear(&mut self) {
        self.ticks.fill(EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::OrbitCamera;
    use crate::input::InputFlags;
    use glam::Vec3;

    fn frame_at(index: u32) -> WorldFrame {
        let mut frame = WorldFrame::new(1, OrbitCamera::default());
        frame.index = index;
        frame
    }

    #[test]
    fn slot_count_covers_duration() {
        assert_eq!(TickHistory::slots_for(1.0, 0.125), 8);
        assert_eq!(TickHistory::slots_for(0.3, 0.125), 3);
        assert_eq!(TickHistory::slots_for(0.0, 1.0 / 60.0), 2);
        assert_eq!(TickHistory::slots_for(0.01, 0.1), 2);
    }

    #[test]
    fn history_o1_lookup() {
        let mut history = TickHistory::new(16, &frame_at(0));

        for tick in 0..100u32 {
            history.record(tick, &Input::default(), &frame_at(tick));
        }

        assert_eq!(history.frame(90).map(|f| f.index), Some(90));
        assert!(history.frame(30).is_none());
        assert!(history.frame(100).is_none());
    }

    #[test]
    fn inputs_are_kept_per_tick() {
        let mut history = TickHistory::new(4, &frame_at(0));
        let jump = Input::new(Vec3::X, InputFlags::JUMP);
        history.record(1, &Input::default(), &frame_at(1));
        history.record(2, &jump, &frame_at(2));

        assert_eq!(history.input(2), Some(&jump));
        assert_eq!(history.input(1), Some(&Input::default()));
        assert_eq!(history.input(3), None);
    }

    #[test]
    fn latest_before() {
        let mut history = TickHistory::new(64, &frame_at(0));
        for tick in [10, 20, 30] {
            history.record(tick, &Input::default(), &frame_at(tick));
        }

        assert_eq!(history.latest_before(25).map(|(tick, _)| tick), Some(20));
        assert_eq!(history.latest_before(10), None);

        history.clear();
        assert_eq!(history.latest_before(100), None);
    }
}
