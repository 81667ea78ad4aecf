/// Largest wall-clock delta fed into the accumulator per update, in seconds.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.25;

/// Turns variable frame deltas into a whole number of fixed ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    timestep: f64,
    accumulator: f64,
    max_frame_time: f64,
}

impl FixedTimestep {
    pub fn new(timestep: f64) -> Self {
        assert!(timestep > 0.0, "timestep must be positive, got {timestep}");
        Self {
            timestep,
            accumulator: 0.0,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
        }
    }

    pub fn from_tick_rate(tick_rate: u32) -> Self {
        assert!(tick_rate > 0, "tick rate must be positive");
        Self::new(1.0 / f64::from(tick_rate))
    }

    /// Deltas above `max_frame_time` are clamped before accumulating, which
    /// bounds the ticks a single stalled frame can trigger.
    pub fn with_max_frame_time(mut self, max_frame_time: f64) -> Self {
        assert!(
            max_frame_time > 0.0,
            "max frame time must be positive, got {max_frame_time}"
        );
        self.max_frame_time = max_frame_time;
        self
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn max_frame_time(&self) -> f64 {
        self.max_frame_time
    }

    /// Time accumulated toward the next tick.
    pub fn time_to_next_step(&self) -> f64 {
        self.accumulator
    }

    /// How far between the last tick and the next one we are, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.timestep) as f32
    }

    /// Accumulates `delta_time` and runs `step` once per whole timestep.
    /// Returns the number of ticks run.
    pub fn update<F: FnMut(f64)>(&mut self, delta_time: f64, mut step: F) -> u32 {
        assert!(delta_time >= 0.0, "negative frame delta {delta_time}");

        if delta_time > self.max_frame_time {
            log::debug!(
                "frame delta {:.1} ms clamped to {:.1} ms",
                delta_time * 1000.0,
                self.max_frame_time * 1000.0
            );
        }
        self.accumulator += delta_time.min(self.max_frame_time);

        let mut ticks = 0;
        while self.accumulator >= self.timestep {
            self.accumulator -= self.timestep;
            step(self.timestep);
            ticks += 1;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_timestep_accumulation() {
        let mut ts = FixedTimestep::from_tick_rate(60);
        let mut steps = Vec::new();

        assert_eq!(ts.update(1.0 / 30.0, |dt| steps.push(dt)), 2);
        assert_eq!(steps, vec![1.0 / 60.0; 2]);
    }

    #[test]
    fn four_timesteps_run_four_ticks() {
        let timestep = 1.0 / 60.0;
        let mut ts = FixedTimestep::new(timestep);
        let mut count = 0;

        ts.update(4.0 * timestep, |_| count += 1);

        assert_eq!(count, 4);
        assert!(ts.time_to_next_step().abs() < 1e-12);
    }

    #[test]
    fn remainder_carries_over() {
        let mut ts = FixedTimestep::new(0.1);
        let mut count = 0;

        ts.update(0.25, |_| count += 1);
        assert_eq!(count, 2);
        assert!((ts.time_to_next_step() - 0.05).abs() < 1e-9);
        assert!((ts.alpha() - 0.5).abs() < 1e-6);

        ts.update(0.06, |_| count += 1);
        assert_eq!(count, 3);
        assert!((ts.time_to_next_step() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn small_deltas_accumulate() {
        let mut ts = FixedTimestep::new(0.01);
        let mut count = 0;
        for _ in 0..9 {
            assert_eq!(ts.update(0.001, |_| count += 1), 0);
        }
        ts.update(0.0015, |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn stall_is_clamped() {
        let mut ts = FixedTimestep::from_tick_rate(60).with_max_frame_time(0.105);
        let ticks = ts.update(5.0, |_| {});
        assert_eq!(ticks, 6);
        assert!(ts.time_to_next_step() < ts.timestep());
    }

    #[test]
    fn default_clamp_is_quarter_second() {
        let mut ts = FixedTimestep::new(0.04);
        assert_eq!(ts.max_frame_time(), 0.25);
        assert_eq!(ts.update(10.0, |_| {}), 6);
    }

    #[test]
    fn alpha_does_not_advance() {
        let mut ts = FixedTimestep::new(0.1);
        ts.update(0.07, |_| {});
        let first = ts.alpha();
        for _ in 0..10 {
            assert_eq!(ts.alpha(), first);
        }
        assert!((ts.time_to_next_step() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_accumulator() {
        let mut ts = FixedTimestep::new(0.1);
        ts.update(0.05, |_| {});
        ts.reset();
        assert_eq!(ts.time_to_next_step(), 0.0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    #[should_panic(expected = "negative frame delta")]
    fn negative_delta_panics() {
        FixedTimestep::new(0.1).update(-0.01, |_| {});
    }

    #[test]
    #[should_panic(expected = "timestep must be positive")]
    fn zero_timestep_panics() {
        FixedTimestep::new(0.0);
    }
}
