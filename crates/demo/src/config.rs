use tether::SimulationConfig;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub simulation: SimulationConfig,
    /// Rendered frames to run.
    pub frames: u32,
    pub packet_bytes: usize,
    /// Drop every n-th client packet; 0 keeps them all.
    pub drop_every: u32,
    /// Client packets spend this many frames in flight.
    pub latency_frames: usize,
    /// Frame times vary by up to this fraction of a tick.
    pub jitter: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            frames: 600,
            packet_bytes: 64,
            drop_every: 0,
            latency_frames: 3,
            jitter: 0.5,
        }
    }
}
