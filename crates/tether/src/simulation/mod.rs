mod config;
mod history;
mod simulator;
mod timestep;

pub use config::{SimulationConfig, DEFAULT_TICK_RATE};
pub use history::TickHistory;
pub use simulator::{Simulate, Simulator};
pub use timestep::{FixedTimestep, DEFAULT_MAX_FRAME_TIME};
