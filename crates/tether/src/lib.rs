pub mod bitpack;
pub mod collections;
pub mod debug;
pub mod director;
pub mod frame;
pub mod input;
pub mod net;
pub mod objects;
pub mod physics;
pub mod presence;
pub mod simulation;

pub use director::{GameDirector, PlayerDirector, PlayerTuning};
pub use frame::{OrbitCamera, Pose, Scene, SceneConfig, WorldFrame};
pub use input::{Input, InputFlags};
pub use net::{Endpoint, Packet, PacketError, PacketHeader};
pub use objects::{ObjectId, ObjectRegistry};
pub use physics::{PhysicsEngine, RapierPhysics};
pub use presence::PresenceWindow;
pub use simulation::{FixedTimestep, Simulate, SimulationConfig, Simulator, TickHistory};
