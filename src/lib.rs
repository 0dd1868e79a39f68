pub mod camera;
pub mod manager;
pub mod placement;
pub mod pool;
pub mod recycler;
pub mod rng;
pub mod scenario;
pub mod scheduler;
pub mod sim;
pub mod snapshot;
pub mod viewport;
pub mod world;

pub use manager::{ConfigError, KindConfig, KindId, StreamHost, StreamManager, TickReport};
pub use placement::{PlacementParams, SpawnDecision};
pub use pool::{Handle, Pool, PoolError};
pub use scenario::{Scenario, ScenarioLoader};
pub use sim::{SimSettings, Simulation};
pub use viewport::{Vec2, ViewWindow, ViewpointState};
