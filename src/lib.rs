// Library exports for hosts and tests

pub mod config;
pub mod filter;
pub mod instrument;
pub mod message;
pub mod pool;
pub mod surface;

// Re-export the types a host application touches
pub use config::PoolConfig;
pub use filter::LoadFilter;
pub use instrument::InstrumentConfig;
pub use message::{FeedMessage, HostSink, NullSink};
pub use pool::{PoolError, SurfacePool};
pub use surface::{ContentSurface, SurfaceFactory, SurfaceRequest};
