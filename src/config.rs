use crate::instrument::InstrumentConfig;

/// Default number of simultaneously resident content surfaces.
pub const DEFAULT_CAPACITY: usize = 4;

/// Construction-time configuration for a [`crate::pool::SurfacePool`].
///
/// Everything that was an implicit global in earlier iterations (pool size,
/// mute defaults, blocked URL fragments) is passed explicitly here.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on simultaneously resident surfaces. Must be at least 1.
    pub capacity: usize,
    /// Behavior of the script injected into every surface at creation.
    pub instrument: InstrumentConfig,
    /// Deny-list fragments added on top of the built-in ad/analytics set.
    pub extra_blocked_fragments: Vec<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            instrument: InstrumentConfig::default(),
            extra_blocked_fragments: Vec::new(),
        }
    }
}

impl PoolConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}
