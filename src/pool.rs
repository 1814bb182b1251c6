use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::PoolConfig;
use crate::filter::LoadFilter;
use crate::instrument;
use crate::message::{self, HostSink};
use crate::surface::{ContentSurface, SurfaceFactory, SurfaceRequest};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("no resident surface for id {id:?}")]
    NotFound { id: String },
    #[error("pool capacity must be at least 1")]
    ZeroCapacity,
}

/// One tracked content surface.
struct PoolEntry {
    id: String,
    url: Url,
    loaded: bool,
    /// Sole owner of the surface's lifecycle; dropping the entry releases it.
    surface: Box<dyn ContentSurface>,
}

/// The bounded set of live content surfaces for the feed.
///
/// The pool is the only component that mutates surface membership. All
/// operations are cooperative: the host event loop calls them sequentially,
/// none of them block on surface-side script execution, and instructions sent
/// to surfaces are fire-and-forget. Entries are stored in insertion order;
/// eviction is FIFO among non-active entries.
pub struct SurfacePool {
    capacity: usize,
    bootstrap: String,
    filter: LoadFilter,
    factory: Box<dyn SurfaceFactory>,
    sink: Box<dyn HostSink>,
    entries: Vec<PoolEntry>,
    active_id: Option<String>,
}

impl SurfacePool {
    pub fn new(
        config: PoolConfig,
        factory: Box<dyn SurfaceFactory>,
        sink: Box<dyn HostSink>,
    ) -> Result<Self, PoolError> {
        if config.capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        Ok(Self {
            capacity: config.capacity,
            bootstrap: instrument::bootstrap_script(&config.instrument),
            filter: LoadFilter::new(&config.extra_blocked_fragments),
            factory,
            sink,
            entries: Vec::with_capacity(config.capacity),
            active_id: None,
        })
    }

    /// Admit a surface for `id`, evicting if the pool is full. Idempotent:
    /// a resident id is left untouched, so no surface is ever created twice
    /// for the same id without an intervening eviction.
    pub fn preload(&mut self, id: &str, url: Url) {
        if self.contains(id) {
            debug!("preload {id}: already resident");
            return;
        }

        if self.entries.len() == self.capacity {
            self.evict_one();
        }

        debug!("admitting surface {id} for {url}");
        let surface = self.factory.create(SurfaceRequest {
            id,
            url: &url,
            bootstrap: &self.bootstrap,
            filter: self.filter.clone(),
        });
        self.entries.push(PoolEntry {
            id: id.to_string(),
            url,
            loaded: false,
            surface,
        });
    }

    /// Make `id` the single audible/interactive surface.
    ///
    /// The previously active surface is always instructed to mute before the
    /// new one is instructed to unmute. Both instructions are issuance-ordered
    /// only; each surface applies them asynchronously in its own context.
    pub fn set_active(&mut self, id: &str) -> Result<(), PoolError> {
        if !self.contains(id) {
            warn!("set_active {id}: not resident");
            return Err(PoolError::NotFound { id: id.to_string() });
        }

        if let Some(previous) = self.active_id.clone() {
            if previous != id {
                if let Some(entry) = self.entry(&previous) {
                    entry.surface.eval(&instrument::set_muted_script(true));
                }
            }
        }

        if let Some(entry) = self.entry(id) {
            entry.surface.eval(&instrument::set_muted_script(false));
        }

        debug!("active surface is now {id}");
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Borrow the surface handle for `id`, if resident.
    pub fn handle(&self, id: &str) -> Option<&dyn ContentSurface> {
        self.entry(id).map(|entry| entry.surface.as_ref())
    }

    /// Whether `id` is resident and its document has finished loading.
    /// Absent ids report false rather than failing.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.entry(id).map(|entry| entry.loaded).unwrap_or(false)
    }

    /// Deliver an arbitrary script to a resident surface. No-op when `id` is
    /// not resident.
    pub fn inject_script(&self, id: &str, script: &str) {
        match self.entry(id) {
            Some(entry) => entry.surface.eval(script),
            None => debug!("inject_script {id}: not resident, dropping"),
        }
    }

    /// Callback from a surface whose document finished loading. A late
    /// callback for an evicted id is discarded; it never resurrects the entry.
    pub fn on_surface_loaded(&mut self, id: &str) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                debug!("surface {id} finished loading");
                entry.loaded = true;
            }
            None => debug!("stale load callback for {id}, ignoring"),
        }
    }

    /// Callback from a surface with a raw payload. Decodable payloads from
    /// resident surfaces are forwarded to the host sink; everything else is
    /// dropped silently, since misbehaving content must not destabilize the
    /// host.
    pub fn on_surface_message(&mut self, id: &str, raw: &str) {
        if !self.contains(id) {
            debug!("stale message callback for {id}, ignoring");
            return;
        }
        if let Some(decoded) = message::decode(raw) {
            self.sink.on_message(id, decoded);
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn url_of(&self, id: &str) -> Option<&Url> {
        self.entry(id).map(|entry| &entry.url)
    }

    fn entry(&self, id: &str) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Remove the oldest-inserted non-active entry. When every resident entry
    /// is the active one (capacity 1), the active entry itself goes, and the
    /// activation is cleared so `active_id` keeps pointing at a resident
    /// entry or nothing.
    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .position(|entry| Some(entry.id.as_str()) != self.active_id.as_deref())
            .unwrap_or(0);
        let entry = self.entries.remove(victim);
        debug!("evicting surface {} to stay within capacity", entry.id);
        if self.active_id.as_deref() == Some(entry.id.as_str()) {
            self.active_id = None;
        }
        // entry drops here, releasing the underlying surface exactly once
    }
}
