use url::Url;

use crate::filter::LoadFilter;

/// An isolated, sandboxed rendering host: it loads a document, runs injected
/// scripts in its own context, and emits string payloads back to its owner.
///
/// This crate treats the surface as a capability. Real backends (a webview, an
/// embedded JS engine) live with the host application; the pool only needs the
/// one-way script channel below plus exclusive ownership of the handle, which
/// it releases by dropping the box on eviction.
pub trait ContentSurface {
    /// Queue a script for evaluation in the surface's script context.
    ///
    /// Fire-and-forget: returns immediately and offers no completion signal.
    /// The surface executes asynchronously at its own pace; callers must not
    /// assume the script has run when this returns.
    fn eval(&self, script: &str);
}

/// Everything the pool hands to a backend when admitting a new entry.
pub struct SurfaceRequest<'a> {
    /// Game/session id the surface will report callbacks under.
    pub id: &'a str,
    /// Document to load.
    pub url: &'a Url,
    /// Instrumentation script to attach as a load-time hook, before any
    /// script from the loaded document runs.
    pub bootstrap: &'a str,
    /// Navigation policy the surface must consult on every load attempt.
    pub filter: LoadFilter,
}

/// Creates surfaces on demand. Implemented by the host application over its
/// real rendering backend; the pool calls it exactly once per admission.
pub trait SurfaceFactory {
    fn create(&mut self, request: SurfaceRequest<'_>) -> Box<dyn ContentSurface>;
}
