use std::sync::Arc;

/// Hostname fragments that mark a request as advertising or analytics traffic.
///
/// Matching is a case-insensitive substring test against the whole URL, so a
/// fragment blocks every subdomain and path under it.
const BLOCKED_FRAGMENTS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "googleadservices.com",
    "google-analytics.com",
    "googletagmanager.com",
    "adsbygoogle",
    "amazon-adsystem.com",
    "adservice.google",
    "unityads.unity3d.com",
    "applovin.com",
    "ironsrc.com",
    "adsdk",
    "admob",
];

/// Policy predicate consulted by a surface before it follows a navigation or
/// sub-resource load. Purely textual: no network access, no state, no side
/// effects. Surfaces must consult it on every navigation attempt, not only the
/// initial document load.
#[derive(Debug, Clone)]
pub struct LoadFilter {
    extra: Arc<[String]>,
}

impl Default for LoadFilter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl LoadFilter {
    /// Build a filter with the built-in deny-list plus `extra` fragments.
    /// Fragments are lower-cased once here so `allow` stays allocation-free on
    /// the fragment side.
    pub fn new(extra: &[String]) -> Self {
        let extra: Vec<String> = extra.iter().map(|f| f.to_ascii_lowercase()).collect();
        Self {
            extra: extra.into(),
        }
    }

    /// Returns false when the URL should be blocked.
    pub fn allow(&self, target_url: &str) -> bool {
        let lowered = target_url.to_ascii_lowercase();
        if BLOCKED_FRAGMENTS.iter().any(|f| lowered.contains(f)) {
            return false;
        }
        !self.extra.iter().any(|f| lowered.contains(f.as_str()))
    }
}
