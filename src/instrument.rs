//! The script injected into every content surface at creation.
//!
//! Game payloads are third-party and untrusted: they declare their own
//! viewports, autoplay audio, embed ad slots, and call monetization SDKs that
//! do not exist here. The bootstrap script neutralizes all of that inside the
//! surface's own context and exposes a single toggle, `__feedSetMuted`, which
//! is what the pool invokes when the active surface changes.

/// Ad/interstitial markers hidden via injected style rules.
const DEFAULT_AD_SELECTORS: &[&str] = &[
    "ins.adsbygoogle",
    ".adsbygoogle",
    "#ad-container",
    "#banner-ad",
    ".interstitial-overlay",
    "[id^='google_ads']",
    "iframe[src*='ads']",
];

/// Behavior knobs for the bootstrap script. Defaults match the feed contract:
/// surfaces are silent until explicitly activated.
#[derive(Debug, Clone)]
pub struct InstrumentConfig {
    /// Initial value of the surface-local muted flag.
    pub start_muted: bool,
    /// CSS selectors for elements to hide.
    pub ad_selectors: Vec<String>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            start_muted: true,
            ad_selectors: DEFAULT_AD_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Build the script a surface runs before any document script.
pub fn bootstrap_script(config: &InstrumentConfig) -> String {
    let hide_rule = if config.ad_selectors.is_empty() {
        String::new()
    } else {
        format!(
            "{} {{ display: none !important; }}",
            config.ad_selectors.join(", ")
        )
    };

    BOOTSTRAP_TEMPLATE
        .replace("@@MUTED@@", if config.start_muted { "true" } else { "false" })
        .replace("@@HIDE_RULE@@", &hide_rule)
}

/// The toggle snippet the pool issues when activation changes.
pub fn set_muted_script(muted: bool) -> String {
    format!("window.__feedSetMuted({muted});")
}

const BOOTSTRAP_TEMPLATE: &str = r#"(function () {
  if (window.__feedInstrumented) { return; }
  window.__feedInstrumented = true;

  var muted = @@MUTED@@;
  var sources = [];
  var contexts = [];

  function silence(el) {
    el.muted = true;
    el.volume = 0;
    try { el.pause(); } catch (e) {}
  }

  function track(el) {
    if (sources.indexOf(el) === -1) { sources.push(el); }
    if (muted) { silence(el); }
  }

  // Fixed, non-zoomable viewport regardless of what the document declares.
  var viewport = document.querySelector('meta[name="viewport"]');
  if (!viewport) {
    viewport = document.createElement('meta');
    viewport.setAttribute('name', 'viewport');
    (document.head || document.documentElement).appendChild(viewport);
  }
  viewport.setAttribute('content',
    'width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no');

  // Audio element construction goes through the tracker.
  var NativeAudio = window.Audio;
  if (NativeAudio) {
    window.Audio = function (src) {
      var el = src === undefined ? new NativeAudio() : new NativeAudio(src);
      track(el);
      return el;
    };
    window.Audio.prototype = NativeAudio.prototype;
  }

  // While muted, play() succeeds silently. Game logic that branches on the
  // play promise must see it resolve.
  if (window.HTMLMediaElement) {
    var nativePlay = HTMLMediaElement.prototype.play;
    HTMLMediaElement.prototype.play = function () {
      track(this);
      var result = nativePlay.apply(this, arguments);
      if (result && typeof result.catch === 'function') {
        return result.catch(function () {});
      }
      return Promise.resolve();
    };
  }

  ['AudioContext', 'webkitAudioContext'].forEach(function (name) {
    var Native = window[name];
    if (!Native) { return; }
    window[name] = function () {
      var ctx = new Native();
      contexts.push(ctx);
      if (muted && ctx.suspend) { ctx.suspend(); }
      return ctx;
    };
    window[name].prototype = Native.prototype;
  });

  // Media elements inserted after load get the same treatment.
  var observer = new MutationObserver(function (records) {
    records.forEach(function (record) {
      Array.prototype.forEach.call(record.addedNodes, function (node) {
        if (!node || !node.tagName) { return; }
        if (node.tagName === 'AUDIO' || node.tagName === 'VIDEO') { track(node); }
        if (node.querySelectorAll) {
          Array.prototype.forEach.call(node.querySelectorAll('audio,video'), track);
        }
      });
    });
  });
  observer.observe(document.documentElement, { childList: true, subtree: true });

  var style = document.createElement('style');
  style.textContent = "@@HIDE_RULE@@" +
    " * { -webkit-user-select: none; user-select: none; -webkit-touch-callout: none; }";
  (document.head || document.documentElement).appendChild(style);
  document.addEventListener('contextmenu', function (e) { e.preventDefault(); }, true);
  document.addEventListener('selectstart', function (e) { e.preventDefault(); }, true);

  // Stub SDK so payloads written against a real monetization SDK do not
  // error. afterAd fires its resume callback immediately: there is no ad, so
  // paused game logic must not be left waiting.
  window.FeedAdsSDK = {
    showBanner: function () { return true; },
    hideBanner: function () { return true; },
    showInterstitial: function () { return Promise.resolve({ shown: false }); },
    showRewarded: function () { return Promise.resolve({ rewarded: true }); },
    gameplayStart: function () {},
    gameplayStop: function () {},
    afterAd: function (callback) {
      if (typeof callback === 'function') { callback(); }
    }
  };

  window.__feedSetMuted = function (next) {
    muted = !!next;
    sources.forEach(function (el) {
      if (muted) {
        silence(el);
      } else {
        el.muted = false;
        el.volume = 1;
      }
    });
    contexts.forEach(function (ctx) {
      try {
        if (muted && ctx.suspend) { ctx.suspend(); }
        if (!muted && ctx.resume) { ctx.resume(); }
      } catch (e) {}
    });
  };
})();
"#;
