//! Demo host for the playfeed pool: simulates a user scrolling through a
//! short-game feed over a fake surface backend. The real application embeds a
//! webview here; this binary stands in for it so the pooling behavior can be
//! observed end to end with `RUST_LOG=debug`.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use playfeed::{
    ContentSurface, FeedMessage, PoolConfig, SurfaceFactory, SurfacePool, SurfaceRequest,
};

/// Events a surface backend reports to the host event loop.
enum FeedEvent {
    Loaded(String),
    Message { id: String, payload: String },
}

/// Fake surface: logs injected scripts and emits a load callback plus one
/// game-over message on a timer, the way a real game payload would.
struct DemoSurface {
    id: String,
}

impl ContentSurface for DemoSurface {
    fn eval(&self, script: &str) {
        let snippet = script.lines().next().unwrap_or_default();
        debug!("surface {} <- {snippet}", self.id);
    }
}

struct DemoFactory {
    events: UnboundedSender<FeedEvent>,
}

impl SurfaceFactory for DemoFactory {
    fn create(&mut self, request: SurfaceRequest<'_>) -> Box<dyn ContentSurface> {
        let id = request.id.to_string();
        debug!(
            "creating surface {id} for {} (bootstrap: {} bytes)",
            request.url,
            request.bootstrap.len()
        );

        if !request.filter.allow(request.url.as_str()) {
            warn!("surface {id}: initial load blocked by filter");
        } else {
            let events = self.events.clone();
            let callback_id = id.clone();
            // pretend to load the document, then play one round
            tokio::spawn(async move {
                sleep(Duration::from_millis(50)).await;
                let _ = events.send(FeedEvent::Loaded(callback_id.clone()));
                sleep(Duration::from_millis(150)).await;
                let score = callback_id.len() * 100;
                let _ = events.send(FeedEvent::Message {
                    id: callback_id,
                    payload: format!(r#"{{"type":"gameOver","score":{score}}}"#),
                });
            });
        }

        Box::new(DemoSurface { id })
    }
}

fn main() {
    let subscriber_result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
    if subscriber_result.is_err() {
        // tracing was already initialised; continue silently
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| {
            eprintln!("failed to start runtime: {err}");
            std::process::exit(1);
        });

    if let Err(err) = rt.block_on(run()) {
        eprintln!("demo session failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let factory = DemoFactory { events: events_tx };
    let sink = |id: &str, message: FeedMessage| match message {
        FeedMessage::GameOver { score } => info!("{id}: game over, score {score}"),
        FeedMessage::Other(object) => info!("{id}: message {object:?}"),
    };

    let mut pool = SurfacePool::new(PoolConfig::default(), Box::new(factory), Box::new(sink))?;

    let catalogue = [
        ("neon-runner", "https://games.example/neon-runner/"),
        ("stack-tower", "https://games.example/stack-tower/"),
        // never loads: the filter blocks ad-server URLs
        ("sponsored-card", "https://ads.doubleclick.net/promo/"),
        ("orbit-dash", "https://games.example/orbit-dash/"),
        ("pixel-golf", "https://games.example/pixel-golf/"),
        ("slime-climb", "https://games.example/slime-climb/"),
        ("laser-maze", "https://games.example/laser-maze/"),
    ];

    for (index, (id, url)) in catalogue.iter().enumerate() {
        // Scroll step: current card becomes active, next card preloads.
        pool.preload(id, Url::parse(url)?);
        pool.set_active(id)?;
        info!(
            "viewing {id} ({} of {}, {} surfaces resident)",
            index + 1,
            catalogue.len(),
            pool.len()
        );
        if let Some((next_id, next_url)) = catalogue.get(index + 1) {
            pool.preload(next_id, Url::parse(next_url)?);
        }

        // Pump surface callbacks for a beat, as the host event loop would.
        let deadline = sleep(Duration::from_millis(300));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                Some(event) = events_rx.recv() => match event {
                    FeedEvent::Loaded(id) => pool.on_surface_loaded(&id),
                    FeedEvent::Message { id, payload } => {
                        pool.on_surface_message(&id, &payload)
                    }
                },
            }
        }
    }

    info!("session over, {} surfaces still resident", pool.len());
    Ok(())
}
