//! Scenario tests driving the pool through whole feed sessions, the way the
//! host application does: preload ahead of the scroll position, activate on
//! snap, consume relayed messages.

use std::cell::RefCell;
use std::rc::Rc;

use playfeed::{
    instrument, ContentSurface, FeedMessage, PoolConfig, SurfaceFactory, SurfacePool,
    SurfaceRequest,
};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
enum Issued {
    Created { id: String, url: String },
    Eval { id: String, script: String },
    Released { id: String },
}

type Log = Rc<RefCell<Vec<Issued>>>;

struct ScriptedSurface {
    id: String,
    log: Log,
}

impl ContentSurface for ScriptedSurface {
    fn eval(&self, script: &str) {
        self.log.borrow_mut().push(Issued::Eval {
            id: self.id.clone(),
            script: script.to_string(),
        });
    }
}

impl Drop for ScriptedSurface {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Issued::Released {
            id: self.id.clone(),
        });
    }
}

struct ScriptedFactory {
    log: Log,
}

impl SurfaceFactory for ScriptedFactory {
    fn create(&mut self, request: SurfaceRequest<'_>) -> Box<dyn ContentSurface> {
        assert!(
            request.bootstrap.contains("__feedSetMuted"),
            "every surface must receive the instrumentation bootstrap"
        );
        assert!(
            request.filter.allow("https://games.example/asset.png"),
            "filter must be usable at creation time"
        );
        self.log.borrow_mut().push(Issued::Created {
            id: request.id.to_string(),
            url: request.url.to_string(),
        });
        Box::new(ScriptedSurface {
            id: request.id.to_string(),
            log: Rc::clone(&self.log),
        })
    }
}

struct Harness {
    pool: SurfacePool,
    log: Log,
    received: Rc<RefCell<Vec<(String, FeedMessage)>>>,
}

fn harness(capacity: usize) -> Harness {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let received: Rc<RefCell<Vec<(String, FeedMessage)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink_received = Rc::clone(&received);
    let sink = move |id: &str, message: FeedMessage| {
        sink_received.borrow_mut().push((id.to_string(), message));
    };
    let pool = SurfacePool::new(
        PoolConfig::with_capacity(capacity),
        Box::new(ScriptedFactory {
            log: Rc::clone(&log),
        }),
        Box::new(sink),
    )
    .expect("valid capacity");
    Harness {
        pool,
        log,
        received,
    }
}

fn game_url(id: &str) -> Url {
    Url::parse(&format!("https://games.example/{id}/")).expect("valid url")
}

#[test]
fn preloading_past_capacity_evicts_fifo_but_never_the_active_card() {
    let mut h = harness(4);
    for id in ["a", "b", "c", "d"] {
        h.pool.preload(id, game_url(id));
    }
    h.pool.set_active("a").expect("a resident");

    h.pool.preload("e", game_url("e"));

    assert_eq!(h.pool.len(), 4);
    assert!(h.pool.contains("a"), "active card must survive eviction");
    assert!(h.pool.contains("e"));
    assert!(!h.pool.contains("b"), "oldest non-active card is the victim");

    let released = h
        .log
        .borrow()
        .iter()
        .filter(|i| matches!(i, Issued::Released { .. }))
        .count();
    assert_eq!(released, 1, "exactly one surface handle was released");
}

#[test]
fn scroll_session_keeps_exactly_one_card_audible() {
    let mut h = harness(4);
    h.pool.preload("a", game_url("a"));
    h.pool.preload("b", game_url("b"));

    h.pool.set_active("a").expect("a resident");
    h.pool.set_active("b").expect("b resident");
    h.pool.set_active("a").expect("a resident");

    assert_eq!(h.pool.active_id(), Some("a"));

    let evals: Vec<(String, String)> = h
        .log
        .borrow()
        .iter()
        .filter_map(|i| match i {
            Issued::Eval { id, script } => Some((id.clone(), script.clone())),
            _ => None,
        })
        .collect();

    let unmute = instrument::set_muted_script(false);
    let mute = instrument::set_muted_script(true);
    assert_eq!(
        evals,
        vec![
            ("a".to_string(), unmute.clone()),
            ("a".to_string(), mute.clone()),
            ("b".to_string(), unmute.clone()),
            ("b".to_string(), mute.clone()),
            ("a".to_string(), unmute.clone()),
        ]
    );

    // every mute to a card is issued before the following unmute
    let first_b_unmute = evals
        .iter()
        .position(|(id, script)| id == "b" && *script == unmute)
        .expect("b was unmuted");
    let a_muted_before = evals[..first_b_unmute]
        .iter()
        .any(|(id, script)| id == "a" && *script == mute);
    assert!(a_muted_before);
}

#[test]
fn late_callbacks_for_evicted_cards_are_discarded() {
    let mut h = harness(2);
    h.pool.preload("a", game_url("a"));
    h.pool.preload("b", game_url("b"));
    h.pool.preload("c", game_url("c")); // evicts "a" mid-load

    h.pool.on_surface_loaded("a");
    h.pool.on_surface_message("a", r#"{"type":"gameOver","score":10}"#);

    assert!(!h.pool.contains("a"));
    assert!(!h.pool.is_loaded("a"));
    assert!(h.received.borrow().is_empty());
}

#[test]
fn game_over_messages_are_relayed_with_decoded_scores() {
    let mut h = harness(4);
    h.pool.preload("a", game_url("a"));
    h.pool.on_surface_loaded("a");

    h.pool.on_surface_message("a", r#"{"type":"gameOver","score":2450}"#);
    h.pool.on_surface_message("a", "{not valid}");
    h.pool.on_surface_message("a", "plain text, not json");

    let received = h.received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        (
            "a".to_string(),
            FeedMessage::GameOver { score: 2450.0 }
        )
    );
}

#[test]
fn long_scroll_respects_capacity_and_creates_each_card_once() {
    let mut h = harness(4);
    let ids: Vec<String> = (0..12).map(|i| format!("game-{i}")).collect();

    for (index, id) in ids.iter().enumerate() {
        h.pool.preload(id, game_url(id));
        h.pool.set_active(id).expect("just preloaded");
        if let Some(next) = ids.get(index + 1) {
            h.pool.preload(next, game_url(next));
        }
        assert!(h.pool.len() <= 4);
    }

    let creations = h
        .log
        .borrow()
        .iter()
        .filter(|i| matches!(i, Issued::Created { .. }))
        .count();
    assert_eq!(creations, 12, "one surface per card, no re-creation");
}
