use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A structured message relayed from sandboxed game content to the host.
///
/// Game payloads emit JSON strings; the only shape this crate interprets is
/// `{"type": "gameOver", "score": <number>}`. Any other well-formed JSON
/// object is passed through as [`FeedMessage::Other`] so hosts can consume
/// message types the feed itself has no opinion about.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    GameOver { score: f64 },
    Other(Map<String, Value>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum KnownMessage {
    #[serde(rename = "gameOver")]
    GameOver { score: f64 },
}

/// Best-effort decode of a raw surface payload.
///
/// Returns `None` for anything that is not a JSON object — content is
/// third-party and untrusted, so a malformed payload is dropped rather than
/// surfaced as an error.
pub fn decode(raw: &str) -> Option<FeedMessage> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!("dropping undecodable surface payload: {err}");
            return None;
        }
    };

    let Value::Object(object) = value else {
        debug!("dropping non-object surface payload");
        return None;
    };

    match serde_json::from_value::<KnownMessage>(Value::Object(object.clone())) {
        Ok(KnownMessage::GameOver { score }) => Some(FeedMessage::GameOver { score }),
        Err(_) => Some(FeedMessage::Other(object)),
    }
}

/// Host-side consumer of relayed surface messages.
///
/// Implemented by the host application; the pool forwards `(id, message)` here
/// for every payload that survives [`decode`] while its id is still resident.
pub trait HostSink {
    fn on_message(&mut self, id: &str, message: FeedMessage);
}

/// Sink that discards everything. Useful for hosts that only care about the
/// pooling behavior, and for tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl HostSink for NullSink {
    fn on_message(&mut self, _id: &str, _message: FeedMessage) {}
}

impl<F: FnMut(&str, FeedMessage)> HostSink for F {
    fn on_message(&mut self, id: &str, message: FeedMessage) {
        self(id, message)
    }
}
