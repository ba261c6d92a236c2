use crate::{ARAnchor, ARFrameData, ARHitTestResult, ARTrackingState};
use serde::Serialize;
use thiserror::Error;

/// Events the bridge pushes to the client. None of them is acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum ARBridgeEvent {
    // Snapshot of one camera frame
    Frame(ARFrameData),

    // Anchors the engine started tracking, batched per engine callback
    AnchorsAdded(Vec<ARAnchor>),

    // Anchors the engine stopped tracking, batched per engine callback
    AnchorsRemoved(Vec<ARAnchor>),

    // Answer to a hitTest command, nearest result first
    HitTest(Vec<ARHitTestResult>),

    // The session stopped receiving camera frames, e.g. the app went to background
    SessionInterrupted,

    SessionInterruptionEnded,

    TrackingStateChange(ARTrackingState),
}

#[derive(Serialize)]
struct AnchorsPayload<'a> {
    anchors: &'a [ARAnchor],
}

#[derive(Serialize)]
struct HitTestPayload<'a> {
    results: &'a [ARHitTestResult],
}

#[derive(Serialize)]
struct EmptyPayload {}

impl ARBridgeEvent {
    /// Name of the client entry point receiving the event.
    pub fn name(&self) -> &'static str {
        match *self {
            ARBridgeEvent::Frame(_) => "onARFrame",
            ARBridgeEvent::AnchorsAdded(_) => "onAnchorsAdded",
            ARBridgeEvent::AnchorsRemoved(_) => "onAnchorsRemoved",
            ARBridgeEvent::HitTest(_) => "onHitTest",
            ARBridgeEvent::SessionInterrupted => "onSessionInterupted",
            ARBridgeEvent::SessionInterruptionEnded => "onSessionInteruptedEnded",
            ARBridgeEvent::TrackingStateChange(_) => "onTrackingStateChange",
        }
    }

    fn is_finite(&self) -> bool {
        match *self {
            ARBridgeEvent::Frame(ref frame) => frame.is_finite(),
            ARBridgeEvent::AnchorsAdded(ref anchors) |
            ARBridgeEvent::AnchorsRemoved(ref anchors) => anchors.iter().all(ARAnchor::is_finite),
            ARBridgeEvent::HitTest(ref results) => results.iter().all(ARHitTestResult::is_finite),
            ARBridgeEvent::SessionInterrupted |
            ARBridgeEvent::SessionInterruptionEnded |
            ARBridgeEvent::TrackingStateChange(_) => true,
        }
    }

    /// JSON text of the event payload.
    ///
    /// Fails on non-finite numbers, which JSON cannot carry, instead of
    /// letting them degrade to `null`.
    pub fn encode(&self) -> Result<ARClientMessage, EncodeError> {
        let name = self.name();
        if !self.is_finite() {
            return Err(EncodeError::NonFinite(name));
        }
        let payload = match *self {
            ARBridgeEvent::Frame(ref frame) => to_json(name, frame),
            ARBridgeEvent::AnchorsAdded(ref anchors) |
            ARBridgeEvent::AnchorsRemoved(ref anchors) => to_json(name, &AnchorsPayload { anchors: anchors }),
            ARBridgeEvent::HitTest(ref results) => to_json(name, &HitTestPayload { results: results }),
            ARBridgeEvent::SessionInterrupted |
            ARBridgeEvent::SessionInterruptionEnded => to_json(name, &EmptyPayload {}),
            ARBridgeEvent::TrackingStateChange(state) => to_json(name, state.name()),
        }?;
        Ok(ARClientMessage {
            name: name.to_owned(),
            payload: payload,
        })
    }
}

fn to_json<T: Serialize + ?Sized>(name: &'static str, value: &T) -> Result<String, EncodeError> {
    serde_json::to_string(value).map_err(|source| EncodeError::Json { name: name, source: source })
}

/// Why an event could not be put on the wire. The event is dropped.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("`{0}` payload contains a non-finite number")]
    NonFinite(&'static str),

    #[error("failed to encode `{name}`: {source}")]
    Json {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One encoded message for the client: the entry point name and its JSON
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ARClientMessage {
    pub name: String,
    pub payload: String,
}

impl ARClientMessage {
    /// Script invoking the client entry object, for hosts that deliver by
    /// evaluating JavaScript. The payload is passed as a single-quoted
    /// string the client parses.
    pub fn to_script(&self) -> String {
        format!("if(window.ARKit){{ARKit.{}('{}')}}", self.name, escape_single_quoted(&self.payload))
    }
}

fn escape_single_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}
