//! Client commands.
//!
//! The client sends `{action, value?, hitType?}` objects. Each known action
//! has its own decode step producing a typed [`ARCommand`]; anything that does
//! not fit fails that single command with a [`CommandError`].

use crate::{utils, ARBridgeConfig, ARHitTestTypes};
use serde::de::{self, DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// A validated client request.
#[derive(Debug, Clone, PartialEq)]
pub enum ARCommand {
    Config(ARBridgeConfig),
    ResetSession,
    // None places the anchor in front of the camera
    AddAnchor(Option<[f32; 16]>),
    RemoveAnchors(Vec<String>),
    HitTest { point: [f32; 2], types: ARHitTestTypes },
    LoadPage(String),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("client message is not a command object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid `{action}` payload: {reason}")]
    InvalidPayload { action: &'static str, reason: String },

    #[error("no page named `{0}`")]
    InvalidPage(String),
}

#[derive(Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    value: Value,
    #[serde(default, rename = "hitType")]
    hit_type: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraClip {
    near: f64,
    far: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigPayload {
    camera: CameraClip,
    point_cloud: bool,
    image_frame: bool,
}

#[derive(Deserialize)]
struct ScreenPoint {
    x: f32,
    y: f32,
}

fn invalid(action: &'static str, reason: impl ToString) -> CommandError {
    CommandError::InvalidPayload {
        action: action,
        reason: reason.to_string(),
    }
}

fn payload<T: DeserializeOwned>(action: &'static str, value: Value) -> Result<T, CommandError> {
    serde_json::from_value(value).map_err(|err| invalid(action, err))
}

// Derived structs also accept positional arrays; records must be objects
fn record<T: DeserializeOwned>(action: &'static str, value: Value) -> Result<T, CommandError> {
    if !value.is_object() {
        return Err(invalid(action, format!("expected an object, got {}", kind(&value))));
    }
    payload(action, value)
}

fn kind(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ARCommand {
    /// Decodes one raw client message. `Ok(None)` is an action this bridge
    /// does not know, which the caller ignores.
    pub fn decode_str(message: &str) -> Result<Option<ARCommand>, CommandError> {
        let value: Value = serde_json::from_str(message)?;
        ARCommand::decode(value)
    }

    pub fn decode(message: Value) -> Result<Option<ARCommand>, CommandError> {
        if !message.is_object() {
            return Err(CommandError::Json(de::Error::custom(format!("expected an object, got {}", kind(&message)))));
        }
        let envelope: Envelope = serde_json::from_value(message)?;
        let value = envelope.value;

        let command = match &*envelope.action {
            "config" => ARCommand::Config(decode_config(value)?),
            "resetSession" => ARCommand::ResetSession,
            "addAnchor" => ARCommand::AddAnchor(decode_transform(value)?),
            "removeAnchors" => ARCommand::RemoveAnchors(payload("removeAnchors", value)?),
            "hitTest" => {
                let point: ScreenPoint = record("hitTest", value)?;
                if !point.x.is_finite() || !point.y.is_finite() {
                    return Err(invalid("hitTest", "point is not finite"));
                }
                let bits: u32 = payload("hitTest", envelope.hit_type)?;
                ARCommand::HitTest {
                    point: [point.x, point.y],
                    types: ARHitTestTypes::from_bits(bits),
                }
            }
            "loadPage" => ARCommand::LoadPage(decode_page(value)?),
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    pub fn action(&self) -> &'static str {
        match *self {
            ARCommand::Config(_) => "config",
            ARCommand::ResetSession => "resetSession",
            ARCommand::AddAnchor(_) => "addAnchor",
            ARCommand::RemoveAnchors(_) => "removeAnchors",
            ARCommand::HitTest { .. } => "hitTest",
            ARCommand::LoadPage(_) => "loadPage",
        }
    }
}

fn decode_config(value: Value) -> Result<ARBridgeConfig, CommandError> {
    if !value.get("camera").map_or(false, Value::is_object) {
        return Err(invalid("config", "camera is not an object"));
    }
    let config: ConfigPayload = record("config", value)?;
    let CameraClip { near, far } = config.camera;
    if !(near.is_finite() && far.is_finite() && near > 0.0 && far > near) {
        return Err(invalid("config", format!("clip planes near={} far={} out of range", near, far)));
    }
    Ok(ARBridgeConfig {
        near: near,
        far: far,
        point_cloud: config.point_cloud,
        image_frame: config.image_frame,
    })
}

fn decode_transform(value: Value) -> Result<Option<[f32; 16]>, CommandError> {
    if value.is_null() {
        return Ok(None);
    }
    let elements: Vec<f32> = payload("addAnchor", value)?;
    if elements.len() != 16 {
        return Err(invalid("addAnchor", format!("expected 16 matrix elements, got {}", elements.len())));
    }
    if !utils::all_finite(&elements) {
        return Err(invalid("addAnchor", "matrix is not finite"));
    }
    let mut matrix = [0f32; 16];
    matrix.copy_from_slice(&elements);
    Ok(Some(matrix))
}

// Page names map onto file names, so only a conservative alphabet passes
fn decode_page(value: Value) -> Result<String, CommandError> {
    let page: String = payload("loadPage", value)?;
    let valid = !page.is_empty()
        && page.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(CommandError::InvalidPage(page));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<Option<ARCommand>, CommandError> {
        ARCommand::decode(value)
    }

    #[test]
    fn config() {
        let command = decode(json!({
            "action": "config",
            "value": { "camera": { "near": 0.1, "far": 1000 }, "pointCloud": true, "imageFrame": false }
        })).unwrap();
        assert_eq!(command, Some(ARCommand::Config(ARBridgeConfig {
            near: 0.1,
            far: 1000.0,
            point_cloud: true,
            image_frame: false,
        })));
    }

    #[test]
    fn config_with_missing_field_fails() {
        let result = decode(json!({ "action": "config", "value": { "camera": { "near": 0.1, "far": 10 } } }));
        assert!(matches!(result, Err(CommandError::InvalidPayload { action: "config", .. })));
    }

    #[test]
    fn config_with_wrong_type_fails() {
        let result = decode(json!({
            "action": "config",
            "value": { "camera": { "near": "0.1", "far": 10 }, "pointCloud": false, "imageFrame": false }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn config_with_inverted_clip_fails() {
        let result = decode(json!({
            "action": "config",
            "value": { "camera": { "near": 10, "far": 1 }, "pointCloud": false, "imageFrame": false }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn add_anchor_with_matrix() {
        let command = decode(json!({
            "action": "addAnchor",
            "value": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 2, 0, -1, 1]
        })).unwrap();
        match command {
            Some(ARCommand::AddAnchor(Some(matrix))) => assert_eq!(utils::matrix_position(&matrix), [2.0, 0.0, -1.0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn add_anchor_without_value() {
        assert_eq!(decode(json!({ "action": "addAnchor" })).unwrap(), Some(ARCommand::AddAnchor(None)));
    }

    #[test]
    fn add_anchor_with_short_or_mixed_matrix_fails() {
        assert!(decode(json!({ "action": "addAnchor", "value": [0, 0, 0] })).is_err());
        assert!(decode(json!({ "action": "addAnchor", "value": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, "x", 0, 0, 1] })).is_err());
        assert!(decode(json!({ "action": "addAnchor", "value": { "x": 1 } })).is_err());
    }

    #[test]
    fn remove_anchors() {
        let command = decode(json!({ "action": "removeAnchors", "value": ["A", "B"] })).unwrap();
        assert_eq!(command, Some(ARCommand::RemoveAnchors(vec!["A".to_owned(), "B".to_owned()])));
        assert!(decode(json!({ "action": "removeAnchors", "value": [1, 2] })).is_err());
        assert!(decode(json!({ "action": "removeAnchors" })).is_err());
    }

    #[test]
    fn hit_test() {
        let command = decode(json!({ "action": "hitTest", "value": { "x": 0.5, "y": 0.25 }, "hitType": 24 })).unwrap();
        assert_eq!(command, Some(ARCommand::HitTest {
            point: [0.5, 0.25],
            types: ARHitTestTypes::EXISTING_PLANE | ARHitTestTypes::EXISTING_PLANE_USING_EXTENT,
        }));
    }

    #[test]
    fn hit_test_requires_integer_mask() {
        assert!(decode(json!({ "action": "hitTest", "value": { "x": 0.5, "y": 0.5 } })).is_err());
        assert!(decode(json!({ "action": "hitTest", "value": { "x": 0.5, "y": 0.5 }, "hitType": -1 })).is_err());
        assert!(decode(json!({ "action": "hitTest", "value": { "x": 0.5 }, "hitType": 1 })).is_err());
    }

    #[test]
    fn load_page() {
        assert_eq!(decode(json!({ "action": "loadPage", "value": "plane-anchor" })).unwrap(),
                   Some(ARCommand::LoadPage("plane-anchor".to_owned())));
        assert!(matches!(decode(json!({ "action": "loadPage", "value": "../secret" })),
                         Err(CommandError::InvalidPage(_))));
    }

    #[test]
    fn unknown_action_is_not_an_error() {
        assert!(decode(json!({ "action": "teleport", "value": 1 })).unwrap().is_none());
    }

    #[test]
    fn missing_action_fails() {
        assert!(matches!(decode(json!({ "value": 1 })), Err(CommandError::Json(_))));
        assert!(matches!(decode(json!([1, 2, 3])), Err(CommandError::Json(_))));
        assert!(ARCommand::decode_str("not json").is_err());
    }

    #[test]
    fn positional_envelope_fails() {
        let message = r#"["config", {"camera": {"near": 0.1, "far": 10}, "pointCloud": true, "imageFrame": false}]"#;
        assert!(matches!(ARCommand::decode_str(message), Err(CommandError::Json(_))));
    }

    #[test]
    fn positional_payloads_fail() {
        let camera = decode(json!({
            "action": "config",
            "value": { "camera": [0.1, 10], "pointCloud": true, "imageFrame": false }
        }));
        assert!(matches!(camera, Err(CommandError::InvalidPayload { action: "config", .. })));
        let config = decode(json!({ "action": "config", "value": [{ "near": 0.1, "far": 10 }, true, false] }));
        assert!(matches!(config, Err(CommandError::InvalidPayload { action: "config", .. })));
        let point = decode(json!({ "action": "hitTest", "value": [0.5, 0.5], "hitType": 1 }));
        assert!(matches!(point, Err(CommandError::InvalidPayload { action: "hitTest", .. })));
    }
}
