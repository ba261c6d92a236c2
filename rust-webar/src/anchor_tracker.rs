//! Anchor lifecycle. The engine's registry is authoritative; these helpers
//! only turn its notifications into client events and forward client
//! mutations to it.

use rust_webar_api::utils;
use rust_webar_api::{parse_identifier, ARAnchor, ARBridgeEvent, ARNativeAnchor, ARSession};

// Distance in meters of an anchor added without a transform
const DEFAULT_ANCHOR_DISTANCE: f32 = 1.0;

pub fn anchors_added(anchors: &[ARNativeAnchor]) -> Option<ARBridgeEvent> {
    batch(anchors).map(ARBridgeEvent::AnchorsAdded)
}

/// Updates reach the client through frame snapshots only.
pub fn anchors_updated(anchors: &[ARNativeAnchor]) -> Option<ARBridgeEvent> {
    debug!("{} anchor(s) updated", anchors.len());
    None
}

pub fn anchors_removed(anchors: &[ARNativeAnchor]) -> Option<ARBridgeEvent> {
    batch(anchors).map(ARBridgeEvent::AnchorsRemoved)
}

fn batch(anchors: &[ARNativeAnchor]) -> Option<Vec<ARAnchor>> {
    if anchors.is_empty() {
        return None;
    }
    Some(anchors.iter().map(ARAnchor::from_native).collect())
}

/// Asks the engine for a new anchor. The identifier comes back with the
/// engine's add notification. Without a transform the anchor is placed in
/// front of the camera, which needs a current frame.
pub fn add_anchor(session: &mut dyn ARSession, transform: Option<[f32; 16]>) -> bool {
    let transform = match transform {
        Some(transform) => transform,
        None => match session.current_frame() {
            Some(frame) => {
                let camera = utils::matrix_to_array(&frame.camera.transform);
                utils::multiply_matrix(&camera, &utils::translation([0.0, 0.0, -DEFAULT_ANCHOR_DISTANCE]))
            }
            None => {
                debug!("No current frame, cannot place an anchor in front of the camera");
                return false;
            }
        },
    };
    session.add_anchor(utils::array_to_matrix(&transform));
    true
}

/// Removes every anchor of the current frame whose identifier is listed.
/// Unknown and malformed identifiers are skipped. Returns how many removals
/// were requested.
pub fn remove_anchors(session: &mut dyn ARSession, identifiers: &[String]) -> usize {
    let frame = match session.current_frame() {
        Some(frame) => frame,
        None => {
            debug!("No current frame, ignoring removal of {} anchor(s)", identifiers.len());
            return 0;
        }
    };

    let mut removed = 0;
    for identifier in identifiers {
        let anchor = parse_identifier(identifier).and_then(|uuid| frame.anchor(&uuid));
        match anchor {
            Some(anchor) => {
                session.remove_anchor(&anchor.identifier);
                removed += 1;
            }
            None => debug!("Ignoring removal of unknown anchor {}", identifier),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_webar_api::{identifier_string, ARCameraIntrinsics, ARHitTestTypes, ARNativeAnchorKind, ARNativeCamera};
    use rust_webar_api::{ARNativeFrame, ARNativeHitResult, ARRunOptions, ARTrackingState, ARTransform};
    use rust_webar_api::ARWorldTrackingConfiguration;
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingSession {
        frame: Option<Arc<ARNativeFrame>>,
        added: Vec<ARTransform>,
        removed: Vec<Uuid>,
    }

    impl ARSession for RecordingSession {
        fn run(&mut self, _configuration: &ARWorldTrackingConfiguration, _options: ARRunOptions) {}

        fn pause(&mut self) {}

        fn current_frame(&self) -> Option<Arc<ARNativeFrame>> {
            self.frame.clone()
        }

        fn add_anchor(&mut self, transform: ARTransform) {
            self.added.push(transform);
        }

        fn remove_anchor(&mut self, identifier: &Uuid) {
            self.removed.push(*identifier);
        }

        fn hit_test(&self, _frame: &ARNativeFrame, _point: [f32; 2], _types: ARHitTestTypes) -> Vec<ARNativeHitResult> {
            Vec::new()
        }
    }

    fn anchor() -> ARNativeAnchor {
        ARNativeAnchor {
            identifier: Uuid::new_v4(),
            transform: ARTransform::identity(),
            kind: ARNativeAnchorKind::Point,
        }
    }

    fn frame(camera: [f32; 16], anchors: Vec<ARNativeAnchor>) -> Arc<ARNativeFrame> {
        Arc::new(ARNativeFrame {
            timestamp: 0.0,
            camera: ARNativeCamera {
                transform: utils::array_to_matrix(&camera),
                intrinsics: ARCameraIntrinsics { fx: 1.0, fy: 1.0, cx: 0.5, cy: 0.5 },
                image_resolution: (1, 1),
                euler_angles: [0.0; 3],
                tracking_state: ARTrackingState::Normal,
            },
            anchors: anchors,
            light_estimate: None,
            raw_feature_points: None,
            captured_image: None,
        })
    }

    #[test]
    fn empty_batches_emit_nothing() {
        assert_eq!(anchors_added(&[]), None);
        assert_eq!(anchors_removed(&[]), None);
        assert_eq!(anchors_updated(&[anchor()]), None);
    }

    #[test]
    fn added_batch_keeps_identifiers() {
        let anchors = vec![anchor(), anchor()];
        match anchors_added(&anchors) {
            Some(ARBridgeEvent::AnchorsAdded(batch)) => {
                assert_eq!(batch.len(), 2);
                assert_eq!(batch[1].identifier(), identifier_string(&anchors[1].identifier));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn explicit_transform_is_used_verbatim() {
        let mut session = RecordingSession::default();
        let transform = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 2.0, 0.0, -1.0, 1.0];
        assert!(add_anchor(&mut session, Some(transform)));
        assert_eq!(utils::matrix_to_array(&session.added[0]), transform);
    }

    #[test]
    fn default_anchor_is_one_meter_ahead() {
        let mut session = RecordingSession::default();
        assert!(!add_anchor(&mut session, None));
        assert!(session.added.is_empty());

        session.frame = Some(frame(utils::translation([0.0, 1.0, 0.0]), Vec::new()));
        assert!(add_anchor(&mut session, None));
        let placed = utils::matrix_to_array(&session.added[0]);
        assert_eq!(utils::matrix_position(&placed), [0.0, 1.0, -1.0]);
    }

    #[test]
    fn removal_matches_current_frame_anchors() {
        let known = anchor();
        let mut session = RecordingSession::default();
        let identifiers = vec![identifier_string(&known.identifier),
                               identifier_string(&Uuid::new_v4()),
                               "not-a-uuid".to_owned()];
        assert_eq!(remove_anchors(&mut session, &identifiers), 0);

        session.frame = Some(frame(utils::translation([0.0; 3]), vec![known.clone()]));
        assert_eq!(remove_anchors(&mut session, &identifiers), 1);
        assert_eq!(session.removed, vec![known.identifier]);
    }

    #[test]
    fn lowercase_identifiers_match() {
        let known = anchor();
        let mut session = RecordingSession::default();
        session.frame = Some(frame(utils::translation([0.0; 3]), vec![known.clone()]));
        let lower = identifier_string(&known.identifier).to_lowercase();
        assert_eq!(remove_anchors(&mut session, &[lower]), 1);
    }
}
