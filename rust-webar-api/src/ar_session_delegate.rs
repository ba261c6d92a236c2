use crate::{ARNativeAnchor, ARNativeFrame, ARTrackingState};
use std::sync::Arc;

/// Callbacks a tracking engine delivers, usually on its capture thread.
/// Implementations must not assume which thread calls them.
pub trait ARSessionDelegate: Send {
    fn session_did_update_frame(&self, frame: Arc<ARNativeFrame>);

    fn session_did_add_anchors(&self, anchors: Vec<ARNativeAnchor>);

    fn session_did_update_anchors(&self, anchors: Vec<ARNativeAnchor>);

    fn session_did_remove_anchors(&self, anchors: Vec<ARNativeAnchor>);

    fn session_was_interrupted(&self);

    fn session_interruption_ended(&self);

    /// Asked once an interruption ends.
    fn session_should_attempt_relocalization(&self) -> bool;

    fn camera_did_change_tracking_state(&self, state: ARTrackingState);

    /// The session stopped for good, e.g. camera access was denied.
    fn session_did_fail(&self, error: String);
}
