use crate::{ARHitTestTypes, ARNativeFrame, ARNativeHitResult, ARSessionDelegate, ARTransform};
use std::sync::Arc;
use uuid::Uuid;

/// How tracked content is aligned with the real world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ARWorldAlignment {
    // Y axis parallel to gravity, origin at the initial device position
    Gravity,
    // Like Gravity, with X and Z aligned to east and south
    GravityAndHeading,
    // Axes follow the device camera
    Camera,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ARPlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Configuration the session is run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ARWorldTrackingConfiguration {
    pub world_alignment: ARWorldAlignment,
    pub plane_detection: ARPlaneDetection,
    pub auto_focus: bool,
    pub light_estimation: bool,
}

impl Default for ARWorldTrackingConfiguration {
    fn default() -> ARWorldTrackingConfiguration {
        ARWorldTrackingConfiguration {
            world_alignment: ARWorldAlignment::Gravity,
            plane_detection: ARPlaneDetection {
                horizontal: true,
                vertical: false,
            },
            auto_focus: true,
            light_estimation: true,
        }
    }
}

/// Options of a (re)run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ARRunOptions {
    // Forget the device position history
    pub reset_tracking: bool,
    // Drop every anchor without reporting the removals
    pub remove_existing_anchors: bool,
}

impl ARRunOptions {
    pub fn reset() -> ARRunOptions {
        ARRunOptions {
            reset_tracking: true,
            remove_existing_anchors: true,
        }
    }
}

/// The ARSession trait is the capability the bridge consumes from a
/// tracking engine. Results flow back through the `ARSessionDelegate` the
/// session was created with.
pub trait ARSession: Send {
    /// Starts or restarts the session.
    fn run(&mut self, configuration: &ARWorldTrackingConfiguration, options: ARRunOptions);

    /// Stops producing frames. Anchors are kept.
    fn pause(&mut self);

    /// The latest frame, None until the first one is produced.
    fn current_frame(&self) -> Option<Arc<ARNativeFrame>>;

    /// Adds a point anchor. The engine picks the identifier and reports the
    /// anchor through `session_did_add_anchors`.
    fn add_anchor(&mut self, transform: ARTransform);

    /// Removes the anchor, reporting it through `session_did_remove_anchors`.
    fn remove_anchor(&mut self, identifier: &Uuid);

    /// Intersects the ray through a normalized image point with the world
    /// as seen in `frame`, nearest first.
    fn hit_test(&self, frame: &ARNativeFrame, point: [f32; 2], types: ARHitTestTypes) -> Vec<ARNativeHitResult>;
}

pub trait ARSessionCreator {
    fn new_session(&self, delegate: Box<dyn ARSessionDelegate>) -> Box<dyn ARSession>;
}
