use super::world;
use rust_webar_api::utils;
use rust_webar_api::{ARHitTestTypes, ARLightEstimate, ARNativeAnchor, ARNativeAnchorKind, ARNativeCamera};
use rust_webar_api::{ARNativeFrame, ARNativeHitResult, ARRunOptions, ARSession, ARSessionDelegate};
use rust_webar_api::{ARTrackingState, ARTrackingStateReason, ARTransform, ARVector3, ARWorldTrackingConfiguration};
use rust_webar_api::MockARControlMsg;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const FRAME_INTERVAL: f64 = 1.0 / 60.0;

pub struct MockARSession {
    state: Arc<Mutex<MockARState>>,
}

/// Test handle of a mock session. Changes the fake world and produces
/// frames on demand.
#[derive(Clone)]
pub struct MockARRemote {
    state: Arc<Mutex<MockARState>>,
}

pub struct MockARState {
    delegate: Box<dyn ARSessionDelegate>,
    configuration: Option<ARWorldTrackingConfiguration>,
    running: bool,
    interrupted: bool,
    failed: bool,
    timestamp: f64,
    camera_transform: ARTransform,
    tracking_state: ARTrackingState,
    anchors: Vec<ARNativeAnchor>,
    feature_points: Vec<ARVector3>,
    light_estimate: Option<ARLightEstimate>,
    current_frame: Option<Arc<ARNativeFrame>>,
}

fn lock(state: &Mutex<MockARState>) -> MutexGuard<MockARState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockARSession {
    pub fn new(delegate: Box<dyn ARSessionDelegate>) -> MockARSession {
        MockARSession {
            state: Arc::new(Mutex::new(MockARState::new(delegate))),
        }
    }

    pub fn remote(&self) -> MockARRemote {
        MockARRemote {
            state: self.state.clone(),
        }
    }
}

impl ARSession for MockARSession {
    fn run(&mut self, configuration: &ARWorldTrackingConfiguration, options: ARRunOptions) {
        lock(&self.state).run(configuration, options);
    }

    fn pause(&mut self) {
        lock(&self.state).running = false;
    }

    fn current_frame(&self) -> Option<Arc<ARNativeFrame>> {
        lock(&self.state).current_frame.clone()
    }

    fn add_anchor(&mut self, transform: ARTransform) {
        lock(&self.state).add_anchor(transform, ARNativeAnchorKind::Point);
    }

    fn remove_anchor(&mut self, identifier: &Uuid) {
        lock(&self.state).remove_anchor(identifier);
    }

    fn hit_test(&self, frame: &ARNativeFrame, point: [f32; 2], types: ARHitTestTypes) -> Vec<ARNativeHitResult> {
        world::hit_test(frame, point, types)
    }
}

impl MockARRemote {
    pub fn send(&self, msg: MockARControlMsg) {
        lock(&self.state).handle_msg(msg);
    }

    /// Produces one frame. False while the session is not running,
    /// interrupted or failed.
    pub fn step(&self) -> bool {
        lock(&self.state).step()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    /// The engine's anchor registry.
    pub fn anchors(&self) -> Vec<ARNativeAnchor> {
        lock(&self.state).anchors.clone()
    }
}

impl MockARState {
    fn new(delegate: Box<dyn ARSessionDelegate>) -> MockARState {
        MockARState {
            delegate: delegate,
            configuration: None,
            running: false,
            interrupted: false,
            failed: false,
            timestamp: 0.0,
            camera_transform: ARTransform::identity(),
            tracking_state: ARTrackingState::NotAvailable,
            anchors: Vec::new(),
            feature_points: Vec::new(),
            // Neutral indoor light
            light_estimate: Some(ARLightEstimate {
                ambient_intensity: 1000.0,
                ambient_color_temperature: 6500.0,
            }),
            current_frame: None,
        }
    }

    fn run(&mut self, configuration: &ARWorldTrackingConfiguration, options: ARRunOptions) {
        if self.failed {
            warn!("Mock AR session failed, ignoring run");
            return;
        }
        let first_run = self.configuration.is_none();
        self.configuration = Some(*configuration);
        self.running = true;
        if options.remove_existing_anchors {
            self.anchors.clear();
        }
        if options.reset_tracking {
            self.camera_transform = ARTransform::identity();
            self.feature_points.clear();
            self.current_frame = None;
        }
        if first_run || options.reset_tracking {
            self.set_tracking_state(ARTrackingState::Limited(ARTrackingStateReason::Initializing));
        }
    }

    fn step(&mut self) -> bool {
        if !self.running || self.interrupted || self.failed {
            return false;
        }
        self.timestamp += FRAME_INTERVAL;

        let transform = utils::matrix_to_array(&self.camera_transform);
        let light_estimation = self.configuration.map_or(false, |c| c.light_estimation);
        let raw_feature_points = if self.feature_points.is_empty() {
            None
        } else {
            Some(self.feature_points.clone())
        };
        let frame = Arc::new(ARNativeFrame {
            timestamp: self.timestamp,
            camera: ARNativeCamera {
                transform: self.camera_transform,
                intrinsics: world::intrinsics(),
                image_resolution: (world::IMAGE_WIDTH, world::IMAGE_HEIGHT),
                euler_angles: utils::euler_angles_from_matrix(&transform),
                tracking_state: self.tracking_state,
            },
            anchors: self.anchors.clone(),
            light_estimate: if light_estimation { self.light_estimate } else { None },
            raw_feature_points: raw_feature_points,
            captured_image: Some(world::captured_image(self.timestamp)),
        });
        self.current_frame = Some(frame.clone());
        self.delegate.session_did_update_frame(frame);
        true
    }

    fn add_anchor(&mut self, transform: ARTransform, kind: ARNativeAnchorKind) -> Uuid {
        let anchor = ARNativeAnchor {
            identifier: Uuid::new_v4(),
            transform: transform,
            kind: kind,
        };
        let identifier = anchor.identifier;
        self.anchors.push(anchor.clone());
        self.delegate.session_did_add_anchors(vec![anchor]);
        identifier
    }

    fn remove_anchor(&mut self, identifier: &Uuid) -> Option<ARNativeAnchor> {
        let index = self.anchors.iter().position(|anchor| anchor.identifier == *identifier)?;
        let anchor = self.anchors.remove(index);
        self.delegate.session_did_remove_anchors(vec![anchor.clone()]);
        Some(anchor)
    }

    fn set_tracking_state(&mut self, state: ARTrackingState) {
        self.tracking_state = state;
        self.delegate.camera_did_change_tracking_state(state);
    }

    fn plane_mut(&mut self, identifier: &Uuid) -> Option<&mut ARNativeAnchor> {
        self.anchors.iter_mut().find(|anchor| anchor.identifier == *identifier && anchor.is_plane())
    }

    pub fn handle_msg(&mut self, msg: MockARControlMsg) {
        match msg {
            MockARControlMsg::SetCameraTransform(transform) => self.camera_transform = transform,
            MockARControlMsg::DetectPlane(transform, center, extent) => {
                self.add_anchor(transform, ARNativeAnchorKind::Plane { center: center, extent: extent });
            }
            MockARControlMsg::UpdatePlane(identifier, center, extent) => {
                let updated = match self.plane_mut(&identifier) {
                    Some(plane) => {
                        plane.kind = ARNativeAnchorKind::Plane { center: center, extent: extent };
                        plane.clone()
                    }
                    None => {
                        warn!("Mock AR session has no plane {}", identifier);
                        return;
                    }
                };
                self.delegate.session_did_update_anchors(vec![updated]);
            }
            MockARControlMsg::MergePlanes(keep, absorbed) => self.merge_planes(&keep, &absorbed),
            MockARControlMsg::SetFeaturePoints(points) => self.feature_points = points,
            MockARControlMsg::SetLightEstimate(estimate) => self.light_estimate = estimate,
            MockARControlMsg::SetTrackingState(state) => self.set_tracking_state(state),
            MockARControlMsg::Interrupt => {
                self.interrupted = true;
                self.delegate.session_was_interrupted();
            }
            MockARControlMsg::EndInterruption => {
                self.interrupted = false;
                self.delegate.session_interruption_ended();
                if self.delegate.session_should_attempt_relocalization() {
                    self.set_tracking_state(ARTrackingState::Limited(ARTrackingStateReason::Relocalizing));
                }
            }
            MockARControlMsg::Fail(reason) => {
                self.failed = true;
                self.running = false;
                self.delegate.session_did_fail(reason);
            }
        }
    }

    // The kept plane grows to cover both extents
    fn merge_planes(&mut self, keep: &Uuid, absorbed: &Uuid) {
        let absorbed_extent = match self.plane_mut(absorbed).map(|plane| plane.kind.clone()) {
            Some(ARNativeAnchorKind::Plane { extent, .. }) => extent,
            _ => {
                warn!("Mock AR session has no plane {}", absorbed);
                return;
            }
        };
        let merged = match self.plane_mut(keep) {
            Some(plane) => {
                if let ARNativeAnchorKind::Plane { ref mut extent, .. } = plane.kind {
                    *extent = extent.max(absorbed_extent);
                }
                plane.clone()
            }
            None => {
                warn!("Mock AR session has no plane {}", keep);
                return;
            }
        };
        self.remove_anchor(absorbed);
        self.delegate.session_did_update_anchors(vec![merged]);
    }
}
