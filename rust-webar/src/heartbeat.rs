//! Marshalling onto the bridge thread.
//!
//! The engine calls its delegate from the capture thread and the host posts
//! client messages from the UI thread. Both only send an `ARBridgeMsg` down
//! one channel; the thread owning the `ARBridge` applies them in order on
//! each heartbeat.

use crate::ar_bridge::ARBridge;
use crate::options::ARBridgeOptions;
use crate::session_controller::ARSessionController;
use rust_webar_api::{ARClientSink, ARDeviceOrientation, ARMainThreadHeartbeat, ARNativeAnchor, ARNativeFrame};
use rust_webar_api::{ARSession, ARSessionCreator, ARSessionDelegate, ARTrackingState, ARViewport};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

pub enum ARBridgeMsg {
    // Engine side
    Frame(Arc<ARNativeFrame>),
    AnchorsAdded(Vec<ARNativeAnchor>),
    AnchorsUpdated(Vec<ARNativeAnchor>),
    AnchorsRemoved(Vec<ARNativeAnchor>),
    Interrupted,
    InterruptionEnded,
    TrackingStateChanged(ARTrackingState),
    Failed(String),
    // Host side
    ClientMessage(String),
    DeviceOrientation(ARDeviceOrientation),
    Viewport(ARViewport),
}

impl ARBridgeMsg {
    fn is_frame(&self) -> bool {
        match *self {
            ARBridgeMsg::Frame(_) => true,
            _ => false,
        }
    }
}

/// The delegate handed to the tracking engine.
pub struct ARSessionDelegateProxy {
    sender: Sender<ARBridgeMsg>,
}

impl ARSessionDelegateProxy {
    fn send(&self, msg: ARBridgeMsg) {
        if self.sender.send(msg).is_err() {
            debug!("AR bridge is gone, dropping engine notification");
        }
    }
}

impl ARSessionDelegate for ARSessionDelegateProxy {
    fn session_did_update_frame(&self, frame: Arc<ARNativeFrame>) {
        self.send(ARBridgeMsg::Frame(frame));
    }

    fn session_did_add_anchors(&self, anchors: Vec<ARNativeAnchor>) {
        self.send(ARBridgeMsg::AnchorsAdded(anchors));
    }

    fn session_did_update_anchors(&self, anchors: Vec<ARNativeAnchor>) {
        self.send(ARBridgeMsg::AnchorsUpdated(anchors));
    }

    fn session_did_remove_anchors(&self, anchors: Vec<ARNativeAnchor>) {
        self.send(ARBridgeMsg::AnchorsRemoved(anchors));
    }

    fn session_was_interrupted(&self) {
        self.send(ARBridgeMsg::Interrupted);
    }

    fn session_interruption_ended(&self) {
        self.send(ARBridgeMsg::InterruptionEnded);
    }

    fn session_should_attempt_relocalization(&self) -> bool {
        ARSessionController::should_attempt_relocalization()
    }

    fn camera_did_change_tracking_state(&self, state: ARTrackingState) {
        self.send(ARBridgeMsg::TrackingStateChanged(state));
    }

    fn session_did_fail(&self, error: String) {
        self.send(ARBridgeMsg::Failed(error));
    }
}

/// Host handle posting client messages and view changes to the bridge.
#[derive(Clone)]
pub struct ARBridgeSender {
    sender: Sender<ARBridgeMsg>,
}

impl ARBridgeSender {
    /// Raw JSON text received from the web content.
    pub fn post_message(&self, message: String) {
        self.send(ARBridgeMsg::ClientMessage(message));
    }

    pub fn device_orientation_changed(&self, orientation: ARDeviceOrientation) {
        self.send(ARBridgeMsg::DeviceOrientation(orientation));
    }

    pub fn viewport_resized(&self, viewport: ARViewport) {
        self.send(ARBridgeMsg::Viewport(viewport));
    }

    fn send(&self, msg: ARBridgeMsg) {
        if self.sender.send(msg).is_err() {
            debug!("AR bridge is gone, dropping host message");
        }
    }
}

/// The channel both streams share, before the bridge exists. The engine
/// needs its delegate before the session can be created, and the bridge
/// needs the session.
pub struct ARBridgeChannel {
    sender: Sender<ARBridgeMsg>,
    receiver: Receiver<ARBridgeMsg>,
}

impl ARBridgeChannel {
    pub fn new() -> ARBridgeChannel {
        let (sender, receiver) = channel();
        ARBridgeChannel {
            sender: sender,
            receiver: receiver,
        }
    }

    pub fn delegate(&self) -> Box<dyn ARSessionDelegate> {
        Box::new(ARSessionDelegateProxy {
            sender: self.sender.clone(),
        })
    }

    pub fn sender(&self) -> ARBridgeSender {
        ARBridgeSender {
            sender: self.sender.clone(),
        }
    }

    pub fn into_heartbeat(self, bridge: ARBridge) -> ARBridgeHeartbeat {
        ARBridgeHeartbeat {
            receiver: self.receiver,
            bridge: bridge,
        }
    }
}

impl Default for ARBridgeChannel {
    fn default() -> ARBridgeChannel {
        ARBridgeChannel::new()
    }
}

pub struct ARBridgeHeartbeat {
    receiver: Receiver<ARBridgeMsg>,
    bridge: ARBridge,
}

impl ARBridgeHeartbeat {
    /// Creates the session through `creator` and wires it to a new bridge.
    pub fn from_creator(creator: &dyn ARSessionCreator,
                        sink: Box<dyn ARClientSink>,
                        options: ARBridgeOptions) -> (ARBridgeHeartbeat, ARBridgeSender) {
        let channel = ARBridgeChannel::new();
        let session: Box<dyn ARSession> = creator.new_session(channel.delegate());
        let sender = channel.sender();
        let heartbeat = channel.into_heartbeat(ARBridge::new(session, sink, options));
        (heartbeat, sender)
    }

    pub fn bridge(&self) -> &ARBridge {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut ARBridge {
        &mut self.bridge
    }

    fn handle_msg(&mut self, msg: ARBridgeMsg) {
        let bridge = &mut self.bridge;
        match msg {
            ARBridgeMsg::Frame(frame) => bridge.session_did_update_frame(&frame),
            ARBridgeMsg::AnchorsAdded(anchors) => bridge.session_did_add_anchors(&anchors),
            ARBridgeMsg::AnchorsUpdated(anchors) => bridge.session_did_update_anchors(&anchors),
            ARBridgeMsg::AnchorsRemoved(anchors) => bridge.session_did_remove_anchors(&anchors),
            ARBridgeMsg::Interrupted => bridge.session_was_interrupted(),
            ARBridgeMsg::InterruptionEnded => bridge.session_interruption_ended(),
            ARBridgeMsg::TrackingStateChanged(state) => bridge.camera_did_change_tracking_state(state),
            ARBridgeMsg::Failed(reason) => bridge.session_did_fail(&reason),
            ARBridgeMsg::ClientMessage(message) => {
                // Rejections are logged by the bridge
                let _ = bridge.handle_client_message(&message);
            }
            ARBridgeMsg::DeviceOrientation(orientation) => bridge.set_device_orientation(orientation),
            ARBridgeMsg::Viewport(viewport) => bridge.set_viewport(viewport),
        }
    }
}

impl ARMainThreadHeartbeat for ARBridgeHeartbeat {
    // Only the newest queued frame is serialized; older ones are stale
    fn heartbeat(&mut self) {
        let pending: Vec<ARBridgeMsg> = self.receiver.try_iter().collect();
        let newest_frame = pending.iter().rposition(ARBridgeMsg::is_frame);
        let mut skipped = 0;
        for (index, msg) in pending.into_iter().enumerate() {
            if msg.is_frame() && Some(index) != newest_frame {
                skipped += 1;
                continue;
            }
            self.handle_msg(msg);
        }
        if skipped > 0 {
            debug!("Skipped {} stale frames", skipped);
        }
    }

    fn heart_racing(&self) -> bool {
        self.bridge.controller().is_running()
    }
}
