#[macro_use]
macro_rules! identity_matrix {
    () => ([1.0, 0.0, 0.0, 0.0,  0.0, 1.0, 0.0, 0.0,  0.0, 0.0, 1.0, 0.0,  0.0, 0.0, 0.0, 1.0]);
}

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[cfg(feature = "ipc")]
extern crate ipc_channel;

pub mod utils;

pub mod ar_anchor;
pub mod ar_bridge_config;
pub mod ar_camera;
pub mod ar_client_sink;
pub mod ar_command;
pub mod ar_event;
pub mod ar_frame_data;
pub mod ar_main_thread_heartbeat;
pub mod ar_session;
pub mod ar_session_delegate;
pub mod ar_tracking_state;
pub mod mock;

/// Native pose matrix. Row-vector convention, translation in `m41..m43`.
pub type ARTransform = euclid::default::Transform3D<f32>;
pub type ARVector3 = euclid::default::Vector3D<f32>;

pub use ar_anchor::{identifier_string, parse_identifier};
pub use ar_anchor::{ARAnchor, ARGenericAnchor, ARNativeAnchor, ARNativeAnchorKind, ARPlaneAnchor};
pub use ar_bridge_config::ARBridgeConfig;
pub use ar_camera::{ARCameraData, ARCameraIntrinsics, ARDeviceOrientation, ARInterfaceOrientation};
pub use ar_camera::{ARNativeCamera, ARViewGeometry, ARViewport};
pub use ar_client_sink::{ARClientSink, ARPageLoader};
pub use ar_command::{ARCommand, CommandError};
pub use ar_event::{ARBridgeEvent, ARClientMessage, EncodeError};
pub use ar_frame_data::{ARCapturedImage, ARFrameData, ARLightEstimate, ARNativeFrame, ARPointCloud};
pub use ar_hit_test::{ARHitTestResult, ARHitTestTypes, ARNativeHitResult};
pub use ar_main_thread_heartbeat::ARMainThreadHeartbeat;
pub use ar_session::{ARPlaneDetection, ARRunOptions, ARSession, ARSessionCreator};
pub use ar_session::{ARWorldAlignment, ARWorldTrackingConfiguration};
pub use ar_session_delegate::ARSessionDelegate;
pub use ar_tracking_state::{ARTrackingState, ARTrackingStateReason};
pub use mock::MockARControlMsg;
