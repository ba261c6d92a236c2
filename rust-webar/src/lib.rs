#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
extern crate rust_webar_api;

pub mod anchor_tracker;
pub mod api;
mod ar_bridge;
pub mod camera;
mod dispatcher;
pub mod frame_serializer;
mod heartbeat;
pub mod image_encoder;
mod options;
mod page_source;
pub mod session_controller;

pub use rust_webar_api::*;
pub use ar_bridge::ARBridge;
pub use frame_serializer::ARFrameSerializer;
pub use heartbeat::{ARBridgeChannel, ARBridgeHeartbeat, ARBridgeMsg, ARBridgeSender, ARSessionDelegateProxy};
pub use image_encoder::{ARImageEncoder, ImageEncodeError};
pub use options::{ARBridgeOptions, ARImageOptions};
pub use page_source::ARPageSource;
pub use session_controller::{ARRunState, ARSessionController};

#[cfg(feature = "mock")]
pub use api::{MockARRemote, MockARSession, MockARSessionCreator};
