use crate::utils;
use crate::{ARTrackingState, ARTransform};
use std::f32::consts::{FRAC_PI_2, PI};

// Pinhole intrinsics of the capture sensor, in sensor pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ARCameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

/// Camera state reported by the engine for one frame. The transform is in
/// the sensor's native landscape-right frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ARNativeCamera {
    pub transform: ARTransform,
    pub intrinsics: ARCameraIntrinsics,
    // Width and height of the captured image, in pixels
    pub image_resolution: (u32, u32),
    pub euler_angles: [f32; 3],
    pub tracking_state: ARTrackingState,
}

/// Camera record of a frame snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARCameraData {
    pub transform: [f32; 16],
    pub projection: [f32; 16],
    pub inverse_world_matrix: [f32; 16],
    pub position: [f32; 3],
    pub euler_angles: [f32; 3],
    pub quaternion: [f32; 4],
}

impl ARCameraData {
    pub(crate) fn is_finite(&self) -> bool {
        utils::all_finite(&self.transform)
            && utils::all_finite(&self.projection)
            && utils::all_finite(&self.inverse_world_matrix)
            && utils::all_finite(&self.position)
            && utils::all_finite(&self.euler_angles)
            && utils::all_finite(&self.quaternion)
    }
}

/// Orientation of the user interface hosting the web view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ARInterfaceOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Default for ARInterfaceOrientation {
    fn default() -> ARInterfaceOrientation {
        ARInterfaceOrientation::Portrait
    }
}

impl ARInterfaceOrientation {
    /// Interface orientation for a physical device orientation. Landscape is
    /// mirrored between the two: rotating the device left turns the interface
    /// right. Flat and unknown orientations keep `previous`.
    pub fn from_device(device: ARDeviceOrientation, previous: ARInterfaceOrientation) -> ARInterfaceOrientation {
        match device {
            ARDeviceOrientation::Portrait => ARInterfaceOrientation::Portrait,
            ARDeviceOrientation::PortraitUpsideDown => ARInterfaceOrientation::PortraitUpsideDown,
            ARDeviceOrientation::LandscapeLeft => ARInterfaceOrientation::LandscapeRight,
            ARDeviceOrientation::LandscapeRight => ARInterfaceOrientation::LandscapeLeft,
            ARDeviceOrientation::FaceUp |
            ARDeviceOrientation::FaceDown |
            ARDeviceOrientation::Unknown => previous,
        }
    }

    /// Rotation around the view axis from the sensor frame to this
    /// orientation. Landscape-right is the sensor's own orientation.
    pub fn rotation(&self) -> f32 {
        match *self {
            ARInterfaceOrientation::LandscapeRight => 0.0,
            ARInterfaceOrientation::Portrait => FRAC_PI_2,
            ARInterfaceOrientation::LandscapeLeft => PI,
            ARInterfaceOrientation::PortraitUpsideDown => -FRAC_PI_2,
        }
    }

    pub fn is_portrait(&self) -> bool {
        match *self {
            ARInterfaceOrientation::Portrait | ARInterfaceOrientation::PortraitUpsideDown => true,
            _ => false,
        }
    }
}

/// Physical orientation as reported by the device sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ARDeviceOrientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Size of the web view in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ARViewport {
    pub width: f32,
    pub height: f32,
}

impl ARViewport {
    pub fn new(width: f32, height: f32) -> ARViewport {
        ARViewport { width: width, height: height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl Default for ARViewport {
    fn default() -> ARViewport {
        ARViewport::new(375.0, 667.0)
    }
}

/// Everything about the host view a frame snapshot depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ARViewGeometry {
    pub viewport: ARViewport,
    pub orientation: ARInterfaceOrientation,
}
