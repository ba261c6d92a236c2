use crate::utils;
use crate::{ARAnchor, ARCameraData, ARNativeAnchor, ARNativeCamera, ARVector3};

// Represents everything the client needs to render one camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ARFrameData {
    pub camera: ARCameraData,

    // Every anchor the session tracks at this instant
    pub anchors: Vec<ARAnchor>,

    // Ambient light, 1.0 being neutral
    pub ambient_intensity: f32,

    // Ambient light color as linear RGB in 0..1.
    // None when the engine has no light estimate for this frame.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ambient_color: Option<[f32; 3]>,

    // Base64 JPEG of the downscaled camera image, oriented like the view
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub point_cloud: Option<ARPointCloud>,
}

impl ARFrameData {
    pub(crate) fn is_finite(&self) -> bool {
        self.camera.is_finite()
            && self.ambient_intensity.is_finite()
            && self.ambient_color.map_or(true, |color| utils::all_finite(&color))
            && self.anchors.iter().all(ARAnchor::is_finite)
            && self.point_cloud.as_ref().map_or(true, ARPointCloud::is_finite)
    }
}

/// Feature points of one frame. Always a full replacement of the previous
/// sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ARPointCloud {
    pub points: Vec<[f32; 3]>,
    pub count: usize,
}

impl ARPointCloud {
    pub fn from_points(points: &[ARVector3]) -> ARPointCloud {
        let mut buffer = Vec::with_capacity(points.len());
        buffer.extend(points.iter().map(utils::vector_to_array));
        ARPointCloud {
            count: buffer.len(),
            points: buffer,
        }
    }

    fn is_finite(&self) -> bool {
        self.points.iter().all(|p| utils::all_finite(p))
    }
}

/// Light estimate of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ARLightEstimate {
    // Ambient intensity in lumens, about 1000 in a well lit room
    pub ambient_intensity: f32,
    // Color temperature in Kelvin, 6500 being pure white
    pub ambient_color_temperature: f32,
}

/// Raw RGBA8 camera image in the sensor's orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct ARCapturedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// One frame as the engine hands it over.
#[derive(Debug, Clone, PartialEq)]
pub struct ARNativeFrame {
    // Seconds since the session started
    pub timestamp: f64,
    pub camera: ARNativeCamera,
    pub anchors: Vec<ARNativeAnchor>,
    pub light_estimate: Option<ARLightEstimate>,
    pub raw_feature_points: Option<Vec<ARVector3>>,
    pub captured_image: Option<ARCapturedImage>,
}

impl ARNativeFrame {
    pub fn anchor(&self, identifier: &uuid::Uuid) -> Option<&ARNativeAnchor> {
        self.anchors.iter().find(|anchor| anchor.identifier == *identifier)
    }
}
