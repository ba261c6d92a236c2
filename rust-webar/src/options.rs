use crate::image_encoder::{ARImageEncoder, DEFAULT_IMAGE_QUALITY, DEFAULT_IMAGE_SCALE};
use crate::page_source::ARPageSource;
use rust_webar_api::{ARBridgeConfig, ARInterfaceOrientation, ARViewport, ARWorldTrackingConfiguration};

/// Host settings of a bridge. Every field has a default, so a partial JSON
/// document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ARBridgeOptions {
    // Config in effect until the client sends its own
    pub config: ARBridgeConfig,
    pub tracking: ARWorldTrackingConfiguration,
    pub pages: ARPageSource,
    // Page loaded when the bridge starts
    pub default_page: String,
    pub image: ARImageOptions,
    pub viewport: ARViewport,
    pub orientation: ARInterfaceOrientation,
}

impl Default for ARBridgeOptions {
    fn default() -> ARBridgeOptions {
        ARBridgeOptions {
            config: ARBridgeConfig::default(),
            tracking: ARWorldTrackingConfiguration::default(),
            pages: ARPageSource::default(),
            default_page: "index".to_owned(),
            image: ARImageOptions::default(),
            viewport: ARViewport::default(),
            orientation: ARInterfaceOrientation::default(),
        }
    }
}

impl ARBridgeOptions {
    pub fn from_json_str(json: &str) -> Result<ARBridgeOptions, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ARImageOptions {
    // Downscale factor of the camera image
    pub scale: f32,
    // JPEG quality, 1 to 100
    pub quality: u8,
}

impl Default for ARImageOptions {
    fn default() -> ARImageOptions {
        ARImageOptions {
            scale: DEFAULT_IMAGE_SCALE,
            quality: DEFAULT_IMAGE_QUALITY,
        }
    }
}

impl ARImageOptions {
    pub fn encoder(&self) -> ARImageEncoder {
        ARImageEncoder::new(self.scale, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_webar_api::ARWorldAlignment;

    #[test]
    fn empty_document_gives_defaults() {
        let options = ARBridgeOptions::from_json_str("{}").unwrap();
        assert_eq!(options, ARBridgeOptions::default());
        assert_eq!(options.default_page, "index");
        assert_eq!(options.tracking.world_alignment, ARWorldAlignment::Gravity);
        assert!(options.tracking.plane_detection.horizontal);
        assert_eq!(options.image.quality, 50);
    }

    #[test]
    fn partial_document_overrides() {
        let json = r#"{
            "config": {"near": 0.1, "pointCloud": true},
            "pages": {"kind": "dev", "baseUrl": "http://localhost:8000"},
            "defaultPage": "planes",
            "image": {"scale": 0.5},
            "tracking": {"lightEstimation": false}
        }"#;
        let options = ARBridgeOptions::from_json_str(json).unwrap();
        assert_eq!(options.config.near, 0.1);
        assert_eq!(options.config.far, 1000.0);
        assert!(options.config.point_cloud);
        assert_eq!(options.default_page, "planes");
        assert_eq!(options.image.scale, 0.5);
        assert_eq!(options.image.quality, 50);
        assert!(!options.tracking.light_estimation);
        assert!(options.tracking.auto_focus);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(ARBridgeOptions::from_json_str(r#"{"defaultPage": 3}"#).is_err());
    }
}
