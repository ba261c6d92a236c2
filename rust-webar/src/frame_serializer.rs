use crate::camera;
use crate::image_encoder::ARImageEncoder;
use rust_webar_api::{ARAnchor, ARBridgeConfig, ARFrameData, ARLightEstimate, ARNativeFrame, ARPointCloud, ARViewGeometry};

/// Builds one `onARFrame` record from a native frame. Pure apart from
/// logging; emitting the record is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct ARFrameSerializer {
    image_encoder: ARImageEncoder,
}

impl ARFrameSerializer {
    pub fn new(image_encoder: ARImageEncoder) -> ARFrameSerializer {
        ARFrameSerializer {
            image_encoder: image_encoder,
        }
    }

    pub fn serialize(&self, frame: &ARNativeFrame, config: &ARBridgeConfig, geometry: &ARViewGeometry) -> ARFrameData {
        let (ambient_intensity, ambient_color) = ambient_light(frame.light_estimate.as_ref());

        ARFrameData {
            camera: camera::camera_data(&frame.camera, config, geometry),
            anchors: frame.anchors.iter().map(ARAnchor::from_native).collect(),
            ambient_intensity: ambient_intensity,
            ambient_color: ambient_color,
            image: if config.image_frame { self.image(frame, geometry) } else { None },
            point_cloud: if config.point_cloud { Some(point_cloud(frame)) } else { None },
        }
    }

    fn image(&self, frame: &ARNativeFrame, geometry: &ARViewGeometry) -> Option<String> {
        let captured = match frame.captured_image {
            Some(ref captured) => captured,
            None => {
                debug!("Frame {} carries no camera image", frame.timestamp);
                return None;
            }
        };
        match self.image_encoder.encode(captured, geometry.orientation) {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                warn!("Omitting camera image of frame {}: {}", frame.timestamp, err);
                None
            }
        }
    }
}

// Frames without raw feature points still get an empty cloud
fn point_cloud(frame: &ARNativeFrame) -> ARPointCloud {
    match frame.raw_feature_points {
        Some(ref points) => ARPointCloud::from_points(points),
        None => ARPointCloud::from_points(&[]),
    }
}

/// Ambient intensity (1.0 is neutral) and colour of the light estimate.
pub fn ambient_light(estimate: Option<&ARLightEstimate>) -> (f32, Option<[f32; 3]>) {
    match estimate {
        Some(estimate) => (estimate.ambient_intensity / 1000.0,
                           Some(kelvin_to_rgb(estimate.ambient_color_temperature))),
        None => (1.0, None),
    }
}

/// RGB in 0..1 of a black body at `kelvin`, after Tanner Helland's fit.
pub fn kelvin_to_rgb(kelvin: f32) -> [f32; 3] {
    let temperature = kelvin.max(1000.0).min(40000.0) / 100.0;

    let red = if temperature <= 66.0 {
        255.0
    } else {
        329.698727446 * (temperature - 60.0).powf(-0.1332047592)
    };

    let green = if temperature <= 66.0 {
        99.4708025861 * temperature.ln() - 161.1195681661
    } else {
        288.1221695283 * (temperature - 60.0).powf(-0.0755148492)
    };

    let blue = if temperature >= 66.0 {
        255.0
    } else if temperature <= 19.0 {
        0.0
    } else {
        138.5177312231 * (temperature - 10.0).ln() - 305.0447927307
    };

    [channel(red), channel(green), channel(blue)]
}

fn channel(value: f32) -> f32 {
    value.max(0.0).min(255.0) / 255.0
}
