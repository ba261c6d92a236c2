use rust_webar_api::utils;
use rust_webar_api::{ARBridgeConfig, ARCameraData, ARCameraIntrinsics, ARNativeCamera, ARViewGeometry};

/// Wire camera record for one frame.
///
/// `position` and `quaternion` come from the camera transform corrected by
/// the interface orientation, so both always describe the same pose.
/// `inverseWorldMatrix` is the inverse of the uncorrected transform.
pub fn camera_data(camera: &ARNativeCamera, config: &ARBridgeConfig, geometry: &ARViewGeometry) -> ARCameraData {
    let transform = utils::matrix_to_array(&camera.transform);
    let oriented = utils::multiply_matrix(&transform, &utils::rotation_z(geometry.orientation.rotation()));

    ARCameraData {
        transform: transform,
        projection: projection_matrix(&camera.intrinsics, camera.image_resolution, geometry, config.near, config.far),
        inverse_world_matrix: utils::inverse_matrix(&transform),
        position: utils::matrix_position(&oriented),
        euler_angles: camera.euler_angles,
        quaternion: utils::quaternion_from_matrix(&oriented),
    }
}

/// Perspective projection for the viewport the client renders into.
///
/// Built from the pinhole intrinsics of the captured image, rotated into the
/// interface orientation and scaled so the image fills the viewport the way
/// the camera feed does (aspect fill). An empty viewport skips the fill
/// correction. Near and far planes are used as given.
pub fn projection_matrix(intrinsics: &ARCameraIntrinsics,
                         resolution: (u32, u32),
                         geometry: &ARViewGeometry,
                         near: f64,
                         far: f64) -> [f32; 16] {
    let (image_width, image_height) = (resolution.0 as f32, resolution.1 as f32);

    // Principal point offset from the image center, in pixels, y down
    let ox = intrinsics.cx - image_width / 2.0;
    let oy = intrinsics.cy - image_height / 2.0;

    // The sensor is landscape right; portrait swaps the axes
    let (fx, fy, width, height) = if geometry.orientation.is_portrait() {
        (intrinsics.fy, intrinsics.fx, image_height, image_width)
    } else {
        (intrinsics.fx, intrinsics.fy, image_width, image_height)
    };
    let (s, c) = geometry.orientation.rotation().sin_cos();
    let ox_r = ox * c + oy * s;
    let oy_r = oy * c - ox * s;

    let (kx, ky) = fill_scale(width / height, geometry);

    let near = near as f32;
    let far = far as f32;
    let mut out = [0f32; 16];
    out[0] = kx * 2.0 * fx / width;
    out[5] = ky * 2.0 * fy / height;
    out[8] = -kx * 2.0 * ox_r / width;
    out[9] = ky * 2.0 * oy_r / height;
    out[10] = (far + near) / (near - far);
    out[11] = -1.0;
    out[14] = 2.0 * far * near / (near - far);
    out
}

// Scale of the x and y axes cropping the image to the viewport aspect
fn fill_scale(image_aspect: f32, geometry: &ARViewGeometry) -> (f32, f32) {
    let viewport = geometry.viewport;
    if viewport.is_empty() || !(image_aspect > 0.0) {
        return (1.0, 1.0);
    }
    let viewport_aspect = viewport.width / viewport.height;
    if viewport_aspect > image_aspect {
        (1.0, viewport_aspect / image_aspect)
    } else {
        (image_aspect / viewport_aspect, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_webar_api::{ARInterfaceOrientation, ARTrackingState, ARViewport};
    use rust_webar_api::utils::{array_to_matrix, translation};

    const EPSILON: f32 = 1e-4;

    fn intrinsics() -> ARCameraIntrinsics {
        ARCameraIntrinsics { fx: 150.0, fy: 150.0, cx: 96.0, cy: 72.0 }
    }

    fn geometry(orientation: ARInterfaceOrientation, width: f32, height: f32) -> ARViewGeometry {
        ARViewGeometry {
            viewport: ARViewport::new(width, height),
            orientation: orientation,
        }
    }

    #[test]
    fn matching_aspect_keeps_focal_scale() {
        let g = geometry(ARInterfaceOrientation::LandscapeRight, 192.0, 144.0);
        let p = projection_matrix(&intrinsics(), (192, 144), &g, 0.01, 1000.0);
        assert!((p[0] - 2.0 * 150.0 / 192.0).abs() < EPSILON);
        assert!((p[5] - 2.0 * 150.0 / 144.0).abs() < EPSILON);
        assert!(p[8].abs() < EPSILON && p[9].abs() < EPSILON);
        assert_eq!(p[11], -1.0);
        assert_eq!(p[15], 0.0);
    }

    #[test]
    fn clip_planes_follow_config() {
        let g = geometry(ARInterfaceOrientation::LandscapeRight, 0.0, 0.0);
        let p = projection_matrix(&intrinsics(), (192, 144), &g, 0.5, 10.0);
        assert!((p[10] - (10.5 / -9.5)).abs() < EPSILON);
        assert!((p[14] - (2.0 * 10.0 * 0.5 / -9.5)).abs() < EPSILON);
    }

    #[test]
    fn projection_changes_with_orientation() {
        let landscape = geometry(ARInterfaceOrientation::LandscapeRight, 375.0, 667.0);
        let portrait = geometry(ARInterfaceOrientation::Portrait, 375.0, 667.0);
        let a = projection_matrix(&intrinsics(), (192, 144), &landscape, 0.01, 1000.0);
        let b = projection_matrix(&intrinsics(), (192, 144), &portrait, 0.01, 1000.0);
        assert!((a[0] - b[0]).abs() > EPSILON || (a[5] - b[5]).abs() > EPSILON);
    }

    #[test]
    fn wider_viewport_crops_vertically() {
        let g = geometry(ARInterfaceOrientation::LandscapeRight, 400.0, 200.0);
        let p = projection_matrix(&intrinsics(), (192, 144), &g, 0.01, 1000.0);
        assert!((p[0] - 2.0 * 150.0 / 192.0).abs() < EPSILON);
        let expected = 2.0 * 150.0 / 144.0 * (2.0 / (192.0 / 144.0));
        assert!((p[5] - expected).abs() < EPSILON);
    }

    #[test]
    fn off_center_principal_point_flips_in_landscape_left() {
        let off = ARCameraIntrinsics { cx: 106.0, ..intrinsics() };
        let right = projection_matrix(&off, (192, 144), &geometry(ARInterfaceOrientation::LandscapeRight, 0.0, 0.0), 0.01, 1000.0);
        let left = projection_matrix(&off, (192, 144), &geometry(ARInterfaceOrientation::LandscapeLeft, 0.0, 0.0), 0.01, 1000.0);
        assert!(right[8].abs() > EPSILON);
        assert!((right[8] + left[8]).abs() < EPSILON);
    }

    #[test]
    fn position_comes_from_the_transform() {
        let camera = ARNativeCamera {
            transform: array_to_matrix(&translation([2.0, 0.5, -1.0])),
            intrinsics: intrinsics(),
            image_resolution: (192, 144),
            euler_angles: [0.0; 3],
            tracking_state: ARTrackingState::Normal,
        };
        let g = geometry(ARInterfaceOrientation::Portrait, 375.0, 667.0);
        let data = camera_data(&camera, &ARBridgeConfig::default(), &g);
        assert_eq!(data.position, [2.0, 0.5, -1.0]);
        let inverse = [-2.0, -0.5, 1.0];
        for i in 0..3 {
            assert!((data.inverse_world_matrix[12 + i] - inverse[i]).abs() < EPSILON);
        }
        // Portrait rolls the pose by a quarter turn around z
        let half = std::f32::consts::FRAC_PI_4;
        assert!((data.quaternion[2].abs() - half.sin()).abs() < EPSILON);
        assert!((data.quaternion[3].abs() - half.cos()).abs() < EPSILON);
    }
}
