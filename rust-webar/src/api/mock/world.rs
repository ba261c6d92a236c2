use rust_webar_api::utils;
use rust_webar_api::{ARCameraIntrinsics, ARCapturedImage, ARHitTestTypes, ARNativeAnchor, ARNativeAnchorKind};
use rust_webar_api::{ARNativeCamera, ARNativeFrame, ARNativeHitResult};
use std::cmp::Ordering;

// Fake camera: landscape sensor with a centered principal point
pub const IMAGE_WIDTH: u32 = 192;
pub const IMAGE_HEIGHT: u32 = 144;
const FOCAL_LENGTH: f32 = 150.0;

// World height of the estimated floor, in meters
const FLOOR_HEIGHT: f32 = -1.4;
// Feature points closer than this to the ray are hit, in meters
const FEATURE_POINT_RADIUS: f32 = 0.05;
const EPSILON: f32 = 1e-6;

pub fn intrinsics() -> ARCameraIntrinsics {
    ARCameraIntrinsics {
        fx: FOCAL_LENGTH,
        fy: FOCAL_LENGTH,
        cx: IMAGE_WIDTH as f32 / 2.0,
        cy: IMAGE_HEIGHT as f32 / 2.0,
    }
}

/// A moving gradient, so consecutive frames differ.
pub fn captured_image(timestamp: f64) -> ARCapturedImage {
    let shift = (timestamp * 60.0) as u32;
    let mut pixels = Vec::with_capacity((IMAGE_WIDTH * IMAGE_HEIGHT * 4) as usize);
    for y in 0..IMAGE_HEIGHT {
        for x in 0..IMAGE_WIDTH {
            pixels.extend_from_slice(&[((x + shift) % 256) as u8, (y % 256) as u8, 96, 255]);
        }
    }
    ARCapturedImage {
        width: IMAGE_WIDTH,
        height: IMAGE_HEIGHT,
        pixels: pixels,
    }
}

/// Casts the ray through the normalized image point and intersects it with
/// the feature points, the estimated floor and the detected planes.
/// Nearest first.
pub fn hit_test(frame: &ARNativeFrame, point: [f32; 2], types: ARHitTestTypes) -> Vec<ARNativeHitResult> {
    let camera = utils::matrix_to_array(&frame.camera.transform);
    let origin = utils::matrix_position(&camera);
    let direction = ray_direction(&frame.camera, &camera, point);

    let mut hits = Vec::new();
    if types.contains(ARHitTestTypes::FEATURE_POINT) {
        hits.extend(feature_point_hit(frame, origin, direction));
    }
    if types.contains(ARHitTestTypes::ESTIMATED_HORIZONTAL_PLANE) {
        hits.extend(floor_hit(origin, direction));
    }
    if types.contains(ARHitTestTypes::EXISTING_PLANE) || types.contains(ARHitTestTypes::EXISTING_PLANE_USING_EXTENT) {
        for anchor in frame.anchors.iter().filter(|anchor| anchor.is_plane()) {
            plane_hits(anchor, origin, direction, types, &mut hits);
        }
    }
    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    hits
}

fn ray_direction(camera: &ARNativeCamera, transform: &[f32; 16], point: [f32; 2]) -> [f32; 3] {
    let (width, height) = (camera.image_resolution.0 as f32, camera.image_resolution.1 as f32);
    let intrinsics = &camera.intrinsics;
    let x = (point[0] * width - intrinsics.cx) / intrinsics.fx;
    let y = -(point[1] * height - intrinsics.cy) / intrinsics.fy;
    normalize(utils::transform_direction(transform, [x, y, -1.0]))
}

fn feature_point_hit(frame: &ARNativeFrame, origin: [f32; 3], direction: [f32; 3]) -> Option<ARNativeHitResult> {
    let points = frame.raw_feature_points.as_ref()?;
    let mut best: Option<([f32; 3], f32, f32)> = None;
    for point in points {
        let point = utils::vector_to_array(point);
        let offset = sub(point, origin);
        let t = dot(offset, direction);
        if t <= 0.0 {
            continue;
        }
        let miss = length(sub(offset, scale(direction, t)));
        if miss > FEATURE_POINT_RADIUS {
            continue;
        }
        if best.map_or(true, |(_, _, best_miss)| miss < best_miss) {
            best = Some((point, t, miss));
        }
    }
    best.map(|(point, t, _)| free_hit(ARHitTestTypes::FEATURE_POINT, t, point))
}

fn floor_hit(origin: [f32; 3], direction: [f32; 3]) -> Option<ARNativeHitResult> {
    if direction[1] > -EPSILON {
        return None;
    }
    let t = (FLOOR_HEIGHT - origin[1]) / direction[1];
    if t <= 0.0 {
        return None;
    }
    let point = add(origin, scale(direction, t));
    Some(free_hit(ARHitTestTypes::ESTIMATED_HORIZONTAL_PLANE, t, point))
}

// A hit on no anchor; its local transform is the world one
fn free_hit(kind: ARHitTestTypes, distance: f32, point: [f32; 3]) -> ARNativeHitResult {
    let transform = utils::array_to_matrix(&utils::translation(point));
    ARNativeHitResult {
        kind: kind,
        distance: distance,
        local_transform: transform,
        world_transform: transform,
        anchor: None,
    }
}

fn plane_hits(anchor: &ARNativeAnchor,
              origin: [f32; 3],
              direction: [f32; 3],
              types: ARHitTestTypes,
              hits: &mut Vec<ARNativeHitResult>) {
    let (center, extent) = match anchor.kind {
        ARNativeAnchorKind::Plane { center, extent } => (center, extent),
        ARNativeAnchorKind::Point => return,
    };
    let plane = utils::matrix_to_array(&anchor.transform);
    // Planes lie in their local xz plane
    let normal = normalize(utils::transform_direction(&plane, [0.0, 1.0, 0.0]));
    let denom = dot(direction, normal);
    if denom.abs() < EPSILON {
        return;
    }
    let t = dot(sub(utils::matrix_position(&plane), origin), normal) / denom;
    if t <= 0.0 {
        return;
    }
    let point = add(origin, scale(direction, t));
    let local = utils::transform_point(&utils::inverse_matrix(&plane), point);

    let mut world = plane;
    world[12] = point[0];
    world[13] = point[1];
    world[14] = point[2];
    let hit = |kind| ARNativeHitResult {
        kind: kind,
        distance: t,
        local_transform: utils::array_to_matrix(&utils::translation(local)),
        world_transform: utils::array_to_matrix(&world),
        anchor: Some(anchor.clone()),
    };

    if types.contains(ARHitTestTypes::EXISTING_PLANE) {
        hits.push(hit(ARHitTestTypes::EXISTING_PLANE));
    }
    let inside = (local[0] - center.x).abs() <= extent.x / 2.0 && (local[2] - center.z).abs() <= extent.z / 2.0;
    if inside && types.contains(ARHitTestTypes::EXISTING_PLANE_USING_EXTENT) {
        hits.push(hit(ARHitTestTypes::EXISTING_PLANE_USING_EXTENT));
    }
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(v: [f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let l = length(v);
    if l > 0.0 { scale(v, 1.0 / l) } else { v }
}
