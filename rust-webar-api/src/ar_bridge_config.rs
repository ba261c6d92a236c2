/// Client-tunable settings read by every frame snapshot. Only the `config`
/// command writes it; the last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ARBridgeConfig {
    // Near clip plane of the projection, in meters
    pub near: f64,
    // Far clip plane of the projection, in meters
    pub far: f64,
    // Include raw feature points in frame snapshots
    pub point_cloud: bool,
    // Include the encoded camera image in frame snapshots
    pub image_frame: bool,
}

impl Default for ARBridgeConfig {
    fn default() -> ARBridgeConfig {
        ARBridgeConfig {
            near: 0.01,
            far: 1000.0,
            point_cloud: false,
            image_frame: false,
        }
    }
}
