use crate::utils;
use crate::{ARTransform, ARVector3};
use uuid::Uuid;

/// Kind of a native anchor, fixed when the engine creates it.
#[derive(Debug, Clone, PartialEq)]
pub enum ARNativeAnchorKind {
    /// A bare tracked point, usually placed by the client.
    Point,
    /// A detected plane. `center` is relative to the anchor transform and
    /// `extent` is its width, height and length in meters.
    Plane { center: ARVector3, extent: ARVector3 },
}

/// An anchor as the tracking engine stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct ARNativeAnchor {
    pub identifier: Uuid,
    pub transform: ARTransform,
    pub kind: ARNativeAnchorKind,
}

impl ARNativeAnchor {
    pub fn is_plane(&self) -> bool {
        match self.kind {
            ARNativeAnchorKind::Plane { .. } => true,
            ARNativeAnchorKind::Point => false,
        }
    }
}

/// Wire form of a plain anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ARGenericAnchor {
    pub identifier: String,
    pub transform: [f32; 16],
}

/// Wire form of a plane anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ARPlaneAnchor {
    pub identifier: String,
    pub transform: [f32; 16],
    pub center: [f32; 3],
    pub extent: [f32; 3],
}

/// An anchor on the wire. The `type` tag matches the names the client uses
/// to pick its mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ARAnchor {
    #[serde(rename = "ARAnchor")]
    Generic(ARGenericAnchor),
    #[serde(rename = "ARPlaneAnchor")]
    Plane(ARPlaneAnchor),
}

impl ARAnchor {
    /// The single place native anchors are classified, so an identifier gets
    /// the same variant in lifecycle events and in frame snapshots.
    pub fn from_native(anchor: &ARNativeAnchor) -> ARAnchor {
        let identifier = identifier_string(&anchor.identifier);
        let transform = utils::matrix_to_array(&anchor.transform);
        match anchor.kind {
            ARNativeAnchorKind::Point => ARAnchor::Generic(ARGenericAnchor {
                identifier: identifier,
                transform: transform,
            }),
            ARNativeAnchorKind::Plane { ref center, ref extent } => ARAnchor::Plane(ARPlaneAnchor {
                identifier: identifier,
                transform: transform,
                center: utils::vector_to_array(center),
                extent: utils::vector_to_array(extent),
            }),
        }
    }

    /// Wire form of a native plane anchor, `None` for anything else.
    pub fn plane_from_native(anchor: &ARNativeAnchor) -> Option<ARPlaneAnchor> {
        match ARAnchor::from_native(anchor) {
            ARAnchor::Plane(plane) => Some(plane),
            ARAnchor::Generic(_) => None,
        }
    }

    pub fn identifier(&self) -> &str {
        match *self {
            ARAnchor::Generic(ref anchor) => &anchor.identifier,
            ARAnchor::Plane(ref anchor) => &anchor.identifier,
        }
    }

    pub fn transform(&self) -> &[f32; 16] {
        match *self {
            ARAnchor::Generic(ref anchor) => &anchor.transform,
            ARAnchor::Plane(ref anchor) => &anchor.transform,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        match *self {
            ARAnchor::Generic(ref anchor) => utils::all_finite(&anchor.transform),
            ARAnchor::Plane(ref anchor) => {
                utils::all_finite(&anchor.transform)
                    && utils::all_finite(&anchor.center)
                    && utils::all_finite(&anchor.extent)
            }
        }
    }
}

/// Identifiers travel as uppercase hyphenated UUIDs.
pub fn identifier_string(identifier: &Uuid) -> String {
    format!("{:X}", identifier.hyphenated())
}

/// Parses a client supplied identifier, case-insensitively.
pub fn parse_identifier(identifier: &str) -> Option<Uuid> {
    Uuid::parse_str(identifier).ok()
}
