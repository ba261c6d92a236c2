use crate::{ARLightEstimate, ARTrackingState, ARTransform, ARVector3};
use uuid::Uuid;

/// Drives the fake world of a mock tracking engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MockARControlMsg {
    SetCameraTransform(ARTransform),
    // Starts tracking a plane: transform, center, extent
    DetectPlane(ARTransform, ARVector3, ARVector3),
    // Grows or moves a known plane: identifier, center, extent
    UpdatePlane(Uuid, ARVector3, ARVector3),
    // The first plane absorbs the second one, which is removed
    MergePlanes(Uuid, Uuid),
    SetFeaturePoints(Vec<ARVector3>),
    SetLightEstimate(Option<ARLightEstimate>),
    SetTrackingState(ARTrackingState),
    Interrupt,
    EndInterruption,
    Fail(String),
}
