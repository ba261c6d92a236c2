/// Why tracking quality is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ARTrackingStateReason {
    ExcessiveMotion,
    InsufficientFeatures,
    Initializing,
    Relocalizing,
}

/// Tracking quality as reported by the engine. The bridge forwards it, it
/// never derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ARTrackingState {
    Normal,
    NotAvailable,
    Limited(ARTrackingStateReason),
}

impl Default for ARTrackingState {
    fn default() -> ARTrackingState {
        ARTrackingState::NotAvailable
    }
}

impl ARTrackingState {
    /// Name the client switches on.
    pub fn name(&self) -> &'static str {
        match *self {
            ARTrackingState::Normal => "normal",
            ARTrackingState::NotAvailable => "notAvailable",
            ARTrackingState::Limited(ARTrackingStateReason::ExcessiveMotion) => "excessiveMotion",
            ARTrackingState::Limited(ARTrackingStateReason::InsufficientFeatures) => "insufficientFeatures",
            ARTrackingState::Limited(ARTrackingStateReason::Initializing) => "initializing",
            ARTrackingState::Limited(ARTrackingStateReason::Relocalizing) => "relocalizing",
        }
    }

    pub fn from_name(name: &str) -> Option<ARTrackingState> {
        let state = match name {
            "normal" => ARTrackingState::Normal,
            "notAvailable" => ARTrackingState::NotAvailable,
            "excessiveMotion" => ARTrackingState::Limited(ARTrackingStateReason::ExcessiveMotion),
            "insufficientFeatures" => ARTrackingState::Limited(ARTrackingStateReason::InsufficientFeatures),
            "initializing" => ARTrackingState::Limited(ARTrackingStateReason::Initializing),
            "relocalizing" => ARTrackingState::Limited(ARTrackingStateReason::Relocalizing),
            _ => return None,
        };
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        let states = [
            ARTrackingState::Normal,
            ARTrackingState::NotAvailable,
            ARTrackingState::Limited(ARTrackingStateReason::ExcessiveMotion),
            ARTrackingState::Limited(ARTrackingStateReason::InsufficientFeatures),
            ARTrackingState::Limited(ARTrackingStateReason::Initializing),
            ARTrackingState::Limited(ARTrackingStateReason::Relocalizing),
        ];
        for state in states.iter() {
            assert_eq!(ARTrackingState::from_name(state.name()), Some(*state));
        }
        assert_eq!(ARTrackingState::from_name("limited"), None);
    }
}
