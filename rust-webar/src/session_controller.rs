use rust_webar_api::{ARBridgeConfig, ARBridgeEvent, ARRunOptions, ARSession, ARTrackingState};
use rust_webar_api::ARWorldTrackingConfiguration;

/// Run state of the tracking session. Tracking quality and interruptions
/// are tracked separately.
#[derive(Debug, Clone, PartialEq)]
pub enum ARRunState {
    NotRunning,
    Running,
    Paused,
    // Terminal, the engine gave up
    Failed(String),
}

/// Session state machine. Owns the bridge configuration the frame
/// serializer reads.
pub struct ARSessionController {
    run_state: ARRunState,
    configuration: ARWorldTrackingConfiguration,
    tracking_state: ARTrackingState,
    interrupted: bool,
    config: ARBridgeConfig,
}

impl ARSessionController {
    pub fn new(configuration: ARWorldTrackingConfiguration, config: ARBridgeConfig) -> ARSessionController {
        ARSessionController {
            run_state: ARRunState::NotRunning,
            configuration: configuration,
            tracking_state: ARTrackingState::NotAvailable,
            interrupted: false,
            config: config,
        }
    }

    /// After an interruption the engine always tries to relocalize, keeping
    /// anchors valid across the gap.
    pub fn should_attempt_relocalization() -> bool {
        true
    }

    pub fn run_state(&self) -> &ARRunState {
        &self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == ARRunState::Running
    }

    pub fn is_failed(&self) -> bool {
        match self.run_state {
            ARRunState::Failed(_) => true,
            _ => false,
        }
    }

    pub fn tracking_state(&self) -> ARTrackingState {
        self.tracking_state
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn configuration(&self) -> &ARWorldTrackingConfiguration {
        &self.configuration
    }

    pub fn config(&self) -> &ARBridgeConfig {
        &self.config
    }

    /// Last writer wins.
    pub fn set_config(&mut self, config: ARBridgeConfig) {
        debug!("Bridge config set to {:?}", config);
        self.config = config;
    }

    /// Runs the session with `configuration`. Returns false when nothing was
    /// done: the session failed, or it already runs that configuration.
    pub fn run(&mut self, session: &mut dyn ARSession, configuration: ARWorldTrackingConfiguration) -> bool {
        match self.run_state {
            ARRunState::Failed(_) => {
                warn!("Not running a failed session");
                return false;
            }
            ARRunState::Running if self.configuration == configuration => return false,
            _ => {}
        }
        self.configuration = configuration;
        session.run(&self.configuration, ARRunOptions::default());
        self.transition(ARRunState::Running);
        true
    }

    pub fn pause(&mut self, session: &mut dyn ARSession) -> bool {
        if !self.is_running() {
            return false;
        }
        session.pause();
        self.transition(ARRunState::Paused);
        true
    }

    /// Reruns the current configuration from scratch: tracking history and
    /// every anchor are dropped. The engine reports no anchor removals.
    pub fn reset(&mut self, session: &mut dyn ARSession) -> bool {
        if self.is_failed() {
            warn!("Not resetting a failed session");
            return false;
        }
        session.run(&self.configuration, ARRunOptions::reset());
        self.transition(ARRunState::Running);
        true
    }

    /// The engine stopped for good.
    pub fn fail(&mut self, reason: &str) {
        error!("AR session failed: {}", reason);
        self.transition(ARRunState::Failed(reason.to_owned()));
    }

    pub fn interruption_began(&mut self) -> ARBridgeEvent {
        self.interrupted = true;
        ARBridgeEvent::SessionInterrupted
    }

    pub fn interruption_ended(&mut self) -> ARBridgeEvent {
        self.interrupted = false;
        ARBridgeEvent::SessionInterruptionEnded
    }

    /// Every change is forwarded, however quickly they follow each other.
    pub fn tracking_state_changed(&mut self, state: ARTrackingState) -> ARBridgeEvent {
        debug!("Tracking state {} -> {}", self.tracking_state.name(), state.name());
        self.tracking_state = state;
        ARBridgeEvent::TrackingStateChange(state)
    }

    fn transition(&mut self, state: ARRunState) {
        debug!("Session {:?} -> {:?}", self.run_state, state);
        self.run_state = state;
    }
}
