use crate::anchor_tracker;
use crate::frame_serializer::ARFrameSerializer;
use crate::options::ARBridgeOptions;
use crate::page_source::ARPageSource;
use crate::session_controller::{ARRunState, ARSessionController};
use rust_webar_api::{ARBridgeEvent, ARClientSink, ARDeviceOrientation, ARInterfaceOrientation};
use rust_webar_api::{ARNativeAnchor, ARNativeFrame, ARPageLoader, ARSession, ARTrackingState};
use rust_webar_api::{ARViewGeometry, ARViewport};

/// The bridge between one tracking session and one web client.
///
/// Owns every piece of shared state and must be driven from a single
/// thread; `ARBridgeHeartbeat` does the marshalling. Engine notifications
/// enter through the `session_*` methods, client messages through
/// `handle_client_message`.
pub struct ARBridge {
    pub(crate) session: Box<dyn ARSession>,
    pub(crate) controller: ARSessionController,
    pub(crate) serializer: ARFrameSerializer,
    pub(crate) sink: Box<dyn ARClientSink>,
    pub(crate) page_loader: Option<Box<dyn ARPageLoader>>,
    pub(crate) pages: ARPageSource,
    pub(crate) default_page: String,
    pub(crate) geometry: ARViewGeometry,
}

impl ARBridge {
    pub fn new(session: Box<dyn ARSession>, sink: Box<dyn ARClientSink>, options: ARBridgeOptions) -> ARBridge {
        ARBridge {
            session: session,
            controller: ARSessionController::new(options.tracking, options.config),
            serializer: ARFrameSerializer::new(options.image.encoder()),
            sink: sink,
            page_loader: None,
            pages: options.pages,
            default_page: options.default_page,
            geometry: ARViewGeometry {
                viewport: options.viewport,
                orientation: options.orientation,
            },
        }
    }

    pub fn set_page_loader(&mut self, loader: Box<dyn ARPageLoader>) {
        self.page_loader = Some(loader);
    }

    /// Runs the session with the configured tracking. The default page is
    /// loaded on the first start only; later calls behave like `resume`.
    pub fn start(&mut self) {
        let first_start = *self.controller.run_state() == ARRunState::NotRunning;
        self.resume();
        if first_start {
            let page = self.default_page.clone();
            if let Err(err) = self.load_page(&page) {
                warn!("Cannot load default page: {}", err);
            }
        }
    }

    /// Runs the session again after `stop`, keeping the client page.
    pub fn resume(&mut self) {
        let configuration = *self.controller.configuration();
        self.controller.run(&mut *self.session, configuration);
    }

    /// Pauses the session, e.g. when the host view goes away. Anchors stay.
    pub fn stop(&mut self) {
        self.controller.pause(&mut *self.session);
    }

    pub fn controller(&self) -> &ARSessionController {
        &self.controller
    }

    pub fn session(&self) -> &dyn ARSession {
        &*self.session
    }

    pub fn geometry(&self) -> &ARViewGeometry {
        &self.geometry
    }

    pub fn set_device_orientation(&mut self, device: ARDeviceOrientation) {
        let orientation = ARInterfaceOrientation::from_device(device, self.geometry.orientation);
        if orientation != self.geometry.orientation {
            debug!("Interface orientation {:?} -> {:?}", self.geometry.orientation, orientation);
            self.geometry.orientation = orientation;
        }
    }

    pub fn set_viewport(&mut self, viewport: ARViewport) {
        self.geometry.viewport = viewport;
    }

    pub fn session_did_update_frame(&mut self, frame: &ARNativeFrame) {
        if !self.controller.is_running() {
            debug!("Dropping frame {} while {:?}", frame.timestamp, self.controller.run_state());
            return;
        }
        let data = self.serializer.serialize(frame, self.controller.config(), &self.geometry);
        self.emit(ARBridgeEvent::Frame(data));
    }

    pub fn session_did_add_anchors(&mut self, anchors: &[ARNativeAnchor]) {
        if let Some(event) = anchor_tracker::anchors_added(anchors) {
            self.emit(event);
        }
    }

    pub fn session_did_update_anchors(&mut self, anchors: &[ARNativeAnchor]) {
        if let Some(event) = anchor_tracker::anchors_updated(anchors) {
            self.emit(event);
        }
    }

    pub fn session_did_remove_anchors(&mut self, anchors: &[ARNativeAnchor]) {
        if let Some(event) = anchor_tracker::anchors_removed(anchors) {
            self.emit(event);
        }
    }

    pub fn session_was_interrupted(&mut self) {
        let event = self.controller.interruption_began();
        self.emit(event);
    }

    pub fn session_interruption_ended(&mut self) {
        let event = self.controller.interruption_ended();
        self.emit(event);
    }

    pub fn camera_did_change_tracking_state(&mut self, state: ARTrackingState) {
        let event = self.controller.tracking_state_changed(state);
        self.emit(event);
    }

    pub fn session_did_fail(&mut self, reason: &str) {
        if self.controller.is_failed() {
            return;
        }
        self.controller.fail(reason);
        self.sink.session_failed(reason);
    }

    pub(crate) fn load_page(&mut self, page: &str) -> Result<(), rust_webar_api::CommandError> {
        let url = self.pages.resolve(page)?;
        match self.page_loader {
            Some(ref mut loader) => {
                debug!("Loading {}", url);
                loader.load_url(&url);
            }
            None => warn!("No page loader, not loading {}", url),
        }
        Ok(())
    }

    pub(crate) fn emit(&self, event: ARBridgeEvent) {
        match event.encode() {
            Ok(message) => self.sink.deliver(message),
            Err(err) => warn!("Dropping {} event: {}", event.name(), err),
        }
    }
}
