mod session;
mod world;

pub use self::session::{MockARRemote, MockARSession};
use rust_webar_api::{ARSession, ARSessionCreator, ARSessionDelegate};

pub struct MockARSessionCreator;

impl MockARSessionCreator {
    pub fn new() -> Box<dyn ARSessionCreator> {
        Box::new(MockARSessionCreator)
    }

    /// A session plus the remote driving its fake world.
    pub fn new_with_remote(delegate: Box<dyn ARSessionDelegate>) -> (Box<dyn ARSession>, MockARRemote) {
        let session = MockARSession::new(delegate);
        let remote = session.remote();
        (Box::new(session), remote)
    }
}

impl ARSessionCreator for MockARSessionCreator {
    fn new_session(&self, delegate: Box<dyn ARSessionDelegate>) -> Box<dyn ARSession> {
        Box::new(MockARSession::new(delegate))
    }
}
