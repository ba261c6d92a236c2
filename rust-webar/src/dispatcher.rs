use crate::anchor_tracker;
use crate::ar_bridge::ARBridge;
use crate::hit_test;
use rust_webar_api::{ARCommand, CommandError};
use serde_json::Value;

impl ARBridge {
    /// Handles one raw message from the client. A malformed message fails
    /// alone and leaves the bridge untouched; unknown actions are ignored.
    pub fn handle_client_message(&mut self, message: &str) -> Result<(), CommandError> {
        let result = ARCommand::decode_str(message).and_then(|command| self.dispatch_decoded(command));
        if let Err(ref err) = result {
            warn!("Rejected client message: {}", err);
        }
        result
    }

    /// Same as `handle_client_message` for an already parsed message.
    pub fn handle_client_value(&mut self, message: Value) -> Result<(), CommandError> {
        let result = ARCommand::decode(message).and_then(|command| self.dispatch_decoded(command));
        if let Err(ref err) = result {
            warn!("Rejected client message: {}", err);
        }
        result
    }

    fn dispatch_decoded(&mut self, command: Option<ARCommand>) -> Result<(), CommandError> {
        match command {
            Some(command) => self.dispatch(command),
            None => {
                debug!("Ignoring unknown client action");
                Ok(())
            }
        }
    }

    pub fn dispatch(&mut self, command: ARCommand) -> Result<(), CommandError> {
        debug!("Client command {}", command.action());
        match command {
            ARCommand::Config(config) => self.controller.set_config(config),
            ARCommand::ResetSession => {
                self.controller.reset(&mut *self.session);
            }
            ARCommand::AddAnchor(transform) => {
                anchor_tracker::add_anchor(&mut *self.session, transform);
            }
            ARCommand::RemoveAnchors(identifiers) => {
                anchor_tracker::remove_anchors(&mut *self.session, &identifiers);
            }
            ARCommand::HitTest { point, types } => {
                let event = hit_test::hit_test(&*self.session, point, types);
                self.emit(event);
            }
            ARCommand::LoadPage(page) => self.load_page(&page)?,
        }
        Ok(())
    }
}
