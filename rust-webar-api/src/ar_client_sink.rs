use crate::ARClientMessage;
use std::sync::mpsc::Sender;

/// Outbound side of the transport to the web content client.
pub trait ARClientSink: Send {
    /// Hands one encoded event to the transport. Fire and forget.
    fn deliver(&self, message: ARClientMessage);

    /// Terminal session failure, for the user facing layer.
    fn session_failed(&self, _reason: &str) {}
}

/// Navigation shell the `loadPage` command drives.
pub trait ARPageLoader: Send {
    fn load_url(&mut self, url: &str);
}

impl ARClientSink for Sender<ARClientMessage> {
    fn deliver(&self, message: ARClientMessage) {
        if Sender::send(self, message).is_err() {
            debug!("AR client channel closed, dropping message");
        }
    }
}

#[cfg(feature = "ipc")]
impl ARClientSink for ipc_channel::ipc::IpcSender<ARClientMessage> {
    fn deliver(&self, message: ARClientMessage) {
        if let Err(err) = ipc_channel::ipc::IpcSender::send(self, message) {
            warn!("Error sending AR client message over IPC: {:?}", err);
        }
    }
}
