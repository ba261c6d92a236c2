/// The bridge confines its state to one thread. Whichever thread owns it
/// (normally the UI thread hosting the web view) calls the heartbeat to
/// apply everything the engine and the client posted since the last beat.
/// Implementations will usually be neither `Sync` nor `Send`.
pub trait ARMainThreadHeartbeat {
    /// Run the heartbeat on the owning thread.
    fn heartbeat(&mut self);

    /// Is the heartbeat expecting to be called every frame?
    fn heart_racing(&self) -> bool;
}
