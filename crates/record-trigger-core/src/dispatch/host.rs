/// Actions the host exposes for remote triggers.
///
/// Both methods are called synchronously from the listener's background
/// thread, once per decoded command. Implementations that need a specific
/// thread (a UI thread, an async runtime) must hand the work off themselves.
pub trait RecordingControl: Send + Sync {
    /// Begin a recording session.
    fn start_recording(&self);

    /// End the current recording session.
    fn stop_recording(&self);
}
