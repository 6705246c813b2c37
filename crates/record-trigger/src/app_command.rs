/// Commands forwarded from the trigger listener thread to the app loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// A remote start trigger arrived.
    StartRecording,
    /// A remote stop trigger arrived.
    StopRecording,
    /// Request application shutdown.
    Shutdown,
}
