use thiserror::Error;

/// Errors surfaced at the capture session boundary.
///
/// Backend failures (ordinal fetch, start-notify) never reach callers: they
/// are logged at warn level and the state machine proceeds without them.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Start was commanded without a session date selected. Nothing was
    /// acquired; the session stays idle.
    #[error("no session date selected")]
    MissingDate,

    /// Camera permission denied or device unavailable.
    #[error("camera unavailable: {0:#}")]
    DeviceAccess(anyhow::Error),

    /// Channel open failure, open timeout, or a mid-stream send error.
    /// Any resources acquired so far have already been released.
    #[error("stream channel error: {0:#}")]
    Channel(anyhow::Error),
}
