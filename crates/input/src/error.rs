use thiserror::Error;

/// Failure talking to a controller backend. The poller treats every
/// variant the same way: log, drop held buttons, retry detection later.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no controller detected")]
    NotFound,
    #[error("controller disconnected: {0}")]
    Disconnected(String),
    #[error("controller I/O error: {0}")]
    Io(#[from] std::io::Error),
}
