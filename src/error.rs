//! Error types of the presentation port.
//!
//! The engine itself never fails: admission rejections are [`DropReason`]s and
//! stale dismissals are no-ops. The only errors are about reaching the engine
//! at all, and they surface only from the port calls that return a value.
//!
//! [`DropReason`]: crate::DropReason

use thiserror::Error;

/// Error returned by [`Toaster`](crate::Toaster) requests that return a value.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Mailbox is full (try again later or use the async variant).
    #[error("engine mailbox full")]
    Full,

    /// Engine has shut down.
    #[error("engine closed")]
    Closed,
}

impl PortError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use toastvisor::PortError;
    ///
    /// assert_eq!(PortError::Full.as_label(), "port_full");
    /// assert_eq!(PortError::Closed.to_string(), "engine closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PortError::Full => "port_full",
            PortError::Closed => "port_closed",
        }
    }

    /// True if retrying later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortError::Full)
    }
}
