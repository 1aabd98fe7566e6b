//! Error types.

use crate::record::SourceKind;
use thiserror::Error;

/// Result alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors returned by audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Spawning or reaping an external command failed at the OS level.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external configuration command exited with a failure status.
    #[error("command failed: {command}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// An external configuration command exceeded the per-call timeout.
    #[error("command timed out after {timeout_secs}s: {command}")]
    CommandTimeout {
        /// The command line that was run.
        command: String,
        /// The timeout that expired, in seconds.
        timeout_secs: u64,
    },

    /// An external command produced output that was not valid UTF-8.
    #[error("command produced non-UTF-8 output: {command}")]
    NonUtf8Output {
        /// The command line that was run.
        command: String,
    },

    /// A record whose source kind is outside the override table reached
    /// the precedence pass. Adapters never emit such records; seeing one
    /// is a contract violation upstream, not a condition to recover from.
    #[error("source kind {kind:?} has no override rank")]
    UnrankedSource {
        /// The offending kind.
        kind: SourceKind,
    },

    /// Interface enumeration failed.
    #[error("interface enumeration failed: {0}")]
    InterfaceEnumeration(String),
}

impl AuditError {
    /// Returns `true` if this is a per-call external-lookup failure that
    /// adapters swallow, as opposed to a programming-contract violation.
    #[must_use]
    pub const fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::CommandFailed { .. }
                | Self::CommandTimeout { .. }
                | Self::NonUtf8Output { .. }
        )
    }
}
