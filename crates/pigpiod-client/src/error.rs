//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

use pigpiod_protocol::{failure_message, Command, ProtocolError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
///
/// Transport failures (`Connection`, `Io`) are fatal to the current call and
/// never retried internally. `Protocol` indicates a framing bug or daemon
/// incompatibility. `Command` is a well-formed exchange the daemon rejected;
/// callers may retry with corrected parameters. The remaining kinds are
/// lifecycle misuses of the notification channel or an SPI device.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting to the daemon failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// IO error on an established connection or the notification pipe.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame or daemon incompatibility.
    #[error(transparent)]
    Protocol(ProtocolError),

    /// The daemon rejected a command; the message carries the classified
    /// cause.
    #[error("{message}")]
    Command {
        command: Command,
        code: i32,
        message: String,
    },

    /// Notification operation attempted before `open()`.
    #[error("Notifier needs to be opened first")]
    HandleMissing,

    /// `tick()` attempted before `start()`.
    #[error("Notifier needs to be started first")]
    NotStarted,

    /// The notification pipe handle is no longer usable.
    #[error("File handle to pipe is invalid")]
    BrokenPipe,

    /// The daemon refused to hand out a notification handle.
    #[error("Failed receiving notification handle (Error: {code})")]
    OpeningFailed { code: i32 },

    /// The daemon created a handle but its pipe path is not readable.
    #[error("Failed to open file handle to pipe {}", path.display())]
    OpeningPipeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The begin-monitoring exchange failed.
    #[error("Failed starting notification (Error: {code})")]
    BeginFailed { code: i32 },

    /// The pause-notification exchange failed.
    #[error("Failed pausing notification (Error: {code})")]
    PauseFailed { code: i32 },

    /// The cancel-notification exchange failed.
    #[error("Failed canceling notification (Error: {code})")]
    CancelFailed { code: i32 },

    /// SPI operation attempted on a device that is not open.
    #[error("Device needs to be opened first for {operation}")]
    DeviceNotOpen { operation: &'static str },
}

impl ClientError {
    /// Builds a classified command failure from a daemon status code.
    pub fn command_failure(command: Command, code: i32) -> Self {
        Self::Command {
            command,
            code,
            message: failure_message(command, code),
        }
    }

    /// The daemon status code behind this error, if it carries one.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::Command { code, .. }
            | Self::OpeningFailed { code }
            | Self::BeginFailed { code }
            | Self::PauseFailed { code }
            | Self::CancelFailed { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        // Short reads and connection resets surface from the framing layer
        // as IO; keep them in the transport taxonomy.
        match err {
            ProtocolError::Io(io) => Self::Io(io),
            other => Self::Protocol(other),
        }
    }
}
