//! Typed error types for term-drawer-tmux.

use thiserror::Error;

/// Failure of a tmux command or query.
#[derive(Debug, Error)]
pub enum TmuxError {
    /// The tmux binary could not be started.
    #[error("failed to run {binary}")]
    Spawn {
        /// Binary that was executed.
        binary: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// tmux exited with a non-zero status.
    #[error("tmux {command} failed ({status}): {stderr}")]
    CommandFailed {
        /// The command as it was sent, for diagnostics.
        command: String,
        /// Exit status description.
        status: String,
        /// Trimmed stderr output.
        stderr: String,
    },

    /// tmux output could not be decoded as UTF-8.
    #[error("tmux {command} produced non UTF-8 output")]
    Utf8 {
        /// The command as it was sent.
        command: String,
    },

    /// tmux output did not have the expected shape.
    #[error("unexpected output from tmux {command}: {message}")]
    Parse {
        /// The command as it was sent.
        command: String,
        /// What was wrong with the output.
        message: String,
    },
}

impl TmuxError {
    pub(crate) fn parse(command: impl ToString, message: impl Into<String>) -> Self {
        TmuxError::Parse {
            command: command.to_string(),
            message: message.into(),
        }
    }
}
