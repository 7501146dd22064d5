use thiserror::Error;

/// `Fatal` halts the clock (`Hardware` stops the ticker thread on the
/// first one it sees); the others are reportable — logged by the caller
/// and otherwise ignored.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("fatal kernel error: {0}")]
    Fatal(String),

    #[error("unknown program path: {0}")]
    UnknownPath(String),

    #[error("unknown shell command: {0}")]
    UnknownCommand(String),
}
