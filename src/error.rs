use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The extension does not start with a dot.
    #[error("invalid extension {0:?}: must start with '.'")]
    InvalidExtension(String),
    /// No ProgId can be derived from the executable's file name.
    #[error("invalid executable path {0:?}: no file name to derive a ProgId from")]
    InvalidExecutable(String),
    /// Passed through untouched from the registry layer.
    #[error(transparent)]
    Registry(#[from] io::Error),
}
