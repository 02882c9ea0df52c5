//! CLI error types.

use crate::config::ConfigError;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No server script was given on the command line.
    #[error("no server script provided. Usage: quickstart <script> [args...]")]
    MissingArgument,

    /// The script is not one of the recognized forms.
    #[error(
        "an unsupported server script was provided: {script}. Supported scripts are .py, .js, \
         a Cargo project directory, or a Cargo.toml manifest"
    )]
    UnsupportedScript { script: String },

    /// The MCP server could not be started or did not complete the handshake.
    #[error("failed to start MCP server '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// The server did not answer the tool listing.
    #[error("failed to list tools from MCP server: {0}")]
    CatalogFetch(String),

    /// Configuration is invalid or incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
