//! CLI error types.

use trellis_blocks::BlockError;
use trellis_config::ConfigError;
use trellis_site::PageError;
use trellis_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Block(#[from] BlockError),

    #[error("{0}")]
    Validation(String),
}
