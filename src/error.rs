use std::io;

use thiserror::Error;

/// 持久化与启动阶段的错误
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode persisted board: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("failed to encode board: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("could not determine the user data directory")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, Error>;
