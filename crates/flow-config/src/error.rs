use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Failures reading or writing the configuration file. Each carries the path involved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid configuration file: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot encode configuration: {0}")]
    Encode(String),
}

impl ConfigError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| ConfigError::Io { path, source }
    }
}
