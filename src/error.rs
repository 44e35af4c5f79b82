use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Transport failure, including non-2xx responses.
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ImportError {
    pub fn network(url: impl ToString, reason: impl ToString) -> Self {
        ImportError::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: impl ToString, reason: impl ToString) -> Self {
        ImportError::Parse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::FileSystem {
            path: path.into(),
            source,
        }
    }
}
