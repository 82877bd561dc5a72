use std::path::PathBuf;
use thiserror::Error;

/// Every failure in this tool is fatal: the output file is only written after
/// the whole input set has been processed, so there is no recoverable
/// category. The scan cache is the one exception and degrades to a cold run
/// without surfacing an error at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse { path: PathBuf },

    #[error("hack transpilation failed for {path}: {stderr}")]
    Compile { path: PathBuf, stderr: String },

    #[error("failed to resolve {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode scan cache: {0}")]
    CacheEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
