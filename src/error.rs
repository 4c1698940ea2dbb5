use std::io;
use std::path::PathBuf;

/// Errors from the layers around the renderer. Parsing itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("typst compilation failed: {0}")]
    Typst(String),

    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
