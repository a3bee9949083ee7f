use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("ir json not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid IR JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize lookup result")]
    Render(#[from] serde_json::Error),
}

impl LookupError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
