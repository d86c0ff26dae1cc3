use std::fmt;
use std::path::PathBuf;

use map_scan::ScanError;

#[derive(Debug)]
pub enum BuildError {
    Scan(ScanError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Archive(String),
    Config(String),
    MissingMap(PathBuf),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Scan(err) => write!(f, "scan failed: {}", err),
            BuildError::Io { path, source } => {
                write!(f, "io error ({}): {}", path.display(), source)
            }
            BuildError::Archive(message) => write!(f, "pk3 error: {}", message),
            BuildError::Config(message) => write!(f, "config error: {}", message),
            BuildError::MissingMap(path) => write!(f, "map source not found: {}", path.display()),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Scan(err) => Some(err),
            BuildError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ScanError> for BuildError {
    fn from(err: ScanError) -> Self {
        BuildError::Scan(err)
    }
}

impl From<zip::result::ZipError> for BuildError {
    fn from(err: zip::result::ZipError) -> Self {
        BuildError::Archive(err.to_string())
    }
}
