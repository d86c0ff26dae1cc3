use std::fmt;
use std::path::PathBuf;

/// Fatal failures of a map scan. Every variant aborts the build.
#[derive(Debug)]
pub enum ScanError {
    MapRead {
        path: PathBuf,
        source: std::io::Error,
    },
    ModelRead {
        path: PathBuf,
        source: std::io::Error,
    },
    ShaderDir {
        path: PathBuf,
        source: std::io::Error,
    },
    ShaderRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::MapRead { path, source } => {
                write!(f, "map read failed ({}): {}", path.display(), source)
            }
            ScanError::ModelRead { path, source } => {
                write!(f, "model read failed ({}): {}", path.display(), source)
            }
            ScanError::ShaderDir { path, source } => {
                write!(f, "shader dir read failed ({}): {}", path.display(), source)
            }
            ScanError::ShaderRead { path, source } => {
                write!(f, "shader read failed ({}): {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::MapRead { source, .. }
            | ScanError::ModelRead { source, .. }
            | ScanError::ShaderDir { source, .. }
            | ScanError::ShaderRead { source, .. } => Some(source),
        }
    }
}
