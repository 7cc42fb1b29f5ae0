/// Errors raised while loading mesh files
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read
    Io { path: PathBuf, source: io::Error },
    /// The file opened but its contents do not match the record layout
    Malformed { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        LoadError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Path of the file that failed to load
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Malformed { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "unable to open {}: {}", path.display(), source)
            }
            LoadError::Malformed { path, reason } => {
                write!(f, "malformed mesh file {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Malformed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_names_path() {
        let err = LoadError::io(
            "meshes/missing.bin",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.starts_with("unable to open meshes/missing.bin"));
        assert!(err.source().is_some());
        assert_eq!(err.path(), Path::new("meshes/missing.bin"));
    }

    #[test]
    fn test_malformed_has_no_source() {
        let err = LoadError::malformed("bad.bin", "negative vertex count -3");
        assert!(err.source().is_none());
        assert!(err.to_string().contains("negative vertex count -3"));
    }
}
