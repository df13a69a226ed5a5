use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the update run.
/// Every variant is fatal: the driver reports it and waits for the user.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// The updater could not resolve the path of its own executable.
    #[error("cannot resolve the updater executable path: {0}")]
    Resolution(#[source] io::Error),
    /// Invalid builder settings.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Listing the working directory failed.
    #[error("reading directory {}: {source}", dir.display())]
    ReadDir { dir: PathBuf, source: io::Error },
    /// The old target could not be removed (anything but NotFound).
    #[error("removing {}: {source}", target.display())]
    Remove { target: PathBuf, source: io::Error },
    /// The staged file could not be moved over its target.
    #[error("renaming {} -> {}: {source}", staged.display(), target.display())]
    Rename {
        staged: PathBuf,
        target: PathBuf,
        source: io::Error,
    },
    /// The elevated relaunch was refused or failed.
    #[error("launching {}: {source}", path.display())]
    Launch { path: PathBuf, source: LaunchError },
}

impl UpdaterError {
    /// Short name of the step that failed, shown in the failure block.
    pub fn step(&self) -> &'static str {
        match self {
            UpdaterError::Resolution(_) => "resolve",
            UpdaterError::Config(_) => "configure",
            UpdaterError::ReadDir { .. }
            | UpdaterError::Remove { .. }
            | UpdaterError::Rename { .. } => "stage",
            UpdaterError::Launch { .. } => "launch",
        }
    }
}

/// Failure of the privilege-elevating launch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    /// The path contains an interior NUL and cannot be passed to the OS.
    #[error("path cannot be encoded for the OS: {0}")]
    InvalidPath(PathBuf),
    /// The user declined the elevation prompt.
    #[error("elevation request was cancelled by the user")]
    Cancelled,
    /// (Windows) ShellExecuteW failed with this Win32 error code.
    #[error("ShellExecuteW failed with Win32 error code {code}")]
    Os { code: i32 },
    /// Elevated launch is only implemented for Windows.
    #[error("elevated launch is not supported on this platform")]
    Unsupported,
}

/// A specialized Result type for updater operations.
pub type UpdaterResult<T> = Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_errors_name_the_target() {
        let err = UpdaterError::Remove {
            target: PathBuf::from("app.dll"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.step(), "stage");
        assert!(err.to_string().contains("app.dll"));
    }

    #[test]
    fn launch_error_is_the_source() {
        use std::error::Error as _;

        let err = UpdaterError::Launch {
            path: PathBuf::from("song-box.exe"),
            source: LaunchError::Cancelled,
        };
        assert_eq!(err.step(), "launch");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("elevation request was cancelled by the user"));
    }
}
