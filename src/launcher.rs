use std::path::Path;

use crate::error::LaunchError;

/// Starts the updated application.
///
/// The real implementation asks the OS for an elevated, detached process.
/// Tests substitute an implementation that records the requests.
pub trait Launcher {
    /// Requests an elevated start of `path` with no arguments.
    ///
    /// Returns once the OS accepted or refused the request; the new process
    /// is not waited for.
    fn launch_elevated(&self, path: &Path) -> Result<(), LaunchError>;
}

/// Launches through the platform's privilege-elevation facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElevatedLauncher;

impl Launcher for ElevatedLauncher {
    fn launch_elevated(&self, path: &Path) -> Result<(), LaunchError> {
        #[cfg(windows)]
        return crate::sys::windows::run_as_admin(path);

        #[cfg(unix)]
        return crate::sys::unix::run_as_admin(path);

        #[cfg(not(any(windows, unix)))]
        {
            let _ = path;
            Err(LaunchError::Unsupported)
        }
    }
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch_elevated(&self, path: &Path) -> Result<(), LaunchError> {
        (**self).launch_elevated(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn elevation_is_unsupported_off_windows() {
        let err = ElevatedLauncher
            .launch_elevated(Path::new("/opt/song-box/song-box.exe"))
            .unwrap_err();
        assert_eq!(err, LaunchError::Unsupported);
    }
}
