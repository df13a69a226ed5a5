use crate::error::LaunchError;
use std::path::Path;
use tracing::warn;

/// There is no shell-execute elevation facility on Unix hosts.
///
/// The updater never falls back to a plain launch, so this always fails.
pub fn run_as_admin(path: &Path) -> Result<(), LaunchError> {
    warn!(path = %path.display(), "elevated launch requested on a non-Windows host");
    Err(LaunchError::Unsupported)
}
