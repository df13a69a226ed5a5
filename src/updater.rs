use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::console::Console;
use crate::error::{UpdaterError, UpdaterResult};
use crate::launcher::Launcher;
use crate::paths::SelfBinary;
use crate::stager::{self, STAGING_SUFFIX};

/// File name of the application relaunched after the update.
pub const TARGET_APPLICATION: &str = "song-box.exe";
/// Seconds to wait before touching any file.
pub const DEFAULT_DELAY_SECS: u64 = 8;
/// Longest accepted countdown.
pub const MAX_DELAY_SECS: u64 = 3600;

/// Configures and runs one update pass.
///
/// The run is linear: resolve the updater's own path, count down, apply the
/// staged files, relaunch the target elevated. The first error stops it.
#[derive(Debug)]
pub struct Updater {
    pub(crate) directory: PathBuf,
    pub(crate) suffix: String,
    pub(crate) target: String,
    pub(crate) delay_secs: u64,
    pub(crate) console: Console,
    pub(crate) self_binary: Option<SelfBinary>,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Targets replaced by staged files, in the order they were applied.
    pub replaced: Vec<PathBuf>,
    /// Path handed to the launcher.
    pub launched: PathBuf,
}

impl Default for Updater {
    fn default() -> Self {
        Self::new()
    }
}

impl Updater {
    /// Creates a new default configuration.
    ///
    /// # Defaults
    /// - Working directory: `.`
    /// - Staging suffix: `.new`
    /// - Target application: `song-box.exe`
    /// - Countdown: 8 seconds
    /// - Console: stdout
    pub fn new() -> Self {
        Updater {
            directory: PathBuf::from("."),
            suffix: STAGING_SUFFIX.to_owned(),
            target: TARGET_APPLICATION.to_owned(),
            delay_secs: DEFAULT_DELAY_SECS,
            console: Console::default(),
            self_binary: None,
        }
    }

    // --- Getters ---

    pub fn working_directory_path(&self) -> &Path {
        &self.directory
    }

    pub fn staging_suffix(&self) -> &str {
        &self.suffix
    }

    pub fn target_name(&self) -> &str {
        &self.target
    }

    pub fn delay(&self) -> u64 {
        self.delay_secs
    }

    // --- Builder Methods ---

    /// Sets the directory scanned for staged files.
    pub fn working_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.directory = path.into();
        self
    }

    /// Sets the suffix that marks a staged file.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_owned();
        self
    }

    /// Sets the file name of the application to relaunch.
    /// It is looked up next to the updater binary.
    pub fn target(mut self, file_name: &str) -> Self {
        self.target = file_name.to_owned();
        self
    }

    /// Sets the countdown length. `0` skips it.
    pub fn delay_secs(mut self, secs: u64) -> Self {
        self.delay_secs = secs;
        self
    }

    /// Configures where console lines go.
    pub fn console<C: Into<Console>>(mut self, console: C) -> Self {
        self.console = console.into();
        self
    }

    /// Uses `binary` instead of resolving the current executable.
    pub fn self_binary<B: Into<SelfBinary>>(mut self, binary: B) -> Self {
        self.self_binary = Some(binary.into());
        self
    }

    /// Validates the configuration without touching the filesystem.
    pub fn build(self) -> UpdaterResult<Self> {
        if self.suffix.is_empty() {
            return Err(UpdaterError::Config("staging suffix is empty".into()));
        }
        if self.target.is_empty() {
            return Err(UpdaterError::Config("target file name is empty".into()));
        }
        if self.delay_secs > MAX_DELAY_SECS {
            return Err(UpdaterError::Config(format!(
                "delay of {} seconds exceeds the {} second limit",
                self.delay_secs, MAX_DELAY_SECS
            )));
        }
        if self.target.contains(['/', '\\']) {
            return Err(UpdaterError::Config(format!(
                "target '{}' must be a file name, not a path",
                self.target
            )));
        }
        Ok(self)
    }

    /// Applies the staged files and relaunches the target through `launcher`.
    ///
    /// Never exits the process; the caller decides what to do with an error.
    pub fn run<L: Launcher>(mut self, launcher: L) -> UpdaterResult<UpdateReport> {
        let _ = self.console.banner();

        let binary = match self.self_binary.take() {
            Some(binary) => binary,
            None => SelfBinary::resolve()?,
        };
        debug!(updater = %binary.path().display(), "resolved updater path");

        let _ = self.console.log("Updating song-box.");
        let _ = self
            .console
            .log("song-box will ask to run as administrator afterwards.");
        if self.delay_secs > 0 {
            let _ = self.console.log(&format!(
                "Waiting {} seconds, do not close this window.",
                self.delay_secs
            ));
            let _ = self.console.countdown(self.delay_secs);
        }

        let _ = self.console.log("Updating...");
        let replaced =
            stager::apply_staged_files(&self.directory, &binary, &self.suffix, &mut self.console)?;
        info!(count = replaced.len(), "staged files applied");

        let launched = binary.sibling(&self.target);
        let _ = self.console.log("Starting updated song-box...");
        launcher
            .launch_elevated(&launched)
            .map_err(|source| UpdaterError::Launch {
                path: launched.clone(),
                source,
            })?;
        info!(path = %launched.display(), "elevated launch accepted");

        Ok(UpdateReport { replaced, launched })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let updater = Updater::new();
        assert_eq!(updater.working_directory_path(), Path::new("."));
        assert_eq!(updater.staging_suffix(), ".new");
        assert_eq!(updater.target_name(), "song-box.exe");
        assert_eq!(updater.delay(), 8);
    }

    #[test]
    fn build_rejects_empty_suffix() {
        let err = Updater::new().suffix("").build().unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn build_rejects_oversized_delay() {
        let err = Updater::new().delay_secs(u64::MAX).build().unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
        assert!(Updater::new().delay_secs(MAX_DELAY_SECS).build().is_ok());
    }

    #[test]
    fn build_rejects_target_paths() {
        assert!(Updater::new().target("").build().is_err());
        assert!(Updater::new().target("bin/song-box.exe").build().is_err());
        assert!(Updater::new().target("..\\song-box.exe").build().is_err());
        assert!(Updater::new().target("song-box.exe").build().is_ok());
    }
}
