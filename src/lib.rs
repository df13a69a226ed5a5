//! # song-box-updater
//!
//! A small launcher shipped next to song-box. The application downloads its
//! update as `<file>.new` entries, starts this updater and exits. The updater
//! then moves every staged file over the file it supersedes (never its own
//! binary) and starts song-box again through the Windows UAC prompt.
//!
//! ```no_run
//! use song_box_updater::{ElevatedLauncher, Updater};
//!
//! let report = Updater::new().build()?.run(ElevatedLauncher)?;
//! println!("{} files updated", report.replaced.len());
//! # Ok::<(), song_box_updater::UpdaterError>(())
//! ```

mod console;
mod error;
mod launcher;
mod paths;
mod shutdown;
mod stager;
mod sys;
mod updater;

// Re-export public types to keep the API flat
pub use console::Console;
pub use error::{LaunchError, UpdaterError, UpdaterResult};
pub use launcher::{ElevatedLauncher, Launcher};
pub use paths::{SelfBinary, StagedFile};
pub use shutdown::{EXIT_FAILURE, EXIT_SUCCESS, exit_code, wait_for_exit};
pub use stager::{STAGING_SUFFIX, apply_staged_files};
pub use updater::{
    DEFAULT_DELAY_SECS, MAX_DELAY_SECS, TARGET_APPLICATION, UpdateReport, Updater,
};
