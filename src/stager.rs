use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{UpdaterError, UpdaterResult};
use crate::paths::{SelfBinary, StagedFile};

/// Default suffix of staged replacement files.
pub const STAGING_SUFFIX: &str = ".new";

/// Moves every `<name><suffix>` file in `dir` over `<name>`.
///
/// Entries are applied one at a time in file-name order. The first failure
/// aborts the pass; everything applied before it stays applied. A staged
/// copy of the running updater itself is left alone.
///
/// Returns the targets that were replaced.
pub fn apply_staged_files<W: Write>(
    dir: &Path,
    binary: &SelfBinary,
    suffix: &str,
    out: &mut W,
) -> UpdaterResult<Vec<PathBuf>> {
    let staged = collect_staged(dir, suffix)?;
    apply_all(staged, binary, out)
}

fn apply_all<W: Write>(
    staged: Vec<StagedFile>,
    binary: &SelfBinary,
    out: &mut W,
) -> UpdaterResult<Vec<PathBuf>> {
    let mut replaced = Vec::with_capacity(staged.len());

    for file in staged {
        if file.targets(binary) {
            debug!(
                staged = %file.staged_path().display(),
                "skipping staged copy of the running updater"
            );
            continue;
        }
        apply(&file)?;

        let name = file.target_path().file_name().unwrap_or_default();
        info!(target_file = %file.target_path().display(), "replaced");
        // Console output is cosmetic, a closed stdout must not fail the update.
        let _ = writeln!(out, "Updated: {}", name.to_string_lossy());
        replaced.push(file.target_path().to_path_buf());
    }
    Ok(replaced)
}

fn collect_staged(dir: &Path, suffix: &str) -> UpdaterResult<Vec<StagedFile>> {
    let read_dir_err = |source| UpdaterError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut staged = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_type().map_err(read_dir_err)?.is_dir() {
            continue;
        }
        if let Some(file) = StagedFile::from_name(dir, entry.file_name(), suffix) {
            staged.push(file);
        }
    }
    staged.sort_by(|a, b| a.staged_path().cmp(b.staged_path()));
    Ok(staged)
}

fn apply(file: &StagedFile) -> UpdaterResult<()> {
    let target = file.target_path();

    match fs::remove_file(target) {
        Ok(()) => debug!(target_file = %target.display(), "removed old file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(UpdaterError::Remove {
                target: target.to_path_buf(),
                source,
            });
        }
    }

    fs::rename(file.staged_path(), target).map_err(|source| UpdaterError::Rename {
        staged: file.staged_path().to_path_buf(),
        target: target.to_path_buf(),
        source,
    })
}
