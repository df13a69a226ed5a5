use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{UpdaterError, UpdaterResult};

/// Absolute path of the running updater executable.
///
/// Resolved once at startup and passed down by reference. Its file name is
/// never treated as a staging target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfBinary(PathBuf);

impl SelfBinary {
    /// Resolves the path of the current executable.
    pub fn resolve() -> UpdaterResult<Self> {
        env::current_exe().map(SelfBinary).map_err(UpdaterError::Resolution)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Base file name, e.g. `song-box-updater.exe`.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.0.file_name()
    }

    /// Directory the updater was started from.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the application to relaunch: a sibling of the updater.
    pub fn sibling(&self, file_name: &str) -> PathBuf {
        self.dir().join(file_name)
    }
}

impl From<PathBuf> for SelfBinary {
    fn from(path: PathBuf) -> Self {
        SelfBinary(path)
    }
}

impl From<&Path> for SelfBinary {
    fn from(path: &Path) -> Self {
        SelfBinary(path.to_path_buf())
    }
}

/// A `<target>.new` entry waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    staged: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Builds a staged entry from a directory entry name.
    ///
    /// The suffix is matched on the raw name, so names that are not valid
    /// Unicode are staged like any other. Returns `None` when the name does
    /// not end with `suffix` or when stripping it leaves nothing.
    pub fn from_name<N: AsRef<OsStr>>(dir: &Path, name: N, suffix: &str) -> Option<Self> {
        let name = name.as_ref();
        let target = name.as_encoded_bytes().strip_suffix(suffix.as_bytes())?;
        if target.is_empty() {
            return None;
        }
        // SAFETY: `target` is `name` cut right before `suffix`, a valid UTF-8
        // substring (or all of `name` when `suffix` is empty).
        let target = unsafe { OsStr::from_encoded_bytes_unchecked(target) };
        Some(StagedFile {
            staged: dir.join(name),
            target: dir.join(target),
        })
    }

    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// File name of the target, as matched against the self binary.
    pub fn target_name(&self) -> Option<&OsStr> {
        self.target.file_name()
    }

    /// True if applying this entry would overwrite the running updater.
    pub fn targets(&self, binary: &SelfBinary) -> bool {
        match (self.target_name(), binary.file_name()) {
            (Some(target), Some(own)) => target == own,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix() {
        let staged = StagedFile::from_name(Path::new("dir"), "app.dll.new", ".new").unwrap();
        assert_eq!(staged.staged_path(), Path::new("dir/app.dll.new"));
        assert_eq!(staged.target_path(), Path::new("dir/app.dll"));
    }

    #[test]
    fn ignores_other_names() {
        assert!(StagedFile::from_name(Path::new("."), "app.dll", ".new").is_none());
        assert!(StagedFile::from_name(Path::new("."), "app.new.dll", ".new").is_none());
        assert!(StagedFile::from_name(Path::new("."), ".new", ".new").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn strips_suffix_from_non_unicode_names() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.dll.new");
        let staged = StagedFile::from_name(Path::new("dir"), name, ".new").unwrap();
        assert_eq!(
            staged.target_path(),
            Path::new("dir").join(OsStr::from_bytes(b"caf\xe9.dll"))
        );
    }

    #[test]
    fn matches_own_binary_by_file_name() {
        let own = SelfBinary::from(PathBuf::from("/opt/song-box/song-box-updater.exe"));
        let staged =
            StagedFile::from_name(Path::new("."), "song-box-updater.exe.new", ".new").unwrap();
        assert!(staged.targets(&own));

        let other = StagedFile::from_name(Path::new("."), "song-box.exe.new", ".new").unwrap();
        assert!(!other.targets(&own));
    }

    #[test]
    fn sibling_sits_next_to_the_updater() {
        let own = SelfBinary::from(PathBuf::from("/opt/song-box/song-box-updater.exe"));
        assert_eq!(own.dir(), Path::new("/opt/song-box"));
        assert_eq!(
            own.sibling("song-box.exe"),
            PathBuf::from("/opt/song-box/song-box.exe")
        );
    }
}
