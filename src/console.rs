use std::fs::File;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::error::UpdaterError;

const PREFIX: &str = "> ";

/// Where the human-facing console lines go.
#[derive(Debug, Default)]
pub enum Console {
    /// Writes to the process stdout. Default option.
    #[default]
    Keep,
    /// Writes to the specified file.
    RedirectToFile(File),
    /// Discards everything (useful for tests and unattended runs).
    Discard,
}

impl Console {
    /// Creates a console that discards all output.
    pub fn discard() -> Self {
        Console::Discard
    }

    /// Prints the startup banner.
    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self, "==== song-box-updater v{} ====", env!("CARGO_PKG_VERSION"))
    }

    /// Prints a `> `-prefixed status line.
    pub fn log(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self, "{}{}", PREFIX, msg)
    }

    /// Prints a growing row of dots, one per second.
    ///
    /// Gives the target application time to exit and release its files
    /// before the staged replacements are applied.
    pub fn countdown(&mut self, secs: u64) -> io::Result<()> {
        self.countdown_every(secs, Duration::from_secs(1))
    }

    fn countdown_every(&mut self, ticks: u64, tick: Duration) -> io::Result<()> {
        if ticks == 0 {
            return Ok(());
        }
        for _ in 0..ticks {
            write!(self, ".")?;
            self.flush()?;
            thread::sleep(tick);
        }
        writeln!(self)
    }

    /// Prints the labelled failure block for a fatal error.
    pub fn fatal(&mut self, err: &UpdaterError) -> io::Result<()> {
        self.log("======== UPDATE FAILED ========")?;
        self.log(&format!("{} error: {}", err.step(), err))?;
        writeln!(self, "To exit, close this window or press Ctrl+C in it.")?;
        self.flush()
    }
}

impl From<File> for Console {
    fn from(f: File) -> Self {
        Console::RedirectToFile(f)
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Console::Keep => io::stdout().write(buf),
            Console::RedirectToFile(f) => f.write(buf),
            Console::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Console::Keep => io::stdout().flush(),
            Console::RedirectToFile(f) => f.flush(),
            Console::Discard => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};
    use std::path::PathBuf;

    fn captured(write: impl FnOnce(&mut Console)) -> String {
        let file = tempfile::tempfile().unwrap();
        let mut console = Console::from(file.try_clone().unwrap());
        write(&mut console);

        let mut file = file;
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn log_lines_are_prefixed() {
        let out = captured(|c| c.log("Updating...").unwrap());
        assert_eq!(out, "> Updating...\n");
    }

    #[test]
    fn zero_second_countdown_prints_nothing() {
        let out = captured(|c| c.countdown(0).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn countdown_prints_one_dot_per_tick() {
        let out = captured(|c| c.countdown_every(3, Duration::ZERO).unwrap());
        assert_eq!(out, "...\n");
    }

    #[test]
    fn fatal_block_names_step_and_target() {
        let err = UpdaterError::Rename {
            staged: PathBuf::from("app.dll.new"),
            target: PathBuf::from("app.dll"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let out = captured(|c| c.fatal(&err).unwrap());
        assert!(out.contains("UPDATE FAILED"));
        assert!(out.contains("> stage error: renaming app.dll.new -> app.dll"));
        assert!(out.contains("Ctrl+C"));
    }

    #[test]
    fn discard_swallows_output() {
        let mut console = Console::discard();
        assert_eq!(console.write(b"hello").unwrap(), 5);
        console.banner().unwrap();
    }
}
