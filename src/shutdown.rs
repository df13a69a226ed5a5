use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;

use crate::error::UpdaterResult;

/// Exit status after a successful update and relaunch.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status after any fatal error.
pub const EXIT_FAILURE: i32 = 1;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maps the outcome of a run to the process exit status.
pub fn exit_code<T>(result: &UpdaterResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Blocks until the user interrupts the process (Ctrl+C) or closes the
/// console window. There is no timeout.
///
/// The caller exits with [`EXIT_FAILURE`] afterwards; on Windows closing the
/// window exits with it directly.
pub fn wait_for_exit() -> io::Result<()> {
    let term = Arc::new(AtomicBool::new(false));
    for sig in TERM_SIGNALS {
        flag::register(*sig, Arc::clone(&term))?;
    }
    // Registered after the CRT handler that signal-hook installs, so it runs first.
    #[cfg(windows)]
    crate::sys::windows::exit_on_console_close()?;
    wait_until(&term, POLL_INTERVAL);
    Ok(())
}

fn wait_until(flag: &AtomicBool, poll: Duration) {
    while !flag.load(Ordering::Relaxed) {
        thread::sleep(poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdaterError;

    #[test]
    fn exit_codes() {
        let ok: UpdaterResult<()> = Ok(());
        let err: UpdaterResult<()> = Err(UpdaterError::Config("empty suffix".into()));
        assert_eq!(exit_code(&ok), 0);
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn wait_returns_once_flag_is_raised() {
        let term = Arc::new(AtomicBool::new(false));
        let raiser = {
            let term = Arc::clone(&term);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                term.store(true, Ordering::Relaxed);
            })
        };

        wait_until(&term, Duration::from_millis(5));

        assert!(term.load(Ordering::Relaxed));
        raiser.join().unwrap();
    }
}
