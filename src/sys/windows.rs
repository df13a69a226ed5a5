use crate::error::LaunchError;
use crate::shutdown::EXIT_FAILURE;
use std::ffi::OsStr;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

mod win_api {
    use std::ffi::c_void;

    #[link(name = "shell32")]
    unsafe extern "system" {
        pub fn ShellExecuteW(
            hwnd: *mut c_void,
            lpOperation: *const u16,
            lpFile: *const u16,
            lpParameters: *const u16,
            lpDirectory: *const u16,
            nShowCmd: i32,
        ) -> *mut c_void;
    }

    pub type HandlerRoutine = unsafe extern "system" fn(ctrl_type: u32) -> i32;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        pub fn SetConsoleCtrlHandler(handler: Option<HandlerRoutine>, add: i32) -> i32;
    }

    pub const SW_NORMAL: i32 = 1;
    pub const CTRL_BREAK_EVENT: u32 = 1;
    pub const CTRL_CLOSE_EVENT: u32 = 2;
    pub const CTRL_LOGOFF_EVENT: u32 = 5;
    pub const CTRL_SHUTDOWN_EVENT: u32 = 6;
    pub const ERROR_CANCELLED: i32 = 1223;
    /// ShellExecuteW reports failure with a pseudo-handle of 32 or less.
    pub const SHELL_EXECUTE_MAX_ERROR: usize = 32;
}

/// Starts `path` through the UAC prompt (`runas` verb).
///
/// No arguments, no working directory override, default window state.
/// The child is independent of this process.
pub fn run_as_admin(path: &Path) -> Result<(), LaunchError> {
    let verb: Vec<u16> = OsStr::new("runas").encode_wide().chain(Some(0)).collect();
    let file =
        to_wide(path.as_os_str()).ok_or_else(|| LaunchError::InvalidPath(path.to_path_buf()))?;

    let result = unsafe {
        win_api::ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            file.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            win_api::SW_NORMAL,
        )
    };

    if result as usize > win_api::SHELL_EXECUTE_MAX_ERROR {
        return Ok(());
    }

    match io::Error::last_os_error().raw_os_error().unwrap_or(0) {
        win_api::ERROR_CANCELLED => Err(LaunchError::Cancelled),
        code => Err(LaunchError::Os { code }),
    }
}

/// Makes closing the console window (and Ctrl+Break, logoff, shutdown)
/// end the process with the failure status instead of the OS default.
///
/// Ctrl+C is passed on to the next handler.
pub fn exit_on_console_close() -> io::Result<()> {
    if unsafe { win_api::SetConsoleCtrlHandler(Some(on_console_event), 1) } == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

unsafe extern "system" fn on_console_event(ctrl_type: u32) -> i32 {
    if exits_on(ctrl_type) {
        std::process::exit(EXIT_FAILURE);
    }
    0
}

fn exits_on(ctrl_type: u32) -> bool {
    matches!(
        ctrl_type,
        win_api::CTRL_BREAK_EVENT
            | win_api::CTRL_CLOSE_EVENT
            | win_api::CTRL_LOGOFF_EVENT
            | win_api::CTRL_SHUTDOWN_EVENT
    )
}

/// NUL-terminated UTF-16, or `None` if the string has an interior NUL.
fn to_wide(s: &OsStr) -> Option<Vec<u16>> {
    let mut wide: Vec<u16> = s.encode_wide().collect();
    if wide.contains(&0) {
        return None;
    }
    wide.push(0);
    Some(wide)
}
