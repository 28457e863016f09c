//! Environment detection for terminal vs desktop
//!
//! Selects the front end when none is forced on the command line.

/// Check if a graphical desktop session is available
///
/// Returns `true` if:
/// - Not in an SSH connection (SSH_CONNECTION / SSH_CLIENT unset)
/// - A display server is reachable (DISPLAY or WAYLAND_DISPLAY set)
pub fn is_desktop_environment() -> bool {
    desktop_from(|name| std::env::var_os(name).is_some())
}

/// Check if running without a graphical session
///
/// Inverse of [`is_desktop_environment`]
pub fn is_cli_environment() -> bool {
    !is_desktop_environment()
}

fn desktop_from(is_set: impl Fn(&str) -> bool) -> bool {
    if is_set("SSH_CONNECTION") || is_set("SSH_CLIENT") {
        return false;
    }

    is_set("DISPLAY") || is_set("WAYLAND_DISPLAY")
}
