//! Root refusal
//!
//! Prefixes must stay owned by the desktop user.

use nix::unistd::Uid;

/// Printed to stdout before exiting with status 1
pub const ROOT_REFUSAL: &str = "This installer is not supposed to be run as root!";

/// Refusal message when `euid` is root, checked before any window opens
pub fn refusal(euid: Uid) -> Option<&'static str> {
    euid.is_root().then_some(ROOT_REFUSAL)
}

/// [`refusal`] for the running process
#[inline]
pub fn current_refusal() -> Option<&'static str> {
    refusal(nix::unistd::geteuid())
}
