//! Install DCS World on GNU/Linux through an isolated Wine prefix
//!
//! The install runs as three user-gated stages: fetch the Wine runtime and
//! the web installer, build a prefix around the runtime, then run the
//! installer inside it. [`stages`] holds the stage operations, [`terminal`]
//! and `gui` are the two front ends driving them.

pub mod config;
pub mod context;
pub mod download;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod installer;
pub mod prefix;
pub mod privilege;
pub mod process;
pub mod progress;
pub mod prompt;
pub mod stages;
pub mod status;
pub mod terminal;
pub mod wizard;
pub mod workspace;

#[cfg(feature = "gui")]
pub mod gui;

pub use config::InstallerConfig;
pub use context::InstallContext;
pub use error::InstallerError;
pub use workspace::Workspace;
