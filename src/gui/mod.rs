//! Desktop front end
//!
//! - Main thread: eframe event loop, owns the wizard, status relay and
//!   busy indicator
//! - Stage workers: one fresh thread per started stage, driving the
//!   shared tokio runtime
//! - Communication: unbounded mpsc of [`StageEvent`](crate::progress::StageEvent)
//!   polled every frame

mod dialogs;
mod panels;
mod runner;
mod window;

pub use dialogs::RfdPrompter;
pub use runner::run_gui;
