//! Desktop entry point

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::context::InstallContext;
use crate::progress::{ProgressReporter, StageEvent};

use super::window::WizardWindow;

/// Open the wizard window and block until it closes
///
/// Must run on the main thread, outside the runtime; stage workers are
/// driven through `runtime`.
pub fn run_gui(context: InstallContext, runtime: Handle) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<StageEvent>();
    let context = context.with_progress(ProgressReporter::new(tx));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([400.0, 300.0])
            .with_resizable(false)
            .with_title("DCS GNU/Linux Installer"),
        ..Default::default()
    };

    eframe::run_native(
        "dcs_linux_installer",
        native_options,
        Box::new(move |cc| Ok(Box::new(WizardWindow::new(cc, rx, context, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}
