//! Panel rendering for the wizard window

use eframe::egui;

use crate::status::BusyColor;
use crate::wizard::Stage;

use super::window::WizardWindow;

const BUTTON_WIDTH: f32 = 260.0;

/// Sunken status line along the bottom edge, fed by the status relay
pub fn show_status_bar(window: &WizardWindow, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar")
        .frame(egui::Frame::group(&ctx.style()))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(window.relay.current()).size(13.0).strong());
            });
        });
}

/// Title, progress bar, stage buttons, busy label and Exit
pub fn show_wizard_panel(
    window: &WizardWindow,
    ui: &mut egui::Ui,
    clicked: &mut Option<Stage>,
    exit: &mut bool,
) {
    ui.add_space(10.0);
    ui.label(
        egui::RichText::new("Welcome to GNU/Linux DCS Installer")
            .size(18.0)
            .strong(),
    );
    ui.add_space(10.0);

    let bar = match window.fraction {
        Some(percent) => egui::ProgressBar::new(percent / 100.0).show_percentage(),
        None => egui::ProgressBar::new(0.0).animate(true),
    };
    ui.add(bar);
    match &window.detail {
        Some(detail) => ui.small(detail),
        None => ui.small(""),
    };

    ui.add_space(8.0);

    for stage in Stage::ALL {
        let button = egui::Button::new(egui::RichText::new(stage.label()).strong())
            .min_size(egui::vec2(BUTTON_WIDTH, 0.0));
        if ui
            .add_enabled(window.wizard.is_enabled(stage), button)
            .on_hover_text(stage.hint())
            .clicked()
        {
            *clicked = Some(stage);
        }
    }

    let exit_button = egui::Button::new(egui::RichText::new("Exit").strong())
        .min_size(egui::vec2(BUTTON_WIDTH, 0.0));
    if ui
        .add_enabled(window.wizard.exit_enabled(), exit_button)
        .on_hover_text("Close the application.")
        .clicked()
    {
        *exit = true;
    }

    ui.add_space(8.0);

    let color = match window.busy.color() {
        BusyColor::Red => egui::Color32::from_rgb(200, 0, 0),
        BusyColor::Green => egui::Color32::from_rgb(0, 140, 0),
    };
    ui.label(
        egui::RichText::new(window.busy.label())
            .size(13.0)
            .strong()
            .color(color),
    );
}
