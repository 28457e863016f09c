//! Wizard window state and the eframe update loop

use std::time::{Duration, Instant};

use eframe::egui;
use log::error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::context::InstallContext;
use crate::prefix::WineEnvironment;
use crate::progress::StageEvent;
use crate::stages::spawn_stage_worker;
use crate::status::{BusyIndicator, StatusRelay};
use crate::wizard::{Stage, WizardState};

/// Redraw cadence while nothing else asks for a repaint
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct WizardWindow {
    events: mpsc::UnboundedReceiver<StageEvent>,
    context: InstallContext,
    runtime: Handle,

    pub(super) wizard: WizardState,
    pub(super) relay: StatusRelay,
    pub(super) busy: BusyIndicator,
    /// Progress of the running step, `None` while indeterminate
    pub(super) fraction: Option<f32>,
    pub(super) detail: Option<String>,

    /// Overlay produced by stage 2, consumed by stage 3
    environment: Option<WineEnvironment>,
}

impl WizardWindow {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        events: mpsc::UnboundedReceiver<StageEvent>,
        context: InstallContext,
        runtime: Handle,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        Self {
            events,
            context,
            runtime,
            wizard: WizardState::default(),
            relay: StatusRelay::new(),
            busy: BusyIndicator::new(Instant::now()),
            fraction: Some(0.0),
            detail: None,
            environment: None,
        }
    }

    /// Drain stage events (non-blocking)
    pub fn poll_events(&mut self, now: Instant) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                StageEvent::Fraction(fraction) => self.fraction = fraction,
                StageEvent::Status(message) => self.relay.push(message, now),
                StageEvent::Detail(detail) => self.detail = Some(detail),
                StageEvent::PrefixReady(env) => self.environment = Some(env),
                StageEvent::Finished(stage) => {
                    self.wizard.complete(stage);
                    self.busy.stop();
                    self.detail = None;
                }
            }
        }
    }

    pub fn start_stage(&mut self, stage: Stage) {
        if !self.wizard.begin(stage) {
            return;
        }
        self.busy.start(Instant::now());
        self.detail = None;

        let spawned = spawn_stage_worker(
            self.runtime.clone(),
            stage,
            self.context.clone(),
            self.environment.clone(),
        );
        if let Err(e) = spawned {
            error!("Failed to start {}: {e}", stage.label());
            self.context
                .prompter
                .error("Error", &format!("Failed to start {}: {e}", stage.label()));
            self.wizard.complete(stage);
            self.busy.stop();
        }
    }
}

impl eframe::App for WizardWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_events(now);
        self.relay.tick(now);
        self.busy.tick(now);

        let running = self.wizard.is_running();

        // Window close behaves like the Exit button
        if running && ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::EnableButtons {
            close: !running,
            minimized: true,
            maximize: false,
        });

        super::panels::show_status_bar(self, ctx);

        let mut clicked = None;
        let mut exit = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                super::panels::show_wizard_panel(self, ui, &mut clicked, &mut exit);
            });
        });

        if let Some(stage) = clicked {
            self.start_stage(stage);
        }
        if exit && self.wizard.exit_enabled() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let deadline = [self.relay.next_deadline(), self.busy.next_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(POLL_INTERVAL);
        ctx.request_repaint_after(deadline.min(POLL_INTERVAL));
    }
}
