use std::time::Duration;

use client_core::{
    render, DiagnosisView, ExchangeError, FormValues, SubmissionController, SubmitRejected,
    UiState,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

pub struct HelpdeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    submission: SubmissionController,
    form: FormValues,
    status: String,
}

impl HelpdeskApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, form: FormValues) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            submission: SubmissionController::new(),
            form,
            status: "Diagnosis backend starting...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(UiEvent::Info(message)) => self.status = message,
                Ok(UiEvent::BackendUnavailable(reason)) => {
                    self.status = format!("Diagnosis backend unavailable: {reason}");
                    if self.submission.state().is_loading() {
                        self.submission
                            .settle(Err(ExchangeError::Unavailable(reason)));
                    }
                }
                Ok(UiEvent::DiagnosisFinished(outcome)) => self.submission.settle(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.submission.state().is_loading() {
                        self.submission.settle(Err(ExchangeError::Interrupted));
                    }
                    self.status =
                        "Diagnosis backend stopped; restart the app to submit again".to_string();
                    break;
                }
            }
        }
    }

    fn request_submit(&mut self) {
        match self.submission.begin(self.form.clone()) {
            Ok(request) => {
                if let Err(reason) =
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::Diagnose { request })
                {
                    self.submission
                        .settle(Err(ExchangeError::Unavailable(reason)));
                }
            }
            Err(SubmitRejected::AlreadyInFlight) => {
                tracing::debug!("submit ignored while a diagnosis is in flight");
            }
            Err(SubmitRejected::Invalid(err)) => {
                tracing::debug!("submission rejected before dispatch: {err}");
            }
        }
    }

    /// Returns true when the submit button was clicked.
    fn show_form(&mut self, ui: &mut egui::Ui) -> bool {
        ui.label(egui::RichText::new("Username").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.form.username)
                .hint_text("e.g. alice")
                .desired_width(f32::INFINITY),
        );

        ui.add_space(6.0);
        ui.label(egui::RichText::new("Describe your issue").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.form.issue)
                .hint_text("My VPN keeps disconnecting every few minutes...")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(8.0);
        ui.add_enabled(
            self.submission.submit_enabled(),
            egui::Button::new("Diagnose"),
        )
        .clicked()
    }

    fn show_outcome(&self, ui: &mut egui::Ui) {
        match self.submission.state() {
            UiState::Idle => {}
            UiState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing your issue...");
                });
            }
            UiState::Error(message) => show_error_banner(ui, message),
            UiState::Result(result) => show_result(ui, &render(result)),
        }
    }
}

fn show_error_banner(ui: &mut egui::Ui, message: &str) {
    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_rgb(111, 53, 53))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
        });
}

fn show_result(ui: &mut egui::Ui, view: &DiagnosisView) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        egui::Grid::new("diagnosis_result")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Ticket").strong());
                ui.label(egui::RichText::new(&view.ticket).strong());
                ui.end_row();

                ui.label(egui::RichText::new("Diagnosis").strong());
                ui.label(view.diagnosis.as_str());
                ui.end_row();

                ui.label(egui::RichText::new("Executed command").strong());
                ui.label(egui::RichText::new(&view.executed_command).monospace());
                ui.end_row();

                ui.label(egui::RichText::new("Command output").strong());
                ui.label(egui::RichText::new(&view.command_output).monospace());
                ui.end_row();

                ui.label(egui::RichText::new("Suggested fix").strong());
                ui.label(view.suggested_fix.as_str());
                ui.end_row();
            });
    });
}

impl eframe::App for HelpdeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.weak(self.status.as_str());
        });

        let mut submit_clicked = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("IT Helpdesk");
            ui.weak("Describe a computer problem and get an automated diagnosis.");
            ui.add_space(10.0);

            submit_clicked = self.show_form(ui);

            ui.add_space(12.0);
            egui::ScrollArea::vertical().show(ui, |ui| self.show_outcome(ui));
        });

        if submit_clicked {
            self.request_submit();
        }

        if self.submission.state().is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::{domain::TicketId, protocol::DiagnosisResult};

    use super::*;

    fn app_with_channels() -> (HelpdeskApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let app = HelpdeskApp::new(
            cmd_tx,
            ui_rx,
            FormValues::new("alice", "VPN not connecting"),
        );
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn submit_queues_one_command_and_disables_the_button() {
        let (mut app, cmd_rx, ui_tx) = app_with_channels();

        app.request_submit();
        app.request_submit();

        assert!(!app.submission.submit_enabled());
        let BackendCommand::Diagnose { request } = cmd_rx.try_recv().expect("queued");
        assert_eq!(request.username, "alice");
        assert_eq!(request.issue, "VPN not connecting");
        assert!(cmd_rx.try_recv().is_err());

        ui_tx
            .send(UiEvent::DiagnosisFinished(Ok(DiagnosisResult {
                diagnosis: Some("VPN client misconfigured".into()),
                ticket_id: Some(TicketId::from(1042)),
                ..DiagnosisResult::default()
            })))
            .expect("deliver");
        app.process_ui_events();

        assert!(app.submission.submit_enabled());
        let view = app.submission.view().expect("result");
        assert_eq!(view.diagnosis, "VPN client misconfigured");
        assert_eq!(view.ticket, "#1042");
    }

    #[test]
    fn server_error_shows_banner_and_reenables_submit() {
        let (mut app, _cmd_rx, ui_tx) = app_with_channels();
        app.request_submit();

        ui_tx
            .send(UiEvent::DiagnosisFinished(Err(ExchangeError::Server {
                status: 500,
                status_text: "Internal Server Error".into(),
            })))
            .expect("deliver");
        app.process_ui_events();

        assert_eq!(
            app.submission.state(),
            &UiState::Error("Error: Server error: Internal Server Error".into())
        );
        assert!(app.submission.submit_enabled());
    }

    #[test]
    fn unreachable_worker_fails_the_submission_immediately() {
        let (mut app, cmd_rx, _ui_tx) = app_with_channels();
        drop(cmd_rx);

        app.request_submit();

        let message = app.submission.error_message().expect("error banner");
        assert!(message.starts_with("Error: diagnosis backend unavailable: "));
        assert!(app.submission.submit_enabled());
    }

    #[test]
    fn vanished_worker_releases_loading() {
        let (mut app, _cmd_rx, ui_tx) = app_with_channels();
        app.request_submit();
        drop(ui_tx);

        app.process_ui_events();

        assert_eq!(
            app.submission.error_message(),
            Some("Error: submission interrupted before the diagnosis service responded")
        );
        assert!(app.submission.submit_enabled());
    }

    #[test]
    fn blank_issue_never_reaches_the_worker() {
        let (mut app, cmd_rx, _ui_tx) = app_with_channels();
        app.form.issue = "   ".into();

        app.request_submit();

        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(
            app.submission.error_message(),
            Some("Error: Please describe the issue before submitting")
        );
    }

    #[test]
    fn status_tracks_backend_info() {
        let (mut app, _cmd_rx, ui_tx) = app_with_channels();
        ui_tx
            .send(UiEvent::Info("Diagnosis backend ready".into()))
            .expect("deliver");
        app.process_ui_events();
        assert_eq!(app.status, "Diagnosis backend ready");
    }
}
