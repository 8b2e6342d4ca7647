use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, FormValues, HttpDiagnosisExchange};
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::HelpdeskApp;

const APP_TITLE: &str = "IT Helpdesk Auto-Responder";

#[derive(Parser, Debug)]
struct Args {
    /// Origin of the diagnosis service, e.g. http://127.0.0.1:8000
    #[arg(long)]
    server_url: Option<String>,
    /// Prefills the username field.
    #[arg(long)]
    username: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let exchange = HttpDiagnosisExchange::from_settings(&settings)
        .context("failed to configure diagnosis service")?;
    tracing::info!(endpoint = %exchange.endpoint(), "diagnosis service configured");

    let username = args
        .username
        .or(settings.default_username)
        .unwrap_or_default();
    let form = FormValues::new(username, String::new());

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(exchange));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(HelpdeskApp::new(cmd_tx, ui_rx, form)))),
    )
    .map_err(|err| anyhow!("desktop UI exited with an error: {err}"))
}
