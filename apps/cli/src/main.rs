use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, render, DiagnosisView, FormValues, HttpDiagnosisExchange,
    SubmissionController, UiState,
};
use shared::protocol::DiagnosisResult;

/// Submit an IT issue to the helpdesk diagnosis service.
#[derive(Parser, Debug)]
struct Args {
    /// Description of the problem.
    #[arg(long)]
    issue: String,
    #[arg(long)]
    username: Option<String>,
    /// Origin of the diagnosis service, e.g. http://127.0.0.1:8000
    #[arg(long)]
    server_url: Option<String>,
    /// Print the raw diagnosis as JSON instead of the rendered fields.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let username = args
        .username
        .or_else(|| settings.default_username.clone())
        .unwrap_or_default();

    let exchange = HttpDiagnosisExchange::from_settings(&settings)
        .context("failed to configure diagnosis service")?;
    let mut controller = SubmissionController::new();

    match controller
        .submit(&exchange, FormValues::new(username, args.issue))
        .await
    {
        UiState::Result(result) => {
            if args.json {
                println!("{}", to_json(result)?);
            } else {
                print!("{}", format_view(&render(result)));
            }
            Ok(ExitCode::SUCCESS)
        }
        UiState::Error(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => Err(anyhow!(
            "submission ended in unexpected state '{}'",
            other.name()
        )),
    }
}

fn to_json(result: &DiagnosisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to encode diagnosis")
}

fn format_view(view: &DiagnosisView) -> String {
    format!(
        "Ticket:           {}\nDiagnosis:        {}\nExecuted command: {}\nCommand output:\n{}\nSuggested fix:    {}\n",
        view.ticket, view.diagnosis, view.executed_command, view.command_output, view.suggested_fix
    )
}

#[cfg(test)]
mod tests {
    use shared::domain::TicketId;

    use super::*;

    #[test]
    fn formats_all_five_regions() {
        let view = render(&DiagnosisResult {
            diagnosis: Some("Printer queue stalled".into()),
            executed_command: Some("lpstat -p".into()),
            ..DiagnosisResult::default()
        });

        let text = format_view(&view);
        assert!(text.contains("Ticket:           #unassigned\n"));
        assert!(text.contains("Diagnosis:        Printer queue stalled\n"));
        assert!(text.contains("Executed command: lpstat -p\n"));
        assert!(text.contains("Command output:\nNo command output\n"));
        assert!(text.contains("Suggested fix:    No fix suggested\n"));
    }

    #[test]
    fn json_output_omits_absent_fields() {
        let json = to_json(&DiagnosisResult {
            ticket_id: Some(TicketId::from(42)),
            ..DiagnosisResult::default()
        })
        .expect("json");
        assert_eq!(json, "{\n  \"ticket_id\": 42\n}");
    }
}
