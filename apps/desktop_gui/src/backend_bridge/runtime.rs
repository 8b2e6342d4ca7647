//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{DiagnosisExchange, ExchangeError, ExchangeOutcome};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    exchange: Arc<dyn DiagnosisExchange>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                send_event(
                    &ui_tx,
                    UiEvent::BackendUnavailable(format!("failed to build backend runtime: {err}")),
                );
                return;
            }
        };

        runtime.block_on(run_worker(cmd_rx, ui_tx, exchange));
    });
}

async fn run_worker(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    exchange: Arc<dyn DiagnosisExchange>,
) {
    send_event(&ui_tx, UiEvent::Info("Diagnosis backend ready".to_string()));

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::Diagnose { request } => {
                let reply = OutcomeReply::new(ui_tx.clone());
                let exchange = Arc::clone(&exchange);
                let task = tokio::spawn(async move {
                    let outcome = exchange.diagnose(&request).await;
                    reply.send(outcome);
                });
                if let Err(err) = task.await {
                    tracing::error!("diagnosis task aborted: {err}");
                }
            }
        }
    }

    tracing::info!("ui command queue closed; backend worker exiting");
}

fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.send(event).is_err() {
        tracing::debug!("ui event queue closed; dropping backend event");
    }
}

/// Reply slot for one submission. Exactly one outcome reaches the UI: the exchange result,
/// or `Interrupted` if the slot is dropped unused.
struct OutcomeReply {
    ui_tx: Sender<UiEvent>,
    delivered: bool,
}

impl OutcomeReply {
    fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self {
            ui_tx,
            delivered: false,
        }
    }

    fn send(mut self, outcome: ExchangeOutcome) {
        self.delivered = true;
        send_event(&self.ui_tx, UiEvent::DiagnosisFinished(outcome));
    }
}

impl Drop for OutcomeReply {
    fn drop(&mut self) {
        if !self.delivered {
            tracing::warn!("diagnosis task ended without an outcome");
            send_event(
                &self.ui_tx,
                UiEvent::DiagnosisFinished(Err(ExchangeError::Interrupted)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use crossbeam_channel::bounded;
    use shared::{
        domain::TicketId,
        protocol::{DiagnosisResult, SubmissionRequest},
    };

    use super::*;

    struct FixedExchange;

    #[async_trait]
    impl DiagnosisExchange for FixedExchange {
        async fn diagnose(&self, _request: &SubmissionRequest) -> ExchangeOutcome {
            Ok(DiagnosisResult {
                ticket_id: Some(TicketId::from(1042)),
                ..DiagnosisResult::default()
            })
        }
    }

    struct PanickingExchange;

    #[async_trait]
    impl DiagnosisExchange for PanickingExchange {
        async fn diagnose(&self, request: &SubmissionRequest) -> ExchangeOutcome {
            panic!("diagnosis engine crashed on '{}'", request.issue)
        }
    }

    fn diagnose_command() -> BackendCommand {
        BackendCommand::Diagnose {
            request: SubmissionRequest::new("alice", "VPN not connecting"),
        }
    }

    fn next_outcome(ui_rx: &Receiver<UiEvent>) -> ExchangeOutcome {
        loop {
            match ui_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(UiEvent::DiagnosisFinished(outcome)) => return outcome,
                Ok(UiEvent::Info(_) | UiEvent::BackendUnavailable(_)) => continue,
                Err(err) => panic!("no outcome delivered: {err}"),
            }
        }
    }

    #[test]
    fn unused_reply_reports_interruption() {
        let (ui_tx, ui_rx) = bounded(1);
        drop(OutcomeReply::new(ui_tx));

        assert!(matches!(
            ui_rx.try_recv(),
            Ok(UiEvent::DiagnosisFinished(Err(ExchangeError::Interrupted)))
        ));
    }

    #[test]
    fn sent_reply_delivers_once() {
        let (ui_tx, ui_rx) = bounded(2);
        OutcomeReply::new(ui_tx).send(Ok(DiagnosisResult::default()));

        assert!(matches!(
            ui_rx.try_recv(),
            Ok(UiEvent::DiagnosisFinished(Ok(_)))
        ));
        assert!(ui_rx.try_recv().is_err());
    }

    #[test]
    fn worker_forwards_exchange_outcome() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        launch(cmd_rx, ui_tx, Arc::new(FixedExchange));

        cmd_tx.send(diagnose_command()).expect("queue command");

        let result = next_outcome(&ui_rx).expect("diagnosis");
        assert_eq!(result.ticket_id, Some(TicketId::from(1042)));
    }

    #[test]
    fn panicking_exchange_still_settles_the_submission() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        launch(cmd_rx, ui_tx, Arc::new(PanickingExchange));

        cmd_tx.send(diagnose_command()).expect("queue command");
        assert!(matches!(
            next_outcome(&ui_rx),
            Err(ExchangeError::Interrupted)
        ));

        cmd_tx.send(diagnose_command()).expect("worker survives the panic");
        assert!(matches!(
            next_outcome(&ui_rx),
            Err(ExchangeError::Interrupted)
        ));
    }
}
