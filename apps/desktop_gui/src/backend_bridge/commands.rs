//! Backend commands queued from UI to backend worker.

use shared::protocol::SubmissionRequest;

pub enum BackendCommand {
    Diagnose { request: SubmissionRequest },
}
