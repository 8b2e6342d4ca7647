//! UI layer for the helpdesk desktop client.

pub mod app;

pub use app::HelpdeskApp;
