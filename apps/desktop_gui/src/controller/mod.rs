//! Controller layer: backend events and command orchestration for the submission form.

pub mod events;
pub mod orchestration;
