//! Controller layer: session event handling helpers and command orchestration.

pub mod events;
pub mod orchestration;
