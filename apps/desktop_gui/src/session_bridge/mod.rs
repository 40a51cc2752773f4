//! Runtime bridge between the UI command queue and the session worker.

pub mod runtime;
