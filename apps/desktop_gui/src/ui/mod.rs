//! UI layer for the desktop GUI: app shell and screen rendering.

pub mod app;

pub use app::BloodConnectApp;
