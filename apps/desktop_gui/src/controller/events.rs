//! Session event interpretation for the desktop GUI: banners and urgency
//! styling.

use shared::{
    domain::{StockLevel, UrgencyLevel},
    error::SessionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusBanner {
    pub severity: StatusBannerSeverity,
    pub message: String,
}

impl StatusBanner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: StatusBannerSeverity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: StatusBannerSeverity::Error,
            message: message.into(),
        }
    }
}

/// Validation rejections become blocking banners; the defensive errors are
/// unreachable through the rendered controls, so they only reach the status
/// line.
pub fn banner_for_rejection(err: &SessionError) -> Option<StatusBanner> {
    match err {
        SessionError::Validation { .. } => Some(StatusBanner::error(format!(
            "Please fill in all required fields ({err})."
        ))),
        SessionError::NoReturnTarget | SessionError::InvalidTransition { .. } => None,
    }
}

pub fn urgency_color(urgency: UrgencyLevel) -> egui::Color32 {
    match urgency {
        UrgencyLevel::Critical => egui::Color32::from_rgb(0xdc, 0x26, 0x26),
        UrgencyLevel::Urgent => egui::Color32::from_rgb(0xea, 0x58, 0x0c),
        UrgencyLevel::Moderate => egui::Color32::from_rgb(0xca, 0x8a, 0x04),
    }
}

pub fn stock_color(stock: StockLevel) -> egui::Color32 {
    match stock {
        StockLevel::High => egui::Color32::from_rgb(0x16, 0xa3, 0x4a),
        StockLevel::Medium => egui::Color32::from_rgb(0xea, 0x58, 0x0c),
        StockLevel::Low => egui::Color32::from_rgb(0xdc, 0x26, 0x26),
    }
}
