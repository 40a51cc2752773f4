use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(NearbyRequestId);
id_newtype!(DonorResponseId);
id_newtype!(NotificationId);
id_newtype!(MapPinId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|blood_type| blood_type.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Donor,
    Recipient,
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Donor => "Donor",
            UserRole::Recipient => "Recipient",
        }
    }

    /// Noun used on the dashboard blood-type badge ("O+ Donor" / "B+ Patient").
    pub fn badge_noun(self) -> &'static str {
        match self {
            UserRole::Donor => "Donor",
            UserRole::Recipient => "Patient",
        }
    }

    pub fn dashboard(self) -> ViewState {
        match self {
            UserRole::Donor => ViewState::DonorDashboard,
            UserRole::Recipient => ViewState::RecipientDashboard,
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "donor" => Some(UserRole::Donor),
            "recipient" => Some(UserRole::Recipient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical,
    Urgent,
    Moderate,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 3] = [
        UrgencyLevel::Critical,
        UrgencyLevel::Urgent,
        UrgencyLevel::Moderate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "Critical",
            UrgencyLevel::Urgent => "Urgent",
            UrgencyLevel::Moderate => "Moderate",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Processing,
    Broadcast,
}

/// The single active screen. Exactly one is active at a time; transitions
/// through the session core are the only way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Auth,
    DonorDashboard,
    RecipientDashboard,
    Map,
    EmergencyForm,
    EmergencyProcessing,
    EmergencySuccess,
}

impl ViewState {
    pub fn is_dashboard(self) -> bool {
        matches!(
            self,
            ViewState::DonorDashboard | ViewState::RecipientDashboard
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role: UserRole,
    pub blood_type: BloodType,
    pub phone: String,
    pub location: String,
}

impl UserProfile {
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub blood_type: BloodType,
    pub units_needed: u32,
    pub location: String,
    pub urgency: UrgencyLevel,
    pub notes: String,
    pub status: RequestStatus,
}

/// Illustrative broadcast outcome shown on the success screen. The counts are
/// static display data, not the result of any real dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastSummary {
    pub donors_notified: u32,
    pub responses_received: u32,
    pub blood_banks_contacted: u32,
    pub estimated_response_minutes: (u32, u32),
}

impl BroadcastSummary {
    pub fn demo() -> Self {
        Self {
            donors_notified: 47,
            responses_received: 5,
            blood_banks_contacted: 3,
            estimated_response_minutes: (15, 25),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyRequest {
    pub id: NearbyRequestId,
    pub blood_type: BloodType,
    pub location: String,
    pub distance_km: f32,
    pub urgency: UrgencyLevel,
    pub minutes_ago: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorResponse {
    pub id: DonorResponseId,
    pub name: String,
    pub blood_type: BloodType,
    pub distance_km: f32,
    pub eta_minutes: u32,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorNotification {
    pub id: NotificationId,
    pub message: String,
    pub age: NotificationAge,
    pub urgent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAge {
    Minutes(u32),
    Days(u32),
}

impl fmt::Display for NotificationAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationAge::Minutes(n) => write!(f, "{n} min ago"),
            NotificationAge::Days(1) => write!(f, "1 day ago"),
            NotificationAge::Days(n) => write!(f, "{n} days ago"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorAchievement {
    pub name: String,
    pub description: String,
    pub earned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorStats {
    pub total_donations: u32,
    pub badges_earned: u32,
    pub days_until_eligible: u32,
    pub lives_saved: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonorAvailability {
    Available,
    Busy,
}

impl DonorAvailability {
    pub fn label(self) -> &'static str {
        match self {
            DonorAvailability::Available => "Available",
            DonorAvailability::Busy => "Busy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    High,
    Medium,
    Low,
}

impl StockLevel {
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::High => "High",
            StockLevel::Medium => "Medium",
            StockLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDonorPin {
    pub id: MapPinId,
    pub name: String,
    pub blood_type: BloodType,
    pub distance_km: f32,
    pub availability: DonorAvailability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodBank {
    pub name: String,
    pub address: String,
    pub stock: StockLevel,
    pub distance_km: f32,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
