//! Illustrative dashboard and map data. Everything here mirrors the demo's
//! hard-coded tables; nothing is fetched or computed.

use shared::domain::{
    BloodBank, BloodType, DonorAchievement, DonorAvailability, DonorNotification, DonorResponse,
    DonorResponseId, DonorStats, MapDonorPin, MapPinId, NearbyRequest, NearbyRequestId,
    NotificationAge, NotificationId, StockLevel, UrgencyLevel,
};

/// Probability that one cosmetic tick bumps the notification badge.
pub const NOTIFICATION_BUMP_PROBABILITY: f64 = 0.1;
/// Probability that one cosmetic tick ages a given "min ago" label.
pub const AGE_BUMP_PROBABILITY: f64 = 0.3;

/// Summary card for the recipient's active request; the blood type comes
/// from the signed-in profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRequestSummary {
    pub location: String,
    pub minutes_ago: u32,
    pub responses: u32,
    pub urgency: UrgencyLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFeeds {
    pub notification_count: u32,
    pub notifications: Vec<DonorNotification>,
    pub nearby_requests: Vec<NearbyRequest>,
    pub donor_responses: Vec<DonorResponse>,
    pub achievements: Vec<DonorAchievement>,
    pub donor_stats: DonorStats,
    pub active_request: ActiveRequestSummary,
    pub map_donors: Vec<MapDonorPin>,
    pub blood_banks: Vec<BloodBank>,
    pub map_emergencies: Vec<NearbyRequest>,
}

impl Default for DashboardFeeds {
    fn default() -> Self {
        Self::demo()
    }
}

impl DashboardFeeds {
    pub fn demo() -> Self {
        Self {
            notification_count: 3,
            notifications: vec![
                DonorNotification {
                    id: NotificationId(1),
                    message: "Urgent: B+ needed at City Hospital".to_string(),
                    age: NotificationAge::Minutes(2),
                    urgent: true,
                },
                DonorNotification {
                    id: NotificationId(2),
                    message: "Thank you for your last donation!".to_string(),
                    age: NotificationAge::Days(1),
                    urgent: false,
                },
                DonorNotification {
                    id: NotificationId(3),
                    message: "You're eligible to donate again in 7 days".to_string(),
                    age: NotificationAge::Days(2),
                    urgent: false,
                },
            ],
            nearby_requests: vec![
                NearbyRequest {
                    id: NearbyRequestId(1),
                    blood_type: BloodType::OPositive,
                    location: "City Hospital".to_string(),
                    distance_km: 0.8,
                    urgency: UrgencyLevel::Critical,
                    minutes_ago: 5,
                },
                NearbyRequest {
                    id: NearbyRequestId(2),
                    blood_type: BloodType::OPositive,
                    location: "General Hospital".to_string(),
                    distance_km: 1.2,
                    urgency: UrgencyLevel::Urgent,
                    minutes_ago: 12,
                },
                NearbyRequest {
                    id: NearbyRequestId(3),
                    blood_type: BloodType::APositive,
                    location: "Medical Center".to_string(),
                    distance_km: 2.1,
                    urgency: UrgencyLevel::Moderate,
                    minutes_ago: 25,
                },
            ],
            donor_responses: vec![
                DonorResponse {
                    id: DonorResponseId(1),
                    name: "Alex Johnson".to_string(),
                    blood_type: BloodType::BPositive,
                    distance_km: 0.8,
                    eta_minutes: 15,
                    verified: true,
                },
                DonorResponse {
                    id: DonorResponseId(2),
                    name: "Maria Garcia".to_string(),
                    blood_type: BloodType::BPositive,
                    distance_km: 1.2,
                    eta_minutes: 20,
                    verified: true,
                },
                DonorResponse {
                    id: DonorResponseId(3),
                    name: "David Chen".to_string(),
                    blood_type: BloodType::BPositive,
                    distance_km: 2.1,
                    eta_minutes: 25,
                    verified: false,
                },
            ],
            achievements: vec![
                DonorAchievement {
                    name: "Life Saver".to_string(),
                    description: "5 successful donations".to_string(),
                    earned: true,
                },
                DonorAchievement {
                    name: "Hero".to_string(),
                    description: "10 successful donations".to_string(),
                    earned: true,
                },
                DonorAchievement {
                    name: "Legend".to_string(),
                    description: "25 successful donations".to_string(),
                    earned: false,
                },
                DonorAchievement {
                    name: "Guardian Angel".to_string(),
                    description: "Emergency response".to_string(),
                    earned: true,
                },
            ],
            donor_stats: DonorStats {
                total_donations: 12,
                badges_earned: 4,
                days_until_eligible: 7,
                lives_saved: 36,
            },
            active_request: ActiveRequestSummary {
                location: "City Hospital".to_string(),
                minutes_ago: 12,
                responses: 3,
                urgency: UrgencyLevel::Critical,
            },
            map_donors: vec![
                MapDonorPin {
                    id: MapPinId(1),
                    name: "Alex Johnson".to_string(),
                    blood_type: BloodType::OPositive,
                    distance_km: 0.8,
                    availability: DonorAvailability::Available,
                },
                MapDonorPin {
                    id: MapPinId(2),
                    name: "Maria Garcia".to_string(),
                    blood_type: BloodType::BPositive,
                    distance_km: 1.2,
                    availability: DonorAvailability::Available,
                },
                MapDonorPin {
                    id: MapPinId(3),
                    name: "David Chen".to_string(),
                    blood_type: BloodType::APositive,
                    distance_km: 2.1,
                    availability: DonorAvailability::Busy,
                },
                MapDonorPin {
                    id: MapPinId(4),
                    name: "Sarah Wilson".to_string(),
                    blood_type: BloodType::ONegative,
                    distance_km: 1.8,
                    availability: DonorAvailability::Available,
                },
            ],
            blood_banks: vec![
                BloodBank {
                    name: "City Blood Bank".to_string(),
                    address: "123 Medical Center Dr".to_string(),
                    stock: StockLevel::High,
                    distance_km: 1.5,
                },
                BloodBank {
                    name: "General Hospital Blood Bank".to_string(),
                    address: "456 Health Ave".to_string(),
                    stock: StockLevel::Medium,
                    distance_km: 2.3,
                },
                BloodBank {
                    name: "Emergency Blood Services".to_string(),
                    address: "789 Emergency Blvd".to_string(),
                    stock: StockLevel::Low,
                    distance_km: 3.1,
                },
            ],
            map_emergencies: vec![
                NearbyRequest {
                    id: NearbyRequestId(1),
                    blood_type: BloodType::BPositive,
                    location: "City Hospital".to_string(),
                    distance_km: 0.0,
                    urgency: UrgencyLevel::Critical,
                    minutes_ago: 5,
                },
                NearbyRequest {
                    id: NearbyRequestId(2),
                    blood_type: BloodType::ONegative,
                    location: "General Hospital".to_string(),
                    distance_km: 0.0,
                    urgency: UrgencyLevel::Urgent,
                    minutes_ago: 12,
                },
            ],
        }
    }

    pub fn nearby_request(&self, id: NearbyRequestId) -> Option<&NearbyRequest> {
        self.nearby_requests.iter().find(|request| request.id == id)
    }

    pub fn donor_response(&self, id: DonorResponseId) -> Option<&DonorResponse> {
        self.donor_responses.iter().find(|donor| donor.id == id)
    }

    /// Cosmetic jitter on the notification badge. `sample` is a uniform
    /// [0, 1) draw supplied by the caller; returns whether the count moved.
    pub fn bump_notification_count(&mut self, sample: f64) -> bool {
        if sample < NOTIFICATION_BUMP_PROBABILITY {
            self.notification_count += 1;
            return true;
        }
        false
    }

    /// Cosmetic jitter on the "min ago" labels, one draw per label.
    pub fn age_time_labels(&mut self, mut sample: impl FnMut() -> f64) {
        for request in &mut self.nearby_requests {
            if sample() < AGE_BUMP_PROBABILITY {
                request.minutes_ago += 1;
            }
        }
        for notification in &mut self.notifications {
            if let NotificationAge::Minutes(minutes) = &mut notification.age {
                if sample() < AGE_BUMP_PROBABILITY {
                    *minutes += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
