use super::*;

#[test]
fn parses_all_clinical_blood_type_labels() {
    for blood_type in BloodType::ALL {
        assert_eq!(BloodType::parse(blood_type.label()), Some(blood_type));
    }
    assert_eq!(BloodType::parse(" ab+ "), Some(BloodType::AbPositive));
    assert_eq!(BloodType::parse("C+"), None);
    assert_eq!(BloodType::parse(""), None);
}

#[test]
fn role_determines_dashboard_and_badge_noun() {
    assert_eq!(UserRole::Donor.dashboard(), ViewState::DonorDashboard);
    assert_eq!(
        UserRole::Recipient.dashboard(),
        ViewState::RecipientDashboard
    );
    assert_eq!(UserRole::Donor.badge_noun(), "Donor");
    assert_eq!(UserRole::Recipient.badge_noun(), "Patient");
}

#[test]
fn profile_initials_use_word_starts_uppercased() {
    let profile = UserProfile {
        name: "alex   donor".to_string(),
        role: UserRole::Donor,
        blood_type: BloodType::OPositive,
        phone: "+1234567890".to_string(),
        location: "Downtown".to_string(),
    };
    assert_eq!(profile.initials(), "AD");
}

#[test]
fn notification_age_renders_like_the_feed_labels() {
    assert_eq!(NotificationAge::Minutes(2).to_string(), "2 min ago");
    assert_eq!(NotificationAge::Days(1).to_string(), "1 day ago");
    assert_eq!(NotificationAge::Days(2).to_string(), "2 days ago");
}
