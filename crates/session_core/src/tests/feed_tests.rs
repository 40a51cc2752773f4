use super::*;

#[test]
fn demo_tables_match_the_mock_dataset() {
    let feeds = DashboardFeeds::demo();
    assert_eq!(feeds.notification_count, 3);
    assert_eq!(feeds.nearby_requests.len(), 3);
    assert_eq!(feeds.donor_responses.len(), 3);
    assert_eq!(feeds.achievements.len(), 4);
    assert_eq!(feeds.map_donors.len(), 4);
    assert_eq!(feeds.blood_banks.len(), 3);
    assert_eq!(feeds.donor_stats.total_donations, 12);
    assert!(feeds
        .donor_responses
        .iter()
        .all(|donor| donor.blood_type == BloodType::BPositive));
}

#[test]
fn feed_lookups_resolve_known_ids_only() {
    let feeds = DashboardFeeds::demo();
    assert!(feeds.nearby_request(NearbyRequestId(1)).is_some());
    assert!(feeds.nearby_request(NearbyRequestId(99)).is_none());
    assert!(feeds.donor_response(DonorResponseId(3)).is_some());
    assert!(feeds.donor_response(DonorResponseId(0)).is_none());
}

#[test]
fn notification_bump_respects_the_probability_threshold() {
    let mut feeds = DashboardFeeds::demo();
    assert!(!feeds.bump_notification_count(NOTIFICATION_BUMP_PROBABILITY));
    assert_eq!(feeds.notification_count, 3);
    assert!(feeds.bump_notification_count(NOTIFICATION_BUMP_PROBABILITY / 2.0));
    assert_eq!(feeds.notification_count, 4);
}

#[test]
fn aging_touches_minute_labels_but_never_day_labels() {
    let mut feeds = DashboardFeeds::demo();
    let before: Vec<u32> = feeds
        .nearby_requests
        .iter()
        .map(|request| request.minutes_ago)
        .collect();

    feeds.age_time_labels(|| 0.0);

    for (request, was) in feeds.nearby_requests.iter().zip(before) {
        assert_eq!(request.minutes_ago, was + 1);
    }
    assert_eq!(feeds.notifications[0].age, NotificationAge::Minutes(3));
    assert_eq!(feeds.notifications[1].age, NotificationAge::Days(1));
    assert_eq!(feeds.notifications[2].age, NotificationAge::Days(2));

    let snapshot = feeds.clone();
    feeds.age_time_labels(|| 1.0);
    assert_eq!(feeds, snapshot);
}
