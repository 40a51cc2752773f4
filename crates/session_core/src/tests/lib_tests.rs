use super::*;
use shared::domain::{BloodType, RequestStatus, UrgencyLevel};
use tokio::time::{advance, timeout, Duration};

fn recipient_form() -> EmergencyForm {
    EmergencyForm {
        blood_type: BloodType::BPositive,
        units_needed: "2".to_string(),
        location: "City Hospital".to_string(),
        urgency: UrgencyLevel::Critical,
        notes: "Patient in surgery".to_string(),
    }
}

#[tokio::test]
async fn invalid_credentials_leave_the_view_unchanged() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::SelectRole(UserRole::Donor))
        .expect("role selection");

    let err = session
        .dispatch(SessionCommand::SubmitCredentials(Credentials {
            name: String::new(),
            phone: "+1 555-0100".to_string(),
            blood_type: "O+".to_string(),
            location: "Midtown".to_string(),
        }))
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(session.active_view(), ViewState::Auth);
    assert!(session.profile().is_none());
    assert_eq!(session.pending_role(), Some(UserRole::Donor));
}

#[tokio::test]
async fn sign_in_routes_to_the_dashboard_matching_the_role() {
    for (role, dashboard) in [
        (UserRole::Donor, ViewState::DonorDashboard),
        (UserRole::Recipient, ViewState::RecipientDashboard),
    ] {
        let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
        session
            .dispatch(SessionCommand::QuickSignIn(role))
            .expect("quick sign-in");
        assert_eq!(session.active_view(), dashboard);
        assert_eq!(session.profile().map(|profile| profile.role), Some(role));
    }
}

#[tokio::test]
async fn map_round_trip_returns_to_the_invoking_dashboard() {
    for (role, dashboard) in [
        (UserRole::Donor, ViewState::DonorDashboard),
        (UserRole::Recipient, ViewState::RecipientDashboard),
    ] {
        let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
        session
            .dispatch(SessionCommand::QuickSignIn(role))
            .expect("sign in");
        session
            .dispatch(SessionCommand::NavigateToMap)
            .expect("enter map");
        // A second entry while already on the map must not disturb the
        // recorded return target.
        session
            .dispatch(SessionCommand::NavigateToMap)
            .expect("repeat entry");
        session
            .dispatch(SessionCommand::NavigateBack)
            .expect("leave map");
        assert_eq!(session.active_view(), dashboard);
    }
}

#[tokio::test]
async fn back_navigation_outside_the_map_is_defended() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Donor))
        .expect("sign in");
    let err = session.dispatch(SessionCommand::NavigateBack).unwrap_err();
    assert_eq!(err, SessionError::NoReturnTarget);
    assert_eq!(session.active_view(), ViewState::DonorDashboard);
}

#[tokio::test(start_paused = true)]
async fn emergency_lifecycle_reaches_success_through_processing() {
    let (mut session, mut command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Recipient))
        .expect("sign in");
    session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .expect("open form");
    session
        .dispatch(SessionCommand::SubmitEmergencyForm(recipient_form()))
        .expect("submit");

    assert_eq!(session.active_view(), ViewState::EmergencyProcessing);
    assert_eq!(
        session.emergency().request().map(|request| request.status),
        Some(RequestStatus::Processing)
    );

    advance(DEFAULT_BROADCAST_DELAY).await;
    let queued = command_rx.recv().await.expect("broadcast completion queued");
    assert!(matches!(queued, SessionCommand::CompleteBroadcast));
    session.dispatch(queued).expect("complete broadcast");

    assert_eq!(session.active_view(), ViewState::EmergencySuccess);
    let request = session.emergency().request().expect("request retained");
    assert_eq!(request.status, RequestStatus::Broadcast);
    assert_eq!(request.blood_type, BloodType::BPositive);
}

#[tokio::test(start_paused = true)]
async fn broadcast_timer_honors_the_configured_delay() {
    let config = SessionConfig {
        broadcast_delay: Duration::from_millis(250),
    };
    let (mut session, mut command_rx) = CoordinationSession::new(config);
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Recipient))
        .expect("sign in");
    session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .expect("open form");
    session
        .dispatch(SessionCommand::QuickEmergencyRequest)
        .expect("quick request");

    advance(Duration::from_millis(249)).await;
    assert!(command_rx.try_recv().is_err(), "timer fired early");

    advance(Duration::from_millis(1)).await;
    let queued = timeout(Duration::from_secs(1), command_rx.recv())
        .await
        .expect("timer fired")
        .expect("queue open");
    assert!(matches!(queued, SessionCommand::CompleteBroadcast));
}

#[tokio::test]
async fn emergency_entry_points_are_gated_to_the_recipient_dashboard() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Donor))
        .expect("sign in");
    let err = session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "donor_dashboard",
            command: "open_emergency_form",
        }
    );
}

#[tokio::test]
async fn dismissing_the_form_returns_to_the_recipient_dashboard() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Recipient))
        .expect("sign in");
    session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .expect("open form");
    session
        .dispatch(SessionCommand::DismissEmergency)
        .expect("cancel");
    assert_eq!(session.active_view(), ViewState::RecipientDashboard);
    assert_eq!(session.emergency(), &EmergencyLifecycle::Idle);
}

#[tokio::test]
async fn sign_out_reinitializes_the_whole_session() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Recipient))
        .expect("sign in");
    session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .expect("open form");
    session.dispatch(SessionCommand::SignOut).expect("sign out");

    assert_eq!(session.active_view(), ViewState::Auth);
    assert!(session.profile().is_none());
    assert_eq!(session.pending_role(), None);
    assert_eq!(session.emergency(), &EmergencyLifecycle::Idle);
}

#[tokio::test]
async fn dashboard_acknowledgments_emit_the_demo_copy() {
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    let mut events = session.subscribe_events();
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Donor))
        .expect("sign in");
    let first_request = session.feeds().nearby_requests[0].id;
    session
        .dispatch(SessionCommand::RespondToRequest(first_request))
        .expect("respond");

    let mut saw_ack = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::ResponseAcknowledged(message) = event {
            assert_eq!(message, RESPOND_ACK_MESSAGE);
            saw_ack = true;
        }
    }
    assert!(saw_ack);
}

#[tokio::test(start_paused = true)]
async fn scenario_donor_badge_and_recipient_emergency_flow() {
    // "Alex Donor" / O+ shows the O+ Donor badge.
    let (mut session, _command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Donor))
        .expect("donor sign-in");
    let profile = session.profile().expect("profile").clone();
    assert_eq!(profile.name, "Alex Donor");
    assert_eq!(
        format!("{} {}", profile.blood_type, profile.role.badge_noun()),
        "O+ Donor"
    );

    // "Sarah Recipient" / B+ submits the emergency form and reaches Success
    // with her blood type displayed.
    let (mut session, mut command_rx) = CoordinationSession::new(SessionConfig::default());
    session
        .dispatch(SessionCommand::QuickSignIn(UserRole::Recipient))
        .expect("recipient sign-in");
    let blood_type = session.profile().expect("profile").blood_type;
    assert_eq!(blood_type, BloodType::BPositive);

    session
        .dispatch(SessionCommand::OpenEmergencyForm)
        .expect("open form");
    session
        .dispatch(SessionCommand::SubmitEmergencyForm(EmergencyForm {
            units_needed: "2".to_string(),
            location: "City Hospital".to_string(),
            urgency: UrgencyLevel::Critical,
            ..EmergencyForm::prefilled(blood_type)
        }))
        .expect("submit");
    assert_eq!(session.active_view(), ViewState::EmergencyProcessing);

    advance(DEFAULT_BROADCAST_DELAY).await;
    let queued = command_rx.recv().await.expect("completion queued");
    session.dispatch(queued).expect("complete");

    assert_eq!(session.active_view(), ViewState::EmergencySuccess);
    let request = session.emergency().request().expect("request");
    assert_eq!(request.blood_type, BloodType::BPositive);
    assert_eq!(request.units_needed, 2);
    assert_eq!(request.location, "City Hospital");
}

#[tokio::test(start_paused = true)]
async fn session_handle_drives_the_full_flow_over_events() {
    let handle = SessionHandle::spawn(SessionConfig::default());
    let mut events = handle.subscribe_events();

    assert!(handle.send(SessionCommand::QuickSignIn(UserRole::Recipient)));
    assert!(handle.send(SessionCommand::OpenEmergencyForm));
    assert!(handle.send(SessionCommand::QuickEmergencyRequest));

    let mut reached_success = false;
    for _ in 0..16 {
        let event = timeout(Duration::from_secs(10), events.recv())
            .await
            .expect("event within virtual time")
            .expect("event channel open");
        if let SessionEvent::BroadcastCompleted { request, summary } = event {
            assert_eq!(request.status, RequestStatus::Broadcast);
            assert_eq!(summary.donors_notified, 47);
            reached_success = true;
            break;
        }
    }
    assert!(reached_success, "broadcast completion never arrived");

    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn session_handle_reports_rejections_as_events() {
    let handle = SessionHandle::spawn(SessionConfig::default());
    let mut events = handle.subscribe_events();

    assert!(handle.send(SessionCommand::NavigateBack));

    let event = timeout(Duration::from_secs(10), events.recv())
        .await
        .expect("event within virtual time")
        .expect("event channel open");
    match event {
        SessionEvent::Rejected(err) => assert_eq!(err, SessionError::NoReturnTarget),
        other => panic!("expected rejection, got {other:?}"),
    }

    handle.shutdown();
}
