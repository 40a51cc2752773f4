use super::*;

fn opened() -> EmergencyLifecycle {
    let mut lifecycle = EmergencyLifecycle::Idle;
    lifecycle
        .open(BloodType::BPositive)
        .expect("open from idle");
    lifecycle
}

#[test]
fn opening_prefills_the_demo_defaults() {
    let lifecycle = opened();
    let form = lifecycle.form().expect("form state");
    assert_eq!(form.blood_type, BloodType::BPositive);
    assert_eq!(form.units_needed, "2");
    assert_eq!(form.location, "City Hospital");
    assert_eq!(form.urgency, UrgencyLevel::Critical);
}

#[test]
fn submit_coerces_units_and_moves_to_processing() {
    let mut lifecycle = opened();
    let request = lifecycle
        .submit(EmergencyForm {
            units_needed: " 4 ".to_string(),
            ..EmergencyForm::prefilled(BloodType::BPositive)
        })
        .expect("valid submission");
    assert_eq!(request.units_needed, 4);
    assert_eq!(request.status, RequestStatus::Processing);
    assert_eq!(lifecycle.state_name(), "processing");
}

#[test]
fn non_numeric_or_out_of_bounds_units_are_rejected() {
    for units in ["", "abc", "0", "100", "-1", "2.5"] {
        let mut lifecycle = opened();
        let err = lifecycle
            .submit(EmergencyForm {
                units_needed: units.to_string(),
                ..EmergencyForm::prefilled(BloodType::BPositive)
            })
            .unwrap_err();
        assert!(err.is_validation(), "units {units:?}: got {err:?}");
        assert_eq!(lifecycle.state_name(), "form", "units {units:?}");
    }
}

#[test]
fn blank_location_is_rejected() {
    let mut lifecycle = opened();
    let err = lifecycle
        .submit(EmergencyForm {
            location: "  ".to_string(),
            ..EmergencyForm::prefilled(BloodType::BPositive)
        })
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(lifecycle.state_name(), "form");
}

#[test]
fn quick_request_broadcasts_the_prefilled_draft() {
    let mut lifecycle = opened();
    let request = lifecycle.submit_draft().expect("quick request");
    assert_eq!(request.units_needed, 2);
    assert_eq!(request.location, "City Hospital");
    assert_eq!(request.urgency, UrgencyLevel::Critical);
}

#[test]
fn broadcast_completion_reaches_success_with_static_summary() {
    let mut lifecycle = opened();
    lifecycle.submit_draft().expect("submit");
    let (request, summary) = lifecycle.complete_broadcast().expect("complete");
    assert_eq!(request.status, RequestStatus::Broadcast);
    assert_eq!(summary, BroadcastSummary::demo());
    assert_eq!(summary.donors_notified, 47);
    assert_eq!(lifecycle.state_name(), "success");
}

#[test]
fn processing_cannot_be_dismissed_or_resubmitted() {
    let mut lifecycle = opened();
    lifecycle.submit_draft().expect("submit");

    let err = lifecycle.dismiss().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "processing",
            command: "dismiss_emergency",
        }
    );

    let err = lifecycle.submit_draft().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "processing",
            command: "quick_emergency_request",
        }
    );
}

#[test]
fn form_and_success_can_be_dismissed_back_to_idle() {
    let mut lifecycle = opened();
    lifecycle.dismiss().expect("cancel from form");
    assert_eq!(lifecycle, EmergencyLifecycle::Idle);

    let mut lifecycle = opened();
    lifecycle.submit_draft().expect("submit");
    lifecycle.complete_broadcast().expect("complete");
    lifecycle.dismiss().expect("back from success");
    assert_eq!(lifecycle, EmergencyLifecycle::Idle);
}

#[test]
fn completing_an_idle_lifecycle_is_rejected() {
    let mut lifecycle = EmergencyLifecycle::Idle;
    let err = lifecycle.complete_broadcast().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "idle",
            command: "complete_broadcast",
        }
    );
}
