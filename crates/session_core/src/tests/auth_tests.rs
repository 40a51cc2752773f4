use super::*;
use shared::domain::ViewState;

fn valid_fields() -> Credentials {
    Credentials {
        name: "Alex Donor".to_string(),
        phone: "+1 555-0100".to_string(),
        blood_type: "O+".to_string(),
        location: "Midtown".to_string(),
    }
}

#[test]
fn role_can_be_reselected_before_submitting() {
    let mut auth = AuthState::Unauthenticated;
    auth.select_role(UserRole::Donor).expect("first selection");
    auth.select_role(UserRole::Recipient).expect("reselection");
    assert_eq!(auth.pending_role(), Some(UserRole::Recipient));
}

#[test]
fn submit_without_role_selection_is_rejected() {
    let mut auth = AuthState::Unauthenticated;
    let err = auth.submit_credentials(&valid_fields()).unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "unauthenticated",
            command: "submit_credentials",
        }
    );
    assert_eq!(auth, AuthState::Unauthenticated);
}

#[test]
fn every_missing_field_fails_validation_and_keeps_state() {
    let blank_variants = [
        Credentials {
            name: "  ".to_string(),
            ..valid_fields()
        },
        Credentials {
            phone: String::new(),
            ..valid_fields()
        },
        Credentials {
            blood_type: String::new(),
            ..valid_fields()
        },
        Credentials {
            location: "\t".to_string(),
            ..valid_fields()
        },
    ];

    for fields in blank_variants {
        let mut auth = AuthState::RoleSelected(UserRole::Donor);
        let err = auth.submit_credentials(&fields).unwrap_err();
        assert!(err.is_validation(), "expected validation error, got {err:?}");
        assert_eq!(auth, AuthState::RoleSelected(UserRole::Donor));
        assert!(auth.profile().is_none());
    }
}

#[test]
fn unrecognized_blood_type_fails_validation() {
    let mut auth = AuthState::RoleSelected(UserRole::Recipient);
    let err = auth
        .submit_credentials(&Credentials {
            blood_type: "Q+".to_string(),
            ..valid_fields()
        })
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(auth.pending_role(), Some(UserRole::Recipient));
}

#[test]
fn successful_submit_builds_trimmed_profile() {
    let mut auth = AuthState::RoleSelected(UserRole::Donor);
    let profile = auth
        .submit_credentials(&Credentials {
            name: "  Alex Donor ".to_string(),
            blood_type: " o+ ".to_string(),
            ..valid_fields()
        })
        .expect("valid sign-in");
    assert_eq!(profile.name, "Alex Donor");
    assert_eq!(profile.blood_type, BloodType::OPositive);
    assert_eq!(profile.role, UserRole::Donor);
    assert_eq!(profile.role.dashboard(), ViewState::DonorDashboard);
    assert_eq!(auth.profile(), Some(&profile));
}

#[test]
fn role_selection_after_sign_in_is_rejected() {
    let mut auth = AuthState::RoleSelected(UserRole::Donor);
    auth.submit_credentials(&valid_fields()).expect("sign in");
    let err = auth.select_role(UserRole::Recipient).unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "authenticated",
            command: "select_role",
        }
    );
}

#[test]
fn quick_sign_in_presets_match_the_demo_accounts() {
    let donor = Credentials::quick_sign_in(UserRole::Donor);
    assert_eq!(donor.name, "Alex Donor");
    assert_eq!(donor.blood_type, "O+");

    let recipient = Credentials::quick_sign_in(UserRole::Recipient);
    assert_eq!(recipient.name, "Sarah Recipient");
    assert_eq!(recipient.blood_type, "B+");
}
