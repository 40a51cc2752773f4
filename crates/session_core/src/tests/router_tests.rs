use super::*;

#[test]
fn unauthenticated_sessions_always_resolve_to_auth() {
    let mut router = ViewRouter::new();
    router.set_active(ViewState::DonorDashboard);
    assert_eq!(router.resolve(false), ViewState::Auth);
    assert_eq!(router.resolve(true), ViewState::DonorDashboard);
}

#[test]
fn map_records_the_invoking_dashboard_as_return_target() {
    for dashboard in [ViewState::DonorDashboard, ViewState::RecipientDashboard] {
        let mut router = ViewRouter::new();
        router.set_active(dashboard);
        assert_eq!(router.navigate_to_map().expect("enter map"), ViewState::Map);
        assert_eq!(router.return_target(), Some(dashboard));
        assert_eq!(router.navigate_back().expect("leave map"), dashboard);
        assert_eq!(router.active(), dashboard);
        assert_eq!(router.return_target(), None);
    }
}

#[test]
fn entering_map_twice_keeps_the_original_return_target() {
    let mut router = ViewRouter::new();
    router.set_active(ViewState::RecipientDashboard);
    router.navigate_to_map().expect("first entry");
    router.navigate_to_map().expect("second entry is a no-op");
    assert_eq!(router.return_target(), Some(ViewState::RecipientDashboard));
    assert_eq!(
        router.navigate_back().expect("back"),
        ViewState::RecipientDashboard
    );
}

#[test]
fn back_outside_the_map_reports_no_return_target() {
    let mut router = ViewRouter::new();
    router.set_active(ViewState::DonorDashboard);
    assert_eq!(router.navigate_back().unwrap_err(), SessionError::NoReturnTarget);
    assert_eq!(router.active(), ViewState::DonorDashboard);
}

#[test]
fn map_is_not_reachable_from_non_dashboard_views() {
    let mut router = ViewRouter::new();
    let err = router.navigate_to_map().unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            state: "auth",
            command: "navigate_to_map",
        }
    );
}
