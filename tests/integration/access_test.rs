//! Integration tests for the authorization gate driven by real sessions.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use resq_auth::MemoryAuthProvider;
use resq_auth::gate::{AccessDecision, Route, SessionState};
use resq_core::error::ErrorKind;
use resq_core::traits::AuthProvider;
use resq_entity::user::UserRole;

use helpers::{PASSWORD, TestApp, email_for};

#[tokio::test]
async fn test_signed_out_client() {
    let t = TestApp::new();
    let session = t.session();

    assert_eq!(session.access(Route::Login), AccessDecision::Allow);
    assert_eq!(session.access(Route::Home), AccessDecision::Allow);
    assert_eq!(
        session.access(Route::CitizenDashboard),
        AccessDecision::RedirectToLogin
    );
    assert_eq!(session.access_path("/nowhere"), AccessDecision::NotFound);
    assert_eq!(session.home_route(), Route::Login);
}

#[tokio::test]
async fn test_each_role_reaches_only_its_routes() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;
    let vera = t.volunteer("Vera").await;
    let ada = t.admin("Ada").await;

    assert_eq!(carla.session.access(Route::RequestHelp), AccessDecision::Allow);
    assert_eq!(
        carla.session.access(Route::VolunteerTasks),
        AccessDecision::RedirectToHome
    );
    assert_eq!(carla.session.home_route(), Route::CitizenDashboard);

    assert_eq!(vera.session.access_path("/volunteer/tasks"), AccessDecision::Allow);
    assert_eq!(
        vera.session.access_path("/admin"),
        AccessDecision::RedirectToHome
    );
    assert_eq!(vera.session.home_route(), Route::VolunteerDashboard);

    assert_eq!(ada.session.access(Route::AdminDashboard), AccessDecision::Allow);
    assert_eq!(
        ada.session.access(Route::CitizenDashboard),
        AccessDecision::RedirectToHome
    );
}

#[tokio::test]
async fn test_pending_while_profile_resolves() {
    let t = TestApp::new();
    t.volunteer("Vera").await.session.sign_out().await.unwrap();

    t.store.set_latency(Duration::from_millis(300));
    let session = Arc::new(t.session());
    let mut states = session.watch();

    let signing_in = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.sign_in(&email_for("Vera"), PASSWORD).await })
    };

    states
        .wait_for(|s| matches!(s, SessionState::Resolving(_)))
        .await
        .unwrap();
    assert_eq!(
        session.access(Route::VolunteerDashboard),
        AccessDecision::Pending
    );
    let err = session.actor().unwrap_err();
    assert!(err.is(ErrorKind::Authentication));

    let principal = signing_in.await.unwrap().unwrap();
    assert_eq!(principal.role, UserRole::Volunteer);
    assert_eq!(
        session.access(Route::VolunteerDashboard),
        AccessDecision::Allow
    );
}

#[tokio::test]
async fn test_account_without_profile_is_signed_out() {
    let t = TestApp::new();
    let orphan = MemoryAuthProvider::new(Arc::clone(&t.registry));
    orphan.sign_up("ghost@resq.test", PASSWORD).await.unwrap();

    let session = t.session();
    let err = session
        .sign_in("ghost@resq.test", PASSWORD)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authentication));
    assert_eq!(session.state(), SessionState::SignedOut);
    assert_eq!(
        session.access(Route::CitizenDashboard),
        AccessDecision::RedirectToLogin
    );
}

#[tokio::test]
async fn test_wrong_password_and_sign_out() {
    let t = TestApp::new();
    let carla = t.citizen("Carla").await;

    let other = t.session();
    let err = other
        .sign_in(&email_for("Carla"), "not-the-password")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Authentication));
    assert_eq!(other.state(), SessionState::SignedOut);

    carla.session.sign_out().await.unwrap();
    assert_eq!(
        carla.session.access(Route::CitizenDashboard),
        AccessDecision::RedirectToLogin
    );
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let t = TestApp::new();
    t.citizen("Carla").await;

    let err = t
        .session()
        .register(helpers::registration("Carla", UserRole::Volunteer))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}
