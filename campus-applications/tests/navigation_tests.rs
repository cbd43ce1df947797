//! Login, signup and logout flows against a mock backend

mod helpers;

use campus_applications::session::{access_cookie_name, refresh_cookie_name, ROLE_KEY};
use campus_applications::{AuthAction, SignupForm, StorageBackends};
use campus_core::{CampusError, Role, Theme};
use chrono::{Duration, Utc};
use helpers::{spawn_backend, Calls, ACCESS_TOKEN, BROKEN_REFRESH_TOKEN, REFRESH_TOKEN};

fn within_minutes(actual: chrono::DateTime<Utc>, expected: chrono::DateTime<Utc>) -> bool {
    (actual - expected).num_minutes().abs() <= 1
}

#[tokio::test]
async fn faculty_login_exchanges_refresh_for_access() {
    let backend = spawn_backend().await;
    let backends = StorageBackends::in_memory();
    let app = backend.app(backends.clone());
    let shell = app.shell();

    let role = shell.login("faculty@college.edu", "secret").await.unwrap();

    assert_eq!(role, Role::Faculty);
    assert_eq!(Calls::get(&backend.calls.login), 1);
    assert_eq!(Calls::get(&backend.calls.refresh), 1);
    assert_eq!(app.session().access_token().as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(app.session().role(), Some(Role::Faculty));

    let now = Utc::now();
    let access = backends
        .cookies
        .load(&access_cookie_name(Role::Faculty))
        .unwrap()
        .unwrap();
    assert_eq!(access.name, "access_token_faculty");
    assert_eq!(access.value, ACCESS_TOKEN);
    assert!(within_minutes(access.expires_at, now + Duration::days(1)));

    let refresh = backends
        .cookies
        .load(&refresh_cookie_name(Role::Faculty))
        .unwrap()
        .unwrap();
    assert_eq!(refresh.value, REFRESH_TOKEN);
    assert!(within_minutes(refresh.expires_at, now + Duration::days(7)));

    assert_eq!(shell.links()[1].label, "Muster");
    assert_eq!(shell.auth_actions(), &[AuthAction::Logout]);
}

#[tokio::test]
async fn login_without_refresh_token_is_rejected() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());

    let err = app
        .shell()
        .login("norefresh@college.edu", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, CampusError::MalformedResponse { .. }));
    assert_eq!(Calls::get(&backend.calls.refresh), 0);
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn failed_exchange_drops_the_previous_roles_token() {
    let backend = spawn_backend().await;
    let backends = StorageBackends::in_memory();
    let app = backend.app(backends.clone());
    let shell = app.shell();

    app.session().set_role(Some(Role::Student)).unwrap();
    app.session()
        .set_access_token("student-tok", Some(Role::Student))
        .unwrap();

    let err = shell.login("flaky@college.edu", "secret").await.unwrap_err();

    assert!(matches!(err, CampusError::HttpStatus { status: 500, .. }));
    assert_eq!(Calls::get(&backend.calls.refresh), 1);
    assert_eq!(app.session().role(), Some(Role::Faculty));
    assert_eq!(app.session().access_token(), None);
    assert_eq!(
        shell.links().iter().map(|l| l.path).collect::<Vec<_>>(),
        ["/", "/time_table", "/holidays"]
    );
    assert_eq!(shell.auth_actions(), &[AuthAction::Login, AuthAction::SignUp]);

    // The student's own cookie survives, and the faculty refresh token is kept for a retry
    assert_eq!(
        backends
            .cookies
            .get(&access_cookie_name(Role::Student))
            .unwrap()
            .as_deref(),
        Some("student-tok")
    );
    assert_eq!(
        app.session()
            .refresh_token(Some(Role::Faculty))
            .unwrap()
            .as_deref(),
        Some(BROKEN_REFRESH_TOKEN)
    );
    match app.client().students_by_semester(2).await {
        Err(CampusError::MissingCredential { .. }) => {}
        other => panic!("Expected missing credential, got {:?}", other),
    }
}

#[tokio::test]
async fn bad_credentials_surface_the_server_detail() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());

    let err = app.shell().login("who@college.edu", "nope").await.unwrap_err();

    match err {
        CampusError::HttpStatus {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "No active account found with the given credentials");
        }
        other => panic!("Expected HTTP 401, got {:?}", other),
    }
    assert_eq!(app.session().role(), None);
}

#[tokio::test]
async fn empty_credentials_never_reach_the_server() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());

    let err = app.shell().login("  ", "secret").await.unwrap_err();

    assert!(matches!(err, CampusError::Validation { .. }));
    assert_eq!(Calls::get(&backend.calls.total), 0);
}

#[tokio::test]
async fn remembered_role_without_cookie_shows_guest_links() {
    let backend = spawn_backend().await;
    let backends = StorageBackends::in_memory();
    backends.local.set_item(ROLE_KEY, "faculty").unwrap();

    let app = backend.app(backends);
    let shell = app.shell();

    assert_eq!(app.session().role(), Some(Role::Faculty));
    assert_eq!(
        shell.links().iter().map(|l| l.path).collect::<Vec<_>>(),
        ["/", "/time_table", "/holidays"]
    );
    assert_eq!(shell.auth_actions(), &[AuthAction::Login, AuthAction::SignUp]);
}

#[tokio::test]
async fn signup_defaults_to_student() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());

    let registered = app
        .shell()
        .signup(&SignupForm {
            username: "asha".into(),
            email: "asha@college.edu".into(),
            password: "pw".into(),
            role: None,
        })
        .await
        .unwrap();

    assert_eq!(registered, Some(Role::Student));
    assert_eq!(Calls::get(&backend.calls.register), 1);
    assert_eq!(app.session().role(), Some(Role::Student));
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn guest_signup_is_refused_locally() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());

    let err = app
        .shell()
        .signup(&SignupForm {
            username: "visitor".into(),
            email: "visitor@college.edu".into(),
            password: "pw".into(),
            role: Some(Role::Guest),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CampusError::Validation { .. }));
    assert_eq!(Calls::get(&backend.calls.register), 0);
}

#[tokio::test]
async fn refresh_session_uses_stored_refresh_cookie() {
    let backend = spawn_backend().await;
    let backends = StorageBackends::in_memory();
    let app = backend.app(backends.clone());
    let shell = app.shell();

    match shell.refresh_session().await {
        Err(CampusError::MissingCredential { .. }) => {}
        other => panic!("Expected missing credential, got {:?}", other),
    }
    assert_eq!(Calls::get(&backend.calls.total), 0);

    app.session()
        .set_refresh_token(REFRESH_TOKEN, Role::Faculty)
        .unwrap();
    app.session().set_role(Some(Role::Faculty)).unwrap();

    shell.refresh_session().await.unwrap();

    assert_eq!(Calls::get(&backend.calls.refresh), 1);
    assert_eq!(app.session().access_token().as_deref(), Some(ACCESS_TOKEN));
}

#[tokio::test]
async fn requests_follow_the_session_through_logout() {
    let backend = spawn_backend().await;
    let app = backend.app(StorageBackends::in_memory());
    let shell = app.shell();

    shell.login("faculty@college.edu", "secret").await.unwrap();
    let students = app.client().students_by_semester(2).await.unwrap();
    assert_eq!(students.len(), 2);

    shell.logout(None).unwrap();
    let before = Calls::get(&backend.calls.total);

    match app.client().students_by_semester(2).await {
        Err(CampusError::MissingCredential { .. }) => {}
        other => panic!("Expected missing credential, got {:?}", other),
    }
    assert_eq!(Calls::get(&backend.calls.total), before);
    assert_eq!(shell.auth_actions(), &[AuthAction::Login, AuthAction::SignUp]);
}

#[tokio::test]
async fn theme_toggle_persists_across_reopen() {
    let backend = spawn_backend().await;
    let backends = StorageBackends::in_memory();

    let first = backend.app(backends.clone());
    assert_eq!(first.shell().theme().current().unwrap(), Theme::Light);
    assert_eq!(first.shell().theme().toggle().unwrap(), Theme::Dark);

    let second = backend.app(backends);
    assert_eq!(second.shell().theme().current().unwrap(), Theme::Dark);
}
