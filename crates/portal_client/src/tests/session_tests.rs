use super::*;
use crate::{
    indicator::IndicatorState,
    test_support::{
        harness, harness_with, offline_harness, ok, sample_identity, signed_in_harness,
        RecordingNotifier,
    },
};
use serde_json::json;
use shared::domain::UserId;

#[tokio::test]
async fn refresh_populates_identity_from_avatar_alias() {
    let h = harness().await;
    h.backend
        .respond_json(
            "GET",
            CURRENT_USER_PATH,
            ok(json!({ "id": 5, "username": "su", "nickname": "Su Shi", "avatar": "/u/5.png" })),
        )
        .await;

    h.client.session().refresh().await;

    let identity = h.client.session().identity().expect("identity");
    assert_eq!(identity.id, UserId(5));
    assert_eq!(identity.avatar_url, "/u/5.png");
    assert_eq!(identity.display_name(), "Su Shi");
    assert!(h.client.session().is_authenticated());
}

#[tokio::test]
async fn refresh_treats_auth_required_as_anonymous_without_navigating() {
    for code in [json!(401), json!("401")] {
        let h = signed_in_harness().await;
        h.client.indicators().register("status").await;
        h.backend
            .respond_json("GET", CURRENT_USER_PATH, json!({ "code": code, "msg": "no session" }))
            .await;

        h.client.session().refresh().await;

        assert!(!h.client.session().is_authenticated());
        assert!(h.navigator.targets().is_empty());
        assert!(h.notifier.alerts().is_empty());
        assert_eq!(
            h.client.indicators().state("status").await,
            Some(IndicatorState::Hidden)
        );
    }
}

#[tokio::test]
async fn refresh_clears_session_when_backend_is_unreachable() {
    let h = offline_harness(Session::signed_in(sample_identity())).await;

    h.client.session().refresh().await;

    assert_eq!(h.client.session().current(), Session::anonymous());
    assert!(h.navigator.targets().is_empty());
}

#[tokio::test]
async fn refresh_with_missing_identity_is_anonymous() {
    let h = signed_in_harness().await;
    h.backend
        .respond_json("GET", CURRENT_USER_PATH, ok(Value::Null))
        .await;

    h.client.session().refresh().await;

    assert!(!h.client.session().is_authenticated());
}

#[tokio::test]
async fn login_requires_both_fields_before_any_request() {
    let h = harness().await;

    assert!(!h.client.session().login("a", "   ").await);
    assert!(!h.client.session().login("", "b").await);

    assert_eq!(h.backend.total_hits().await, 0);
    assert_eq!(
        h.notifier.infos(),
        vec![
            MISSING_CREDENTIALS_NOTICE.to_string(),
            MISSING_CREDENTIALS_NOTICE.to_string()
        ]
    );
}

#[tokio::test]
async fn login_applies_default_avatar() {
    let h = harness().await;
    h.backend
        .respond_json("POST", LOGIN_PATH, ok(json!({ "id": 1, "username": "a" })))
        .await;

    assert!(h.client.session().login("a", "b").await);

    let session = h.client.session().current();
    assert!(session.is_authenticated());
    let identity = session.identity().expect("identity");
    assert_eq!(identity.avatar_url, "/images/default-avatar.png");
    assert_eq!(h.notifier.infos(), vec![LOGIN_OK_NOTICE.to_string()]);

    let requests = h.backend.requests().await;
    assert_eq!(requests[0].body, json!({ "username": "a", "password": "b" }));
}

#[tokio::test]
async fn rejected_login_leaves_session_anonymous() {
    let h = harness().await;
    h.backend
        .respond_json("POST", LOGIN_PATH, json!({ "code": 400, "msg": "wrong password" }))
        .await;

    assert!(!h.client.session().login("a", "b").await);

    assert!(!h.client.session().is_authenticated());
    assert_eq!(h.notifier.infos(), vec!["wrong password".to_string()]);
}

#[tokio::test]
async fn unreachable_backend_login_reports_failure() {
    let h = offline_harness(Session::anonymous()).await;

    assert!(!h.client.session().login("a", "b").await);

    assert!(!h.client.session().is_authenticated());
    assert_eq!(h.notifier.infos(), vec![LOGIN_FAILED_NOTICE.to_string()]);
}

#[tokio::test]
async fn logout_clears_session_even_if_backend_fails() {
    let h = signed_in_harness().await;

    h.client.session().logout().await;

    assert_eq!(h.backend.hits("POST", LOGOUT_PATH).await, 1);
    assert!(!h.client.session().is_authenticated());
    assert_eq!(h.navigator.targets(), vec!["/index.html".to_string()]);
}

#[tokio::test]
async fn declined_switch_account_does_nothing() {
    let h = signed_in_harness().await;

    assert!(!h.client.session().switch_account().await);

    assert_eq!(h.backend.total_hits().await, 0);
    assert!(h.client.session().is_authenticated());
    assert!(h.navigator.targets().is_empty());
}

#[tokio::test]
async fn switch_account_logs_out_then_opens_login() {
    let h = harness_with(
        Session::signed_in(sample_identity()),
        RecordingNotifier::answering(true),
    )
    .await;
    h.backend
        .respond_json("POST", LOGOUT_PATH, ok(Value::Null))
        .await;

    assert!(h.client.session().switch_account().await);

    assert!(!h.client.session().is_authenticated());
    assert_eq!(
        h.navigator.targets(),
        vec!["/index.html".to_string(), "/login.html".to_string()]
    );
}

#[tokio::test]
async fn subscribers_see_every_session_write() {
    let h = harness().await;
    let mut sessions = h.client.session().subscribe();
    h.backend
        .respond_json("POST", LOGIN_PATH, ok(json!({ "id": 1, "username": "a" })))
        .await;

    assert!(h.client.session().login("a", "b").await);
    sessions.changed().await.expect("login published");
    assert!(sessions.borrow_and_update().is_authenticated());

    h.client.session().logout().await;
    sessions.changed().await.expect("logout published");
    assert!(!sessions.borrow_and_update().is_authenticated());
}
