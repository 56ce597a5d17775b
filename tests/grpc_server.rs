//! End-to-end flow through a running server and the generated client.

mod common;

use std::time::{Duration, Instant};

use auth_domain::{JwtTokenService, TokenService};
use common::{TestSuite, APP_ID, APP_SECRET};
use sso::proto_stub::{IsAdminRequest, LoginRequest, RegisterRequest};
use tonic::Code;

#[tokio::test]
async fn register_login_is_admin_over_the_wire() {
    let suite = TestSuite::new().await;
    let (mut client, shutdown) = suite.spawn_server().await;

    let user_id = client
        .register(RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
        })
        .await
        .expect("register failed")
        .into_inner()
        .user_id;
    assert_eq!(user_id, 1);

    let token = client
        .login(LoginRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
            app_id: APP_ID,
        })
        .await
        .expect("login failed")
        .into_inner()
        .token;
    let claims = JwtTokenService::default()
        .validate_token(&token, APP_SECRET)
        .unwrap();
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.app_id, APP_ID);

    let wrong = client
        .login(LoginRequest {
            email: "a@x.com".to_string(),
            password: "wrong".to_string(),
            app_id: APP_ID,
        })
        .await
        .unwrap_err();
    assert_eq!(wrong.code(), Code::Unauthenticated);

    let duplicate = client
        .register(RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw2".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(duplicate.code(), Code::AlreadyExists);

    let is_admin = client
        .is_admin(IsAdminRequest { user_id })
        .await
        .unwrap()
        .into_inner()
        .is_admin;
    assert!(!is_admin);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn slow_request_is_cut_off_at_the_server_timeout() {
    let suite = TestSuite::new().await;
    let (mut client, shutdown) = suite
        .spawn_server_with_timeout(Duration::from_millis(200))
        .await;
    suite.storage.set_delay(Duration::from_secs(5));

    let started = Instant::now();
    let status = client
        .login(LoginRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
            app_id: APP_ID,
        })
        .await
        .unwrap_err();

    assert!(
        matches!(status.code(), Code::Cancelled | Code::DeadlineExceeded),
        "unexpected status: {status:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(2));

    // the server keeps serving once storage is fast again
    suite.storage.set_delay(Duration::ZERO);
    let status = client
        .is_admin(IsAdminRequest { user_id: 1 })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let _ = shutdown.send(());
}
