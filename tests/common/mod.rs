//! Shared setup for the integration tests: an in-memory backed service with
//! one provisioned app, optionally served over a real gRPC listener.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use auth_data::{AppEntity, InMemoryStorage};
use auth_domain::AuthService;
use sso::proto_stub::auth_client::AuthClient;
use sso::service::AuthGrpcServiceImpl;
use sso::{build_auth_service, GrpcApp};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::transport::Channel;

pub const APP_ID: i32 = 1;
pub const APP_SECRET: &str = "test-secret";
pub const TOKEN_TTL_SECS: i64 = 3600;

pub struct TestSuite {
    pub storage: Arc<InMemoryStorage>,
    pub auth_service: Arc<dyn AuthService>,
}

impl TestSuite {
    pub async fn new() -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .add_app(AppEntity::new(APP_ID, "test-app", APP_SECRET))
            .await;

        let auth_service =
            build_auth_service(storage.clone(), chrono::Duration::seconds(TOKEN_TTL_SECS));

        Self {
            storage,
            auth_service,
        }
    }

    pub fn grpc(&self) -> AuthGrpcServiceImpl {
        AuthGrpcServiceImpl::new(self.auth_service.clone())
    }

    /// Run the full server on an ephemeral port and connect a client to it.
    pub async fn spawn_server(&self) -> (AuthClient<Channel>, oneshot::Sender<()>) {
        self.spawn_server_with_timeout(Duration::from_secs(5)).await
    }

    pub async fn spawn_server_with_timeout(
        &self,
        timeout: Duration,
    ) -> (AuthClient<Channel>, oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = GrpcApp::new(addr.port(), timeout, self.auth_service.clone());
        tokio::spawn(async move {
            app.serve(listener, async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("gRPC server failed");
        });

        let client = AuthClient::connect(format!("http://{addr}"))
            .await
            .expect("failed to connect to test server");
        (client, shutdown_tx)
    }
}

pub fn unique_email() -> String {
    static COUNTER: AtomicU16 = AtomicU16::new(0);
    format!("user{}@example.com", COUNTER.fetch_add(1, Ordering::SeqCst))
}
