//! Wiring of the domain service and the gRPC server lifecycle.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth_data::repositories::{AppProvider, UserProvider, UserSaver};
use auth_domain::{
    AuthService, AuthServiceConfig, AuthServiceImpl, JwtTokenService, Pbkdf2HashingService,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Server;
use tracing::info;

use crate::service::AuthGrpcServiceImpl;

/// Build the domain service over any backend that implements all three
/// storage contracts.
pub fn build_auth_service<S>(storage: Arc<S>, token_ttl: chrono::Duration) -> Arc<dyn AuthService>
where
    S: UserSaver + UserProvider + AppProvider + 'static,
{
    Arc::new(AuthServiceImpl::new(
        storage.clone(),
        storage.clone(),
        storage,
        Arc::new(JwtTokenService::default()),
        Arc::new(Pbkdf2HashingService::default()),
        AuthServiceConfig { token_ttl },
    ))
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("cannot bind gRPC listener: {0}")]
    Bind(#[from] std::io::Error),

    #[error("cannot accept on gRPC listener: {0}")]
    Incoming(String),

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

pub struct GrpcApp {
    port: u16,
    timeout: Duration,
    service: AuthGrpcServiceImpl,
}

impl GrpcApp {
    pub fn new(port: u16, timeout: Duration, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            port,
            timeout,
            service: AuthGrpcServiceImpl::new(auth_service),
        }
    }

    /// Serve on all interfaces until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()>,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()>,
    {
        const OP: &str = "grpcapp.run";

        let addr = listener.local_addr()?;
        let incoming = TcpIncoming::from_listener(listener, true, None)
            .map_err(|e| ServeError::Incoming(e.to_string()))?;

        info!(op = OP, %addr, timeout = ?self.timeout, "gRPC server is running");

        Server::builder()
            .timeout(self.timeout)
            .add_service(self.service.into_server())
            .serve_with_incoming_shutdown(incoming, shutdown)
            .await?;

        info!(op = OP, %addr, "gRPC server stopped");
        Ok(())
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "Stopping application"),
        _ = terminate => info!(signal = "SIGTERM", "Stopping application"),
    }
}
