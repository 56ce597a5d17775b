//! gRPC single sign-on service: registers users, checks credentials and
//! issues per-app access tokens.

pub mod app;
pub mod config;
pub mod logging;
pub mod mapper;
pub mod proto_stub;
pub mod service;

pub use app::{build_auth_service, shutdown_signal, GrpcApp, ServeError};
pub use config::{Config, Environment};
