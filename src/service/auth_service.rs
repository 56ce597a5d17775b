use std::sync::Arc;

use auth_domain::service::AuthService;
use tonic::{Request, Response, Status};
use tracing::instrument;

use crate::mapper::IntoStatus;
use crate::proto_stub::auth_server::{Auth, AuthServer};
use crate::proto_stub::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};

/// gRPC front of the domain service. Only checks request shape and maps errors.
pub struct AuthGrpcServiceImpl {
    auth_service: Arc<dyn AuthService>,
}

impl AuthGrpcServiceImpl {
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }

    pub fn into_server(self) -> AuthServer<Self> {
        AuthServer::new(self)
    }
}

#[tonic::async_trait]
impl Auth for AuthGrpcServiceImpl {
    #[instrument(skip_all)]
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();

        if req.email.is_empty() {
            return Err(Status::invalid_argument("email is required"));
        }
        if req.password.is_empty() {
            return Err(Status::invalid_argument("password is required"));
        }

        let user_id = self
            .auth_service
            .register_new_user(&req.email, &req.password)
            .await
            .map_err(|e| e.into_status())?;

        Ok(Response::new(RegisterResponse { user_id }))
    }

    #[instrument(skip_all, fields(app_id = request.get_ref().app_id))]
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        if req.email.is_empty() {
            return Err(Status::invalid_argument("email is required"));
        }
        if req.password.is_empty() {
            return Err(Status::invalid_argument("password is required"));
        }
        if req.app_id == 0 {
            return Err(Status::invalid_argument("app_id is required"));
        }

        let token = self
            .auth_service
            .login(&req.email, &req.password, req.app_id)
            .await
            .map_err(|e| e.into_status())?;

        Ok(Response::new(LoginResponse { token }))
    }

    #[instrument(skip_all, fields(user_id = request.get_ref().user_id))]
    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let req = request.into_inner();

        if req.user_id == 0 {
            return Err(Status::invalid_argument("user_id is required"));
        }

        let is_admin = self
            .auth_service
            .is_admin(req.user_id)
            .await
            .map_err(|e| e.into_status())?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }
}
