use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route_name: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::proto_stub::{input}"))
        .output_type(format!("crate::proto_stub::{output}"))
        .codec_path(CODEC)
        .build()
}

fn main() {
    // Messages are prost derives in src/proto_stub.rs, so only the service
    // glue is generated here and no protoc is needed.
    let auth_service = Service::builder()
        .name("Auth")
        .package("auth")
        .method(unary("register", "Register", "RegisterRequest", "RegisterResponse"))
        .method(unary("login", "Login", "LoginRequest", "LoginResponse"))
        .method(unary("is_admin", "IsAdmin", "IsAdminRequest", "IsAdminResponse"))
        .build();

    Builder::new().compile(&[auth_service]);

    println!("cargo:rerun-if-changed=build.rs");
}
