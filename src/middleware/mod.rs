pub mod auth;
pub mod provincial;

pub use auth::{admin_gate_middleware, jwt_auth_middleware, AuthUser};
pub use provincial::{provincial_db_middleware, ProvincialDb};
