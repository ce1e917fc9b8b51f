//! Authentication Module
//! Mission: Token-based identity for every request, plus login and registration

pub mod api;
pub mod authentication;
pub mod entry_point;
pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod principal;
pub mod service;
pub mod user_store;

#[cfg(test)]
pub(crate) mod testing;

pub use api::AuthState;
pub use authentication::{AuthenticationManager, DaoAuthenticationManager};
pub use errors::{ApiError, AuthError, TokenError};
pub use jwt::{JwtHandler, TokenCodec};
pub use middleware::{identity_filter, IdentityFilter, SecurityContext};
pub use password::{BcryptEncoder, PasswordEncoder};
pub use principal::PrincipalLoader;
pub use service::AuthService;
pub use user_store::{DuplicateEmail, UserRepository, UserStore};
