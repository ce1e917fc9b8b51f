pub mod routes;
pub mod user;

pub use routes::{create_router, AppState};
