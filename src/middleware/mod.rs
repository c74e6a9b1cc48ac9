pub mod auth;
pub mod response;

pub use auth::{ensure_can_mutate, require_admin, require_auth, AuthUser};
pub use response::{ApiResponse, ApiResult, Paged};
