//! HTTP facade for a sealed index.

mod handlers;
mod router;
mod types;

pub use router::{create_router, AppState};
pub use types::{ApiError, ErrorResponse, QueryParams};
