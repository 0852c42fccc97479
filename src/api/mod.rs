//! HTTP boundary: router, handlers, and the error-to-status mapping.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::extraction_router;
pub use types::ApiContext;
