//! Request and Response models for the cache service API
//!
//! DTOs for query strings and JSON bodies. Cache values themselves travel
//! as plain text and have no model.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SetQuery;
pub use responses::LivenessResponse;
