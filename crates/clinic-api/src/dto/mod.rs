//! Request and response DTOs.

pub mod request;
pub mod response;

pub use response::ApiResponse;
