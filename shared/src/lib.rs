//! Shared types for the Farm Market workspace
//!
//! # Contents
//!
//! - **Models** (`models`): identity, product, cart, and order entities
//! - **Errors** (`error`): unified [`AppError`] type with HTTP mapping
//! - **Responses** (`response`): unified API response envelope
//! - **Utilities** (`util`): id generation, timestamps, money rounding

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-export common types
pub use error::{AppError, AppResult};
pub use response::ApiResponse;
