//! Campus Core - shared error, configuration and domain types
//!
//! Everything the API client, the session layer and the CLI agree on lives here

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tokio_util::sync::CancellationToken;
pub use tracing;
