//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let request = factory::assist_request::create_request(&db).await?;
//!     let bot = factory::custom_bot::create_custom_bot(&db).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod assist_request;
pub mod custom_bot;
pub mod helpers;

// Re-export commonly used factory functions for concise usage
pub use assist_request::create_request;
pub use custom_bot::create_custom_bot;
