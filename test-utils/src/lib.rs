//! Helpdesk Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the
//! helpdesk bot. This crate offers a builder pattern for creating test contexts with
//! in-memory SQLite databases, factories for the domain entities, and in-memory fakes
//! for the bot's external collaborators (support gateway, process manager, token
//! validation API).
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and setup
//! - **factory**: Factories creating entities with sensible defaults
//! - **fake**: Recording fakes substituting the external collaborators
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_request_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_request_tables()
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fake;
