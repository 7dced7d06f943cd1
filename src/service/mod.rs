//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between
//! the interaction handlers (bot layer) and the data (repository) layer. Services
//! are responsible for:
//!
//! - **Business Logic**: Implementing the request lifecycle, admission limits and
//!   custom bot supervision rules
//! - **Orchestration**: Coordinating repository calls, the support gateway and
//!   the process manager
//! - **Domain Models**: Working with domain models rather than entity models

pub mod custom_bot;
pub mod rate_limit;
pub mod request;
