//! Domain models and operation parameter types.
//!
//! This module contains domain models used throughout the service layer. Domain
//! models are converted from entity models at the repository boundary and carry
//! the derived business state (request status, custom bot status) that is never
//! persisted as a column.

pub mod custom_bot;
pub mod request;
