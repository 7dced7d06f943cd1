//! Recording fakes for the bot's external collaborators.
//!
//! Each fake implements the corresponding helpdesk trait against in-memory
//! state, records every call for assertions, and lets tests shape the world
//! the operation under test observes (members present in a guild, processes
//! the manager reports, responses of the token validation API).

pub mod bot_api;
pub mod gateway;
pub mod process_manager;

pub use bot_api::FakeBotApi;
pub use gateway::{FakeGateway, GatewayCall};
pub use process_manager::FakeProcessManager;
