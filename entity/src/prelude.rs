pub use super::assist_request::Entity as AssistRequest;
pub use super::assist_thread::Entity as AssistThread;
pub use super::assist_thread_status::Entity as AssistThreadStatus;
pub use super::custom_bot::Entity as CustomBot;
