//! Decision events and the presentation adapter that displays them

pub mod events;
pub mod gateway;

pub use events::DirectorEvent;
pub use gateway::{Notice, NotificationGateway, PromptNotice};
