pub mod models;
mod service;

pub use models::ChatMessage;
pub use service::ChatService;
