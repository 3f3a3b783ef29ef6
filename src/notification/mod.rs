pub mod models;
mod service;

pub use models::{Notification, NotificationKind};
pub use service::NotificationService;
