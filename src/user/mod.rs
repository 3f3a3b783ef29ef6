pub mod models;
mod service;

pub use models::User;
pub use service::AuthService;
