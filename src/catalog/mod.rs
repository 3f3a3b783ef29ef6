pub mod models;
mod service;

pub use models::Game;
pub use service::GameCatalog;
