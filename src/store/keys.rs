//! Fixed record keys shared by every service.

pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const GAMES: &str = "games";
pub const TOURNAMENTS: &str = "tournaments";
pub const MATCHES: &str = "matches";
pub const PLAYER_STATS: &str = "playerStats";
pub const CHAT_MESSAGES: &str = "chatMessages";
pub const NOTIFICATIONS: &str = "notifications";
