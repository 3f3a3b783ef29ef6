use serde::{Deserialize, Serialize};

/// A game tournaments can be played in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl Game {
    fn demo(id: &str, name: &str, image: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            description: description.to_string(),
        }
    }

    /// The catalog a fresh store is seeded with
    pub fn demo_catalog() -> Vec<Game> {
        vec![
            Game::demo(
                "1",
                "Combat Master",
                "https://images.pexels.com/photos/7915527/pexels-photo-7915527.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
                "Fast-paced first-person shooter with tactical gameplay and customizable loadouts.",
            ),
            Game::demo(
                "2",
                "Half-Life",
                "https://images.pexels.com/photos/442576/pexels-photo-442576.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
                "Iconic first-person shooter that revolutionized storytelling in video games.",
            ),
            Game::demo(
                "3",
                "Counter-Strike: Source",
                "https://images.pexels.com/photos/7914464/pexels-photo-7914464.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
                "Classic team-based action gameplay that defined competitive FPS gaming.",
            ),
            Game::demo(
                "4",
                "Valorant",
                "https://images.pexels.com/photos/6056774/pexels-photo-6056774.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
                "Tactical shooter with unique character abilities and precise gunplay.",
            ),
        ]
    }
}
