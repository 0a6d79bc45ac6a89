//! Configuration for the Xiangqi client.

use serde::Serialize;
use std::time::Duration;

use crate::constants::Color;
use crate::position::BoardGeometry;

/// Options sent to the server when a game is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    pub ai_enabled: bool,
    pub ai_color: Color,
    pub ai_depth: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            ai_color: Color::Black,
            ai_depth: 3,
        }
    }
}

impl GameConfig {
    /// The side the server plays, if any.
    pub fn ai_side(&self) -> Option<Color> {
        self.ai_enabled.then_some(self.ai_color)
    }

    /// Whether a local player moves for `side`.
    pub fn is_local(&self, side: Color) -> bool {
        self.ai_side() != Some(side)
    }
}

pub struct Config {
    /// Base URL of the game API, without a trailing slash.
    pub server_url: String,
    pub game: GameConfig,

    /// Pause between the local move landing and the AI being asked to reply.
    pub ai_move_delay: Duration,
    pub geometry: BoardGeometry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000/api".to_string(),
            game: GameConfig::default(),
            ai_move_delay: Duration::from_millis(500),
            geometry: BoardGeometry::default(),
        }
    }
}
