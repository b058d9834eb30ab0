pub mod types;
pub mod tiles;
pub mod board;
pub mod validator;
pub mod scoring;
pub mod shapes;
pub mod modes;
pub mod state;

pub use modes::GameMode;
pub use state::{GameError, GameState};
