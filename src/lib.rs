pub mod errors;
pub mod game;
pub mod network;

// Re-export commonly used items for convenience
pub use errors::{AppError, AppResult};
pub use game::match_state::{MatchPhase, MatchState, MatchStatus};
pub use network::commands::ConnectionCommand;
pub use network::lobby::LobbyState;
