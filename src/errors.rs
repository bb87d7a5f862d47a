use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize)]
pub enum AppError {
    // Lobby / directory errors
    #[error("Match '{match_id}' not found")]
    MatchNotFound { match_id: String },

    #[error("Match '{match_id}' is full (max: {max_players})")]
    MatchFull { match_id: String, max_players: usize },

    #[error("Match '{match_id}' has already started")]
    MatchAlreadyStarted { match_id: String },

    #[error("Player '{display_name}' is already in a match")]
    PlayerAlreadyInMatch { display_name: String },

    #[error("Connection is not in any match")]
    ConnectionNotInMatch,

    #[error("Only the host can do that")]
    NotHost,

    // Validation errors
    #[error("Match name cannot be empty")]
    MatchNameEmpty,

    #[error("Invalid match name: {reason}")]
    InvalidMatchName { reason: String },

    #[error("Invalid display name: {reason}")]
    InvalidDisplayName { reason: String },

    #[error("Invalid player capacity: {count} (allowed: 2-8)")]
    InvalidMaxPlayers { count: usize },

    // Rules-engine precondition violations
    #[error("No role set exists for {count} players")]
    UnsupportedPlayerCount { count: usize },

    #[error("Player not found in match")]
    PlayerNotFound,

    #[error("Not player's turn")]
    NotPlayerTurn,

    #[error("Action not allowed in phase '{phase}'")]
    WrongPhase { phase: String },

    #[error("Card is not in player's hand")]
    CardNotInHand,

    #[error("A weapon card was already played this turn")]
    WeaponAlreadyPlayed,

    #[error("Equipment '{name}' is already equipped")]
    DuplicateEquipment { name: String },

    #[error("Character already selected")]
    CharacterAlreadySelected,

    #[error("Character was not among the offered options")]
    CharacterNotOffered,

    #[error("Target is out of range or not a legal target")]
    IllegalTarget,

    #[error("Match has already ended")]
    MatchEnded,

    // Connection / transport errors
    #[error("Connection '{connection_id}' not found")]
    ConnectionNotFound { connection_id: String },

    #[error("Failed to send message to connection '{connection_id}'")]
    MessageSendFailed { connection_id: String },

    #[error("Match loop for '{match_id}' not found")]
    MatchLoopNotFound { match_id: String },

    #[error("Failed to send command to match loop: {reason}")]
    CommandSendFailed { reason: String },

    #[error("Failed to serialize response: {message}")]
    SerializationError { message: String },

    #[error("WebSocket error: {message}")]
    WebSocketError { message: String },

    #[error("Unknown message: {message}")]
    UnknownMessage { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy)]
pub enum ErrorCategory {
    ClientError,
    ValidationError,
    GameError,
    ServerError,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::MatchNotFound { .. }
            | AppError::MatchFull { .. }
            | AppError::MatchAlreadyStarted { .. }
            | AppError::PlayerAlreadyInMatch { .. }
            | AppError::ConnectionNotInMatch
            | AppError::NotHost
            | AppError::UnknownMessage { .. } => ErrorCategory::ClientError,

            AppError::MatchNameEmpty
            | AppError::InvalidMatchName { .. }
            | AppError::InvalidDisplayName { .. }
            | AppError::InvalidMaxPlayers { .. } => ErrorCategory::ValidationError,

            AppError::UnsupportedPlayerCount { .. }
            | AppError::PlayerNotFound
            | AppError::NotPlayerTurn
            | AppError::WrongPhase { .. }
            | AppError::CardNotInHand
            | AppError::WeaponAlreadyPlayed
            | AppError::DuplicateEquipment { .. }
            | AppError::CharacterAlreadySelected
            | AppError::CharacterNotOffered
            | AppError::IllegalTarget
            | AppError::MatchEnded => ErrorCategory::GameError,

            AppError::ConnectionNotFound { .. }
            | AppError::MessageSendFailed { .. }
            | AppError::MatchLoopNotFound { .. }
            | AppError::CommandSendFailed { .. }
            | AppError::SerializationError { .. }
            | AppError::WebSocketError { .. }
            | AppError::Internal { .. } => ErrorCategory::ServerError,
        }
    }

    pub fn should_log(&self) -> bool {
        matches!(self.category(), ErrorCategory::ServerError)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            AppError::MatchNotFound { .. } => "MatchNotFound",
            AppError::MatchFull { .. } => "MatchFull",
            AppError::MatchAlreadyStarted { .. } => "MatchAlreadyStarted",
            AppError::PlayerAlreadyInMatch { .. } => "PlayerAlreadyInMatch",
            AppError::ConnectionNotInMatch => "ConnectionNotInMatch",
            AppError::NotHost => "NotHost",
            AppError::MatchNameEmpty => "MatchNameEmpty",
            AppError::InvalidMatchName { .. } => "InvalidMatchName",
            AppError::InvalidDisplayName { .. } => "InvalidDisplayName",
            AppError::InvalidMaxPlayers { .. } => "InvalidMaxPlayers",
            AppError::UnsupportedPlayerCount { .. } => "UnsupportedPlayerCount",
            AppError::PlayerNotFound => "PlayerNotFound",
            AppError::NotPlayerTurn => "NotPlayerTurn",
            AppError::WrongPhase { .. } => "WrongPhase",
            AppError::CardNotInHand => "CardNotInHand",
            AppError::WeaponAlreadyPlayed => "WeaponAlreadyPlayed",
            AppError::DuplicateEquipment { .. } => "DuplicateEquipment",
            AppError::CharacterAlreadySelected => "CharacterAlreadySelected",
            AppError::CharacterNotOffered => "CharacterNotOffered",
            AppError::IllegalTarget => "IllegalTarget",
            AppError::MatchEnded => "MatchEnded",
            AppError::ConnectionNotFound { .. } => "ConnectionNotFound",
            AppError::MessageSendFailed { .. } => "MessageSendFailed",
            AppError::MatchLoopNotFound { .. } => "MatchLoopNotFound",
            AppError::CommandSendFailed { .. } => "CommandSendFailed",
            AppError::SerializationError { .. } => "SerializationError",
            AppError::WebSocketError { .. } => "WebSocketError",
            AppError::UnknownMessage { .. } => "UnknownMessage",
            AppError::Internal { .. } => "Internal",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::MatchFull { max_players, .. } => {
                format!("Match is full (maximum {} players)", max_players)
            }
            AppError::MatchNotFound { .. } => {
                "The match you're looking for doesn't exist".to_string()
            }
            AppError::ConnectionNotInMatch => "You need to join a match first".to_string(),
            AppError::SerializationError { .. } => "Invalid message format".to_string(),
            _ => self.to_string(),
        }
    }
}

pub mod validation {
    use super::AppError;

    pub fn validate_display_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidDisplayName {
                reason: "Display name cannot be empty".to_string(),
            });
        }
        if name.len() > 50 {
            return Err(AppError::InvalidDisplayName {
                reason: "Display name cannot exceed 50 characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_match_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::MatchNameEmpty);
        }
        if name.len() > 100 {
            return Err(AppError::InvalidMatchName {
                reason: "Match name cannot exceed 100 characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_max_players(count: usize) -> Result<(), AppError> {
        if !(2..=8).contains(&count) {
            return Err(AppError::InvalidMaxPlayers { count });
        }
        Ok(())
    }
}
