use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::game::cards::Card;
use crate::game::characters::Character;
use crate::game::effects::ActiveEffect;
use crate::game::match_state::{MatchPhase, MatchStatus, MatchSummary};
use crate::game::roles::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum ClientMessage {
    Ping,
    Chat {
        message: String,
    },
    CreateMatch {
        match_name: String,
        max_players: usize,
        user_id: String,
        display_name: String,
    },
    ListMatches,
    JoinMatch {
        match_id: String,
        user_id: String,
        display_name: String,
    },
    LeaveMatch,
    StartMatch,
    SelectCharacter {
        character_id: String,
    },
    PlayCard {
        card_id: String,
        target_id: Option<String>,
    },
    DiscardCard {
        card_id: String,
    },
    EndTurn,
    TerminateMatch,
}

/// Per-player slice of the public snapshot. Hidden information (hand
/// contents, unrevealed roles) never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPublicView {
    pub id: String,
    pub username: String,
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub hand_size: usize,
    pub attack_range: u32,
    pub equipment: Vec<Card>,
    pub is_ready: bool,
    pub eliminated: bool,
    pub character_name: Option<String>,
    /// Only the Don's role is public.
    pub revealed_role: Option<Role>,
}

/// Whole-state public snapshot pushed to every participant after each
/// accepted command; clients replace local state wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPublicView {
    pub match_id: String,
    pub name: String,
    pub status: MatchStatus,
    pub phase: MatchPhase,
    pub current_player_id: Option<String>,
    pub turn: u32,
    pub players: Vec<PlayerPublicView>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub top_discard: Option<Card>,
    pub active_effects: Vec<ActiveEffect>,
}

#[derive(Debug, Serialize)]
pub enum ServerResponse {
    ConnectionId {
        connection_id: String,
    },
    Pong,
    ChatMessage {
        display_name: String,
        message: String,
    },
    MatchCreated {
        match_id: String,
        player_id: String,
    },
    MatchList {
        matches: Vec<MatchSummary>,
    },
    SelfJoined {
        match_id: String,
        player_id: String,
    },
    PlayerJoined {
        player_id: String,
        display_name: String,
    },
    PlayerLeft {
        display_name: String,
    },
    MatchStateUpdate {
        view: MatchPublicView,
    },
    /// Point-to-point view for one participant: own hand, own role plus
    /// the roles that player is allowed to know, own character options.
    PrivateState {
        player_id: String,
        hand: Vec<Card>,
        role: Option<Role>,
        known_roles: HashMap<String, Role>,
        character_options: Option<Vec<Character>>,
    },
    CardsDrawn {
        cards: Vec<Card>,
    },
    TurnChange {
        player_id: String,
        turn: u32,
    },
    MatchEnded {
        winner_ids: Vec<String>,
        reason: String,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerResponse {
    pub fn from_app_error(error: &AppError) -> Self {
        ServerResponse::Error {
            code: error.variant_name().to_string(),
            message: error.user_friendly_message(),
        }
    }
}

pub fn deserialize_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn serialize_response(response: &ServerResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        eprintln!("Failed to serialize response: {}", e);
        r#"{"Error":{"code":"SerializationError","message":"Invalid message format"}}"#.to_string()
    })
}
