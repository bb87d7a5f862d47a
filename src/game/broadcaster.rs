use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::errors::AppError;
use crate::game::match_state::{MatchState, MatchStatus};
use crate::game::roles::{role_visible_to, Role};
use crate::network::commands::ConnectionCommand;
use crate::network::messages::{
    serialize_response, MatchPublicView, PlayerPublicView, ServerResponse,
};

/// Fans the match state out to every participant: one public whole-state
/// snapshot to all connections, plus a private view (own hand, own role
/// and whatever roles that player is allowed to know) per connection.
pub struct SnapshotBroadcaster {
    player_to_connection: HashMap<String, String>,
    match_connection_ids: Vec<String>,
}

impl SnapshotBroadcaster {
    pub fn new(player_to_connection: HashMap<String, String>) -> Self {
        let match_connection_ids = player_to_connection.values().cloned().collect();
        Self {
            player_to_connection,
            match_connection_ids,
        }
    }

    pub fn public_view(state: &MatchState) -> MatchPublicView {
        let players = state
            .players
            .iter()
            .map(|player| PlayerPublicView {
                id: player.id.clone(),
                username: player.username.clone(),
                health: player.health,
                max_health: player.max_health,
                ammo: player.ammo,
                hand_size: player.hand_size(),
                attack_range: player.attack_range,
                equipment: player.equipment.clone(),
                is_ready: player.is_ready,
                eliminated: player.is_eliminated(),
                character_name: player.selected_character.as_ref().map(|c| c.name.clone()),
                revealed_role: player.role.filter(|role| *role == Role::Don),
            })
            .collect();

        MatchPublicView {
            match_id: state.id.clone(),
            name: state.name.clone(),
            status: state.status,
            phase: state.current_phase,
            current_player_id: (state.status == MatchStatus::InProgress)
                .then(|| state.players.get(state.current_player_index))
                .flatten()
                .map(|player| player.id.clone()),
            turn: state.turn_counter,
            players,
            deck_size: state.deck.cards_remaining(),
            discard_size: state.deck.discard_pile_size(),
            top_discard: state.deck.top_discard().cloned(),
            active_effects: state.active_effects.clone(),
        }
    }

    pub async fn broadcast_snapshot(
        &self,
        state: &MatchState,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        self.broadcast_public_state(state, cmd_sender).await;
        self.broadcast_private_states(state, cmd_sender).await;
    }

    async fn broadcast_public_state(
        &self,
        state: &MatchState,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
            connection_ids: self.match_connection_ids.clone(),
            message: serialize_response(&ServerResponse::MatchStateUpdate {
                view: Self::public_view(state),
            }),
        });
    }

    async fn broadcast_private_states(
        &self,
        state: &MatchState,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        for viewer in &state.players {
            let Some(connection_id) = self.player_to_connection.get(&viewer.id) else {
                continue;
            };

            let mut known_roles = HashMap::new();
            for subject in &state.players {
                if let Some(role) = subject.role {
                    if role_visible_to(viewer.role, role, subject.id == viewer.id) {
                        known_roles.insert(subject.id.clone(), role);
                    }
                }
            }

            let _ = cmd_sender.send(ConnectionCommand::SendToConnection {
                connection_id: connection_id.clone(),
                message: serialize_response(&ServerResponse::PrivateState {
                    player_id: viewer.id.clone(),
                    hand: viewer.hand.clone(),
                    role: viewer.role,
                    known_roles,
                    character_options: viewer.character_options.clone(),
                }),
            });
        }
    }

    pub async fn broadcast_turn_change(
        &self,
        state: &MatchState,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        let Ok(current) = state.current_player() else {
            return;
        };
        let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
            connection_ids: self.match_connection_ids.clone(),
            message: serialize_response(&ServerResponse::TurnChange {
                player_id: current.id.clone(),
                turn: state.turn_counter,
            }),
        });
    }

    pub async fn broadcast_match_ended(
        &self,
        winner_ids: Vec<String>,
        reason: String,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
            connection_ids: self.match_connection_ids.clone(),
            message: serialize_response(&ServerResponse::MatchEnded { winner_ids, reason }),
        });
    }

    pub async fn send_to_player(
        &self,
        player_id: &str,
        response: &ServerResponse,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        if let Some(connection_id) = self.player_to_connection.get(player_id) {
            let _ = cmd_sender.send(ConnectionCommand::SendToConnection {
                connection_id: connection_id.clone(),
                message: serialize_response(response),
            });
        }
    }

    pub async fn send_error_to_player(
        &self,
        player_id: &str,
        error: &AppError,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) {
        self.send_to_player(player_id, &ServerResponse::from_app_error(error), cmd_sender)
            .await;
    }
}
