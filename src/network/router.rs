use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::errors::{AppError, AppResult};
use crate::game::broadcaster::SnapshotBroadcaster;
use crate::game::match_loop::MatchCommand;
use crate::game::player::UserIdentity;
use crate::network::commands::ConnectionCommand;
use crate::network::directory::LeaveOutcome;
use crate::network::lobby::LobbyState;
use crate::network::messages::{
    deserialize_message, serialize_response, ClientMessage, ServerResponse,
};

fn send_response(
    cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    connection_id: &str,
    response: &ServerResponse,
) {
    let _ = cmd_sender.send(ConnectionCommand::SendToConnection {
        connection_id: connection_id.to_string(),
        message: serialize_response(response),
    });
}

fn send_to_connections(
    cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    connection_ids: Vec<String>,
    response: &ServerResponse,
) {
    let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
        connection_ids,
        message: serialize_response(response),
    });
}

pub async fn handle_text_message(
    text: String,
    connection_id: &str,
    lobby_state: &Arc<Mutex<LobbyState>>,
    cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
) {
    let message = match deserialize_message(&text) {
        Ok(message) => message,
        Err(e) => {
            send_response(
                cmd_sender,
                connection_id,
                &ServerResponse::from_app_error(&AppError::UnknownMessage {
                    message: format!("Parse error: {}", e),
                }),
            );
            return;
        }
    };

    let mut state = lobby_state.lock().await;
    if let Err(error) = handle_message(message, connection_id, &mut state, cmd_sender).await {
        if error.should_log() {
            eprintln!("❌ Request from {} failed: {}", connection_id, error);
        }
        send_response(cmd_sender, connection_id, &ServerResponse::from_app_error(&error));
    }
}

pub async fn handle_message(
    message: ClientMessage,
    connection_id: &str,
    state: &mut LobbyState,
    cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
) -> AppResult<()> {
    match message {
        ClientMessage::Ping => {
            send_response(cmd_sender, connection_id, &ServerResponse::Pong);
        }

        ClientMessage::Chat { message } => {
            let info = state
                .directory
                .info_for_connection(connection_id)
                .cloned()
                .ok_or(AppError::ConnectionNotInMatch)?;
            let connections = state.directory.connections_for_match(&info.match_id);
            send_to_connections(
                cmd_sender,
                connections,
                &ServerResponse::ChatMessage {
                    display_name: info.display_name,
                    message,
                },
            );
        }

        ClientMessage::CreateMatch {
            match_name,
            max_players,
            user_id,
            display_name,
        } => {
            let (match_id, player_id) = state.directory.create_match(
                connection_id,
                match_name,
                max_players,
                UserIdentity::new(user_id, display_name),
            )?;
            send_response(
                cmd_sender,
                connection_id,
                &ServerResponse::MatchCreated { match_id, player_id },
            );
        }

        ClientMessage::ListMatches => {
            send_response(
                cmd_sender,
                connection_id,
                &ServerResponse::MatchList {
                    matches: state.directory.list_open(),
                },
            );
        }

        ClientMessage::JoinMatch {
            match_id,
            user_id,
            display_name,
        } => {
            let player_id = state.directory.join_match(
                &match_id,
                connection_id,
                UserIdentity::new(user_id, display_name.clone()),
            )?;
            send_response(
                cmd_sender,
                connection_id,
                &ServerResponse::SelfJoined {
                    match_id: match_id.clone(),
                    player_id: player_id.clone(),
                },
            );

            let others: Vec<String> = state
                .directory
                .connections_for_match(&match_id)
                .into_iter()
                .filter(|id| id != connection_id)
                .collect();
            send_to_connections(
                cmd_sender,
                others,
                &ServerResponse::PlayerJoined {
                    player_id,
                    display_name,
                },
            );
            broadcast_directory_match(state, &match_id, cmd_sender).await?;
        }

        ClientMessage::LeaveMatch => match state.directory.leave_match(connection_id)? {
            LeaveOutcome::Left {
                display_name,
                remaining,
            } => {
                send_to_connections(
                    cmd_sender,
                    remaining,
                    &ServerResponse::PlayerLeft { display_name },
                );
            }
            LeaveOutcome::Disbanded {
                display_name,
                notified,
            } => {
                send_to_connections(
                    cmd_sender,
                    notified,
                    &ServerResponse::MatchEnded {
                        winner_ids: Vec::new(),
                        reason: format!("{} left during setup", display_name),
                    },
                );
            }
        },

        ClientMessage::StartMatch => {
            let info = state
                .directory
                .info_for_connection(connection_id)
                .cloned()
                .ok_or(AppError::ConnectionNotInMatch)?;
            let match_state = state
                .directory
                .get_match_mut(&info.match_id)
                .ok_or_else(|| AppError::MatchNotFound {
                    match_id: info.match_id.clone(),
                })?;
            if match_state.host_id != info.player_id {
                return Err(AppError::NotHost);
            }
            match_state.distribute_roles()?;
            broadcast_directory_match(state, &info.match_id, cmd_sender).await?;
        }

        ClientMessage::SelectCharacter { character_id } => {
            let info = state
                .directory
                .info_for_connection(connection_id)
                .cloned()
                .ok_or(AppError::ConnectionNotInMatch)?;
            let started = {
                let match_state = state
                    .directory
                    .get_match_mut(&info.match_id)
                    .ok_or_else(|| AppError::MatchNotFound {
                        match_id: info.match_id.clone(),
                    })?;
                match_state.select_character(&info.player_id, &character_id)?
            };

            if started {
                // All players locked in: hand the match off to its loop
                let player_to_connection = state.directory.player_to_connection(&info.match_id);
                let match_state = state
                    .directory
                    .take_match(&info.match_id)
                    .ok_or_else(|| AppError::Internal {
                        message: "match disappeared during handoff".to_string(),
                    })?;
                state
                    .registry
                    .start_match_loop(match_state, player_to_connection, cmd_sender.clone());
            } else {
                broadcast_directory_match(state, &info.match_id, cmd_sender).await?;
            }
        }

        ClientMessage::PlayCard { card_id, target_id } => {
            state
                .registry
                .send_command_by_connection(connection_id, |player_id| MatchCommand::PlayCard {
                    player_id,
                    card_id,
                    target_id,
                })?;
        }

        ClientMessage::DiscardCard { card_id } => {
            state
                .registry
                .send_command_by_connection(connection_id, |player_id| {
                    MatchCommand::DiscardCard { player_id, card_id }
                })?;
        }

        ClientMessage::EndTurn => {
            state
                .registry
                .send_command_by_connection(connection_id, |player_id| MatchCommand::EndTurn {
                    player_id,
                })?;
        }

        ClientMessage::TerminateMatch => {
            state
                .registry
                .send_command_by_connection(connection_id, |player_id| MatchCommand::Terminate {
                    player_id,
                })?;
        }
    }
    Ok(())
}

/// Snapshot fan-out for matches still owned by the directory (lobby and
/// setup phases); running matches broadcast from their own loop.
async fn broadcast_directory_match(
    state: &mut LobbyState,
    match_id: &str,
    cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
) -> AppResult<()> {
    let player_to_connection = state.directory.player_to_connection(match_id);
    let match_state = state
        .directory
        .get_match_mut(match_id)
        .ok_or_else(|| AppError::MatchNotFound {
            match_id: match_id.to_string(),
        })?;
    let broadcaster = SnapshotBroadcaster::new(player_to_connection);
    broadcaster.broadcast_snapshot(match_state, cmd_sender).await;
    Ok(())
}
