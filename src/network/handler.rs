use std::error::Error;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::network::commands::ConnectionCommand;
use crate::network::directory::LeaveOutcome;
use crate::network::lobby::LobbyState;
use crate::network::messages::{serialize_response, ServerResponse};
use crate::network::router;

pub struct ConnectionHandler;

impl ConnectionHandler {
    pub async fn handle_connection(
        stream: TcpStream,
        connection_id: String,
        lobby_state: Arc<Mutex<LobbyState>>,
        cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
    ) -> Result<(), Box<dyn Error>> {
        let ws_stream = accept_async(stream).await?;
        println!("✅ WebSocket connection {} established", connection_id);

        let (ws_sender, mut ws_receiver) = ws_stream.split();

        cmd_sender.send(ConnectionCommand::AddConnection {
            id: connection_id.clone(),
            sender: ws_sender,
        })?;

        cmd_sender.send(ConnectionCommand::SendToConnection {
            connection_id: connection_id.clone(),
            message: serialize_response(&ServerResponse::ConnectionId {
                connection_id: connection_id.clone(),
            }),
        })?;

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    router::handle_text_message(text, &connection_id, &lobby_state, &cmd_sender)
                        .await;
                }
                Ok(Message::Close(_)) => {
                    println!("🔌 WebSocket close for {}", connection_id);
                    break;
                }
                Ok(_) => continue, // Ignore pings, pongs and binary frames
                Err(e) => {
                    eprintln!("WebSocket error {}: {}", connection_id, e);
                    break;
                }
            }
        }

        // Drop lobby membership; an in-progress match keeps its seat
        // (the player just stops acting) so a reconnect story stays open.
        {
            let mut state = lobby_state.lock().await;
            match state.directory.leave_match(&connection_id) {
                Ok(LeaveOutcome::Left {
                    display_name,
                    remaining,
                }) => {
                    let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
                        connection_ids: remaining,
                        message: serialize_response(&ServerResponse::PlayerLeft { display_name }),
                    });
                }
                Ok(LeaveOutcome::Disbanded {
                    display_name,
                    notified,
                }) => {
                    let _ = cmd_sender.send(ConnectionCommand::SendToConnections {
                        connection_ids: notified,
                        message: serialize_response(&ServerResponse::MatchEnded {
                            winner_ids: Vec::new(),
                            reason: format!("{} left during setup", display_name),
                        }),
                    });
                }
                Err(_) => {}
            }
            state.directory.forget_connection(&connection_id);
            state.registry.remove_connection(&connection_id);
        }

        cmd_sender.send(ConnectionCommand::RemoveConnection {
            id: connection_id.clone(),
        })?;

        println!("📴 Connection {} closed", connection_id);
        Ok(())
    }
}
