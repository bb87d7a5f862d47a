use std::error::Error;

use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};

use crate::network::connection_manager::ConnectionManager;

/// Commands for the single task that owns all WebSocket sinks. Everything
/// that wants to push bytes to a client goes through this channel.
#[derive(Debug)]
pub enum ConnectionCommand {
    AddConnection {
        id: String,
        sender: SplitSink<WebSocketStream<TcpStream>, Message>,
    },
    RemoveConnection {
        id: String,
    },
    SendToConnection {
        connection_id: String,
        message: String,
    },
    SendToConnections {
        connection_ids: Vec<String>,
        message: String,
    },
}

pub struct CommandProcessor;

impl CommandProcessor {
    pub async fn process_command(
        command: ConnectionCommand,
        connection_manager: &mut ConnectionManager,
    ) -> Result<(), Box<dyn Error>> {
        match command {
            ConnectionCommand::AddConnection { id, sender } => {
                connection_manager.add_connection(id, sender);
            }
            ConnectionCommand::RemoveConnection { id } => {
                connection_manager.remove_connection(&id);
            }
            ConnectionCommand::SendToConnection {
                connection_id,
                message,
            } => {
                connection_manager
                    .send_to_connection(&connection_id, &message)
                    .await?;
            }
            ConnectionCommand::SendToConnections {
                connection_ids,
                message,
            } => {
                for connection_id in connection_ids {
                    connection_manager
                        .send_to_connection(&connection_id, &message)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
