use std::collections::HashMap;

use futures_util::{stream::SplitSink, SinkExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};

use crate::errors::{AppError, AppResult};

#[derive(Debug)]
struct WebSocketConnection {
    sender: SplitSink<WebSocketStream<TcpStream>, Message>,
}

/// Owns every live WebSocket sink. Exactly one task holds this; all
/// sends are serialized through the connection-command channel.
pub struct ConnectionManager {
    connections: HashMap<String, WebSocketConnection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    pub fn add_connection(
        &mut self,
        id: String,
        sender: SplitSink<WebSocketStream<TcpStream>, Message>,
    ) {
        self.connections.insert(id.clone(), WebSocketConnection { sender });
        println!("📝 Added connection: {}", id);
    }

    pub fn remove_connection(&mut self, id: &str) {
        self.connections.remove(id);
        println!("🗑️ Removed connection: {}", id);
    }

    pub async fn send_to_connection(&mut self, connection_id: &str, message: &str) -> AppResult<()> {
        self.connections
            .get_mut(connection_id)
            .ok_or_else(|| AppError::ConnectionNotFound {
                connection_id: connection_id.to_string(),
            })?
            .sender
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|_| AppError::MessageSendFailed {
                connection_id: connection_id.to_string(),
            })?;
        Ok(())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
