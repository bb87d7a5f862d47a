use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::network::commands::{CommandProcessor, ConnectionCommand};
use crate::network::connection_manager::ConnectionManager;
use crate::network::handler::ConnectionHandler;
use crate::network::lobby::LobbyState;

pub struct WebsocketServer {
    address: String,
}

impl WebsocketServer {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error>> {
        let listener = TcpListener::bind(&self.address).await?;
        println!("🎧 Listening on {}", self.address);

        let lobby_state = Arc::new(Mutex::new(LobbyState::new()));

        // Single task owns all WebSocket sinks; everything else talks to
        // it through this channel.
        let (cmd_sender, mut cmd_receiver) = mpsc::unbounded_channel::<ConnectionCommand>();
        tokio::spawn(async move {
            let mut connection_manager = ConnectionManager::new();
            while let Some(command) = cmd_receiver.recv().await {
                if let Err(e) =
                    CommandProcessor::process_command(command, &mut connection_manager).await
                {
                    eprintln!("❌ Connection command failed: {}", e);
                }
            }
        });

        while let Ok((stream, addr)) = listener.accept().await {
            println!("🔗 New connection from: {}", addr);
            let connection_id = Uuid::new_v4().to_string();

            let lobby_state = lobby_state.clone();
            let cmd_sender = cmd_sender.clone();

            tokio::spawn(async move {
                if let Err(e) = ConnectionHandler::handle_connection(
                    stream,
                    connection_id,
                    lobby_state,
                    cmd_sender,
                )
                .await
                {
                    eprintln!("❌ Error handling connection: {}", e);
                }
            });
        }

        Ok(())
    }
}
