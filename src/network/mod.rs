pub mod commands;
pub mod connection_manager;
pub mod directory;
pub mod handler;
pub mod lobby;
pub mod messages;
pub mod registry;
pub mod router;
pub mod server;

pub use commands::ConnectionCommand;
pub use connection_manager::ConnectionManager;
pub use directory::MatchDirectory;
pub use lobby::LobbyState;
pub use registry::MatchLoopRegistry;
pub use server::WebsocketServer;
