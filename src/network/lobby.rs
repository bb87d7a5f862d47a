use crate::network::directory::MatchDirectory;
use crate::network::registry::MatchLoopRegistry;

/// Everything the message router needs under one lock: the session
/// directory of not-yet-started matches and the registry of running
/// match loops.
pub struct LobbyState {
    pub directory: MatchDirectory,
    pub registry: MatchLoopRegistry,
}

impl LobbyState {
    pub fn new() -> Self {
        Self {
            directory: MatchDirectory::new(),
            registry: MatchLoopRegistry::new(),
        }
    }
}

impl Default for LobbyState {
    fn default() -> Self {
        Self::new()
    }
}
