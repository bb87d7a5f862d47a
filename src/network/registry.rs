use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::errors::{AppError, AppResult};
use crate::game::match_loop::{MatchCommand, MatchLoop};
use crate::game::match_state::MatchState;
use crate::network::commands::ConnectionCommand;

/// Routes in-game commands to the task that owns each running match.
pub struct MatchLoopRegistry {
    loops: Arc<DashMap<String, mpsc::Sender<MatchCommand>>>,
    // connection_id -> (match_id, player_id)
    connection_info: Arc<DashMap<String, (String, String)>>,
}

impl MatchLoopRegistry {
    pub fn new() -> Self {
        Self {
            loops: Arc::new(DashMap::new()),
            connection_info: Arc::new(DashMap::new()),
        }
    }

    /// Spawns the match loop for a match that just reached InProgress.
    /// The registry entry lives exactly as long as the loop task: once
    /// `run` returns the match is pruned, so later commands get
    /// MatchLoopNotFound instead of a dead channel.
    pub fn start_match_loop(
        &self,
        state: MatchState,
        player_to_connection: HashMap<String, String>,
        cmd_sender: UnboundedSender<ConnectionCommand>,
    ) {
        let (loop_sender, loop_receiver) = mpsc::channel(32);
        self.loops.insert(state.id.clone(), loop_sender.clone());
        for (player_id, connection_id) in &player_to_connection {
            self.connection_info.insert(
                connection_id.clone(),
                (state.id.clone(), player_id.clone()),
            );
        }

        println!("🎮 Starting match loop for '{}'", state.name);
        let match_id = state.id.clone();
        let loops = Arc::clone(&self.loops);
        let connection_info = Arc::clone(&self.connection_info);
        let match_loop = MatchLoop::new(state, player_to_connection, loop_sender, cmd_sender);
        tokio::spawn(async move {
            match_loop.run(loop_receiver).await;
            Self::prune(&loops, &connection_info, &match_id);
        });
    }

    pub fn send_command(&self, match_id: &str, command: MatchCommand) -> AppResult<()> {
        let sender = self
            .loops
            .get(match_id)
            .ok_or_else(|| AppError::MatchLoopNotFound {
                match_id: match_id.to_string(),
            })?;
        sender
            .try_send(command)
            .map_err(|err| AppError::CommandSendFailed {
                reason: err.to_string(),
            })
    }

    /// Resolves the sender's participant id from its connection and
    /// forwards the built command to the right match loop.
    pub fn send_command_by_connection<F>(&self, connection_id: &str, build: F) -> AppResult<()>
    where
        F: FnOnce(String) -> MatchCommand,
    {
        let (match_id, player_id) = self
            .connection_info
            .get(connection_id)
            .map(|entry| entry.value().clone())
            .ok_or(AppError::ConnectionNotInMatch)?;
        self.send_command(&match_id, build(player_id))
    }

    pub fn has_match_loop(&self, match_id: &str) -> bool {
        self.loops.contains_key(match_id)
    }

    pub fn cleanup_match_loop(&self, match_id: &str) {
        Self::prune(&self.loops, &self.connection_info, match_id);
    }

    pub fn remove_connection(&self, connection_id: &str) {
        self.connection_info.remove(connection_id);
    }

    fn prune(
        loops: &DashMap<String, mpsc::Sender<MatchCommand>>,
        connection_info: &DashMap<String, (String, String)>,
        match_id: &str,
    ) {
        loops.remove(match_id);
        connection_info.retain(|_, value| value.0 != match_id);
    }
}

impl Default for MatchLoopRegistry {
    fn default() -> Self {
        Self::new()
    }
}
