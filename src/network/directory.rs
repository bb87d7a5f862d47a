use std::collections::HashMap;

use crate::errors::{validation, AppError, AppResult};
use crate::game::match_state::{MatchState, MatchStatus, MatchSummary};
use crate::game::player::UserIdentity;

#[derive(Debug, Clone)]
pub struct ConnectionMatchInfo {
    pub match_id: String,
    pub player_id: String,
    pub display_name: String,
}

/// What happened when a connection left its match: a freed seat in a
/// still-waiting match, or a match in setup torn down because an
/// emptied seat can never be refilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left {
        display_name: String,
        remaining: Vec<String>,
    },
    Disbanded {
        display_name: String,
        notified: Vec<String>,
    },
}

/// The session directory: every match that has not yet been handed off
/// to a running match loop lives here, together with the mapping from
/// connections to match participants.
pub struct MatchDirectory {
    matches: HashMap<String, MatchState>,
    connection_info: HashMap<String, ConnectionMatchInfo>,
}

impl MatchDirectory {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
            connection_info: HashMap::new(),
        }
    }

    pub fn create_match(
        &mut self,
        connection_id: &str,
        match_name: String,
        max_players: usize,
        host: UserIdentity,
    ) -> AppResult<(String, String)> {
        validation::validate_match_name(&match_name)?;
        validation::validate_display_name(&host.display_name)?;
        if self.connection_info.contains_key(connection_id) {
            return Err(AppError::PlayerAlreadyInMatch {
                display_name: host.display_name,
            });
        }

        let display_name = host.display_name.clone();
        let state = MatchState::new(match_name, host, max_players)?;
        let match_id = state.id.clone();
        let player_id = state.host_id.clone();

        self.connection_info.insert(
            connection_id.to_string(),
            ConnectionMatchInfo {
                match_id: match_id.clone(),
                player_id: player_id.clone(),
                display_name,
            },
        );
        self.matches.insert(match_id.clone(), state);

        Ok((match_id, player_id))
    }

    pub fn join_match(
        &mut self,
        match_id: &str,
        connection_id: &str,
        identity: UserIdentity,
    ) -> AppResult<String> {
        validation::validate_display_name(&identity.display_name)?;
        if self.connection_info.contains_key(connection_id) {
            return Err(AppError::PlayerAlreadyInMatch {
                display_name: identity.display_name,
            });
        }

        let state = self
            .matches
            .get_mut(match_id)
            .ok_or_else(|| AppError::MatchNotFound {
                match_id: match_id.to_string(),
            })?;
        let display_name = identity.display_name.clone();
        let player_id = state.add_player(identity)?;

        self.connection_info.insert(
            connection_id.to_string(),
            ConnectionMatchInfo {
                match_id: match_id.to_string(),
                player_id: player_id.clone(),
                display_name,
            },
        );
        Ok(player_id)
    }

    /// A leaver frees their seat while the match is still waiting;
    /// empty matches are dropped. Once setup has begun (Preparing) the
    /// seat can never be refilled, so the whole match is disbanded and
    /// every mapped connection freed. Running matches are not held here
    /// and are unaffected.
    pub fn leave_match(&mut self, connection_id: &str) -> AppResult<LeaveOutcome> {
        let info = self
            .connection_info
            .get(connection_id)
            .cloned()
            .ok_or(AppError::ConnectionNotInMatch)?;

        let state = self
            .matches
            .get_mut(&info.match_id)
            .ok_or_else(|| AppError::MatchNotFound {
                match_id: info.match_id.clone(),
            })?;

        if state.status == MatchStatus::Waiting {
            let removed_name = state.remove_player(&info.player_id)?;
            self.connection_info.remove(connection_id);
            if state.players.is_empty() {
                self.matches.remove(&info.match_id);
            }
            return Ok(LeaveOutcome::Left {
                display_name: removed_name,
                remaining: self.connections_for_match(&info.match_id),
            });
        }

        self.matches.remove(&info.match_id);
        let notified: Vec<String> = self
            .connections_for_match(&info.match_id)
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        self.connection_info
            .retain(|_, mapped| mapped.match_id != info.match_id);
        Ok(LeaveOutcome::Disbanded {
            display_name: info.display_name,
            notified,
        })
    }

    pub fn list_open(&self) -> Vec<MatchSummary> {
        self.matches
            .values()
            .filter(|state| state.status == MatchStatus::Waiting)
            .map(|state| state.summary())
            .collect()
    }

    pub fn get_match_mut(&mut self, match_id: &str) -> Option<&mut MatchState> {
        self.matches.get_mut(match_id)
    }

    /// Hands the match state off to a match loop; the directory keeps
    /// the connection mapping so chat and cleanup still resolve.
    pub fn take_match(&mut self, match_id: &str) -> Option<MatchState> {
        self.matches.remove(match_id)
    }

    pub fn info_for_connection(&self, connection_id: &str) -> Option<&ConnectionMatchInfo> {
        self.connection_info.get(connection_id)
    }

    pub fn forget_connection(&mut self, connection_id: &str) {
        self.connection_info.remove(connection_id);
    }

    pub fn player_to_connection(&self, match_id: &str) -> HashMap<String, String> {
        self.connection_info
            .iter()
            .filter(|(_, info)| info.match_id == match_id)
            .map(|(connection_id, info)| (info.player_id.clone(), connection_id.clone()))
            .collect()
    }

    pub fn connections_for_match(&self, match_id: &str) -> Vec<String> {
        self.connection_info
            .iter()
            .filter(|(_, info)| info.match_id == match_id)
            .map(|(connection_id, _)| connection_id.clone())
            .collect()
    }

    pub fn open_match_count(&self) -> usize {
        self.matches.len()
    }
}

impl Default for MatchDirectory {
    fn default() -> Self {
        Self::new()
    }
}
