use serde::Serialize;

use crate::game::match_state::MatchState;

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub winner_ids: Vec<String>,
    pub reason: String,
}

/// Decides whether a match is over. Consulted by the match loop after
/// every accepted command. The base rule set deliberately does not define
/// a victory rule, so the default implementation never fires; concrete
/// rule sets plug their own check in here.
pub trait WinCondition: Send + Sync {
    fn winner(&self, state: &MatchState) -> Option<MatchOutcome>;
}

pub struct NoWinCondition;

impl WinCondition for NoWinCondition {
    fn winner(&self, _state: &MatchState) -> Option<MatchOutcome> {
        None
    }
}
