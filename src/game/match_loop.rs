use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::errors::{AppError, AppResult};
use crate::game::broadcaster::SnapshotBroadcaster;
use crate::game::effects::SpecialEffectRegistry;
use crate::game::match_state::{EndTurnOutcome, MatchState};
use crate::game::turn_timer::{TurnTimer, TURN_SECONDS};
use crate::game::win::{NoWinCondition, WinCondition};
use crate::network::commands::ConnectionCommand;
use crate::network::messages::ServerResponse;

/// Commands accepted by a running match. Each one is validated and
/// applied to completion before the next is received (single writer per
/// match); resubmitting a rejected command never leaves partial state.
#[derive(Debug, Clone)]
pub enum MatchCommand {
    PlayCard {
        player_id: String,
        card_id: String,
        target_id: Option<String>,
    },
    DiscardCard {
        player_id: String,
        card_id: String,
    },
    EndTurn {
        player_id: String,
    },
    /// Synthesized by the turn timer; carries the turn counter it was
    /// armed for so stale expiries can be dropped.
    TimerExpired {
        turn: u32,
    },
    Terminate {
        player_id: String,
    },
}

/// Owns the authoritative copy of one in-progress match. Processes
/// commands sequentially, pushes a whole-state snapshot after every
/// accepted one and consults the win condition before going idle.
pub struct MatchLoop {
    state: MatchState,
    specials: SpecialEffectRegistry,
    win_condition: Box<dyn WinCondition>,
    broadcaster: SnapshotBroadcaster,
    timer: TurnTimer,
    loop_sender: mpsc::Sender<MatchCommand>,
    cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
}

impl MatchLoop {
    pub fn new(
        state: MatchState,
        player_to_connection: HashMap<String, String>,
        loop_sender: mpsc::Sender<MatchCommand>,
        cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
    ) -> Self {
        Self {
            state,
            specials: SpecialEffectRegistry::new(),
            win_condition: Box::new(NoWinCondition),
            broadcaster: SnapshotBroadcaster::new(player_to_connection),
            timer: TurnTimer::new(),
            loop_sender,
            cmd_sender,
        }
    }

    pub fn with_win_condition(mut self, win_condition: Box<dyn WinCondition>) -> Self {
        self.win_condition = win_condition;
        self
    }

    pub fn with_specials(mut self, specials: SpecialEffectRegistry) -> Self {
        self.specials = specials;
        self
    }

    pub async fn run(mut self, mut receiver: mpsc::Receiver<MatchCommand>) {
        self.begin_turn().await;
        self.broadcaster
            .broadcast_snapshot(&self.state, &self.cmd_sender)
            .await;

        while let Some(command) = receiver.recv().await {
            self.handle_command(command).await;
            if self.state.is_finished() {
                break;
            }
        }

        self.timer.cancel();
        println!("🎮 Match loop ended for '{}'", self.state.name);
    }

    pub(crate) fn state(&self) -> &MatchState {
        &self.state
    }

    pub(crate) async fn handle_command(&mut self, command: MatchCommand) {
        match command {
            MatchCommand::PlayCard {
                player_id,
                card_id,
                target_id,
            } => {
                let result = self.play_card(&player_id, &card_id, target_id.as_deref());
                match result {
                    Ok(()) => self.finish_accepted_command().await,
                    Err(error) => self.reject(&player_id, error).await,
                }
            }
            MatchCommand::DiscardCard { player_id, card_id } => {
                match self.state.discard_card(&player_id, &card_id) {
                    Ok(outcome) => {
                        if matches!(outcome, Some(EndTurnOutcome::Rotated { .. })) {
                            self.begin_turn().await;
                        }
                        self.finish_accepted_command().await;
                    }
                    Err(error) => self.reject(&player_id, error).await,
                }
            }
            MatchCommand::EndTurn { player_id } => match self.state.end_turn(&player_id) {
                Ok(outcome) => {
                    if matches!(outcome, EndTurnOutcome::Rotated { .. }) {
                        self.begin_turn().await;
                    }
                    self.finish_accepted_command().await;
                }
                Err(error) => self.reject(&player_id, error).await,
            },
            MatchCommand::TimerExpired { turn } => {
                if turn != self.state.turn_counter || self.state.is_finished() {
                    return; // stale expiry from a previous turn
                }
                let Some(current_id) = self
                    .state
                    .players
                    .get(self.state.current_player_index)
                    .map(|p| p.id.clone())
                else {
                    return;
                };
                println!("⏰ Turn timer expired for player {}", current_id);
                match self.state.end_turn(&current_id) {
                    Ok(outcome) => {
                        if matches!(outcome, EndTurnOutcome::Rotated { .. }) {
                            self.begin_turn().await;
                        }
                        self.finish_accepted_command().await;
                    }
                    Err(error) => {
                        eprintln!("❌ Timer-driven end of turn failed: {}", error);
                    }
                }
            }
            MatchCommand::Terminate { player_id } => {
                if player_id != self.state.host_id {
                    self.reject(&player_id, AppError::NotHost).await;
                    return;
                }
                self.timer.cancel();
                self.state.finish();
                self.broadcaster
                    .broadcast_match_ended(
                        Vec::new(),
                        "Match terminated by host".to_string(),
                        &self.cmd_sender,
                    )
                    .await;
                self.broadcaster
                    .broadcast_snapshot(&self.state, &self.cmd_sender)
                    .await;
            }
        }
    }

    /// Target legality is checked up front, the way the client would,
    /// so an out-of-range shot is rejected instead of silently burning
    /// the card.
    fn play_card(
        &mut self,
        player_id: &str,
        card_id: &str,
        target_id: Option<&str>,
    ) -> AppResult<()> {
        if let Some(target) = target_id {
            let card = self
                .state
                .player(player_id)
                .and_then(|p| p.hand.iter().find(|c| c.id == card_id))
                .cloned()
                .ok_or(AppError::CardNotInHand)?;
            if !self.state.can_target(player_id, target, &card) {
                return Err(AppError::IllegalTarget);
            }
        }
        self.state
            .play_card(player_id, card_id, target_id, &self.specials)
    }

    /// Turn-start draw, private notification, turn announcement, fresh
    /// countdown. Called on match start and after every rotation.
    async fn begin_turn(&mut self) {
        match self.state.start_turn() {
            Ok(drawn) => {
                if let Ok(current) = self.state.current_player() {
                    let player_id = current.id.clone();
                    self.broadcaster
                        .send_to_player(
                            &player_id,
                            &ServerResponse::CardsDrawn { cards: drawn },
                            &self.cmd_sender,
                        )
                        .await;
                }
                self.broadcaster
                    .broadcast_turn_change(&self.state, &self.cmd_sender)
                    .await;
                self.timer.start(
                    TURN_SECONDS,
                    self.state.turn_counter,
                    self.loop_sender.clone(),
                );
            }
            Err(error) => {
                eprintln!(
                    "❌ Failed to start turn for match '{}': {}",
                    self.state.name, error
                );
            }
        }
    }

    async fn finish_accepted_command(&mut self) {
        self.broadcaster
            .broadcast_snapshot(&self.state, &self.cmd_sender)
            .await;
        self.check_win().await;
    }

    async fn check_win(&mut self) {
        if let Some(outcome) = self.win_condition.winner(&self.state) {
            self.timer.cancel();
            self.state.finish();
            self.broadcaster
                .broadcast_match_ended(outcome.winner_ids, outcome.reason, &self.cmd_sender)
                .await;
            self.broadcaster
                .broadcast_snapshot(&self.state, &self.cmd_sender)
                .await;
        }
    }

    async fn reject(&self, player_id: &str, error: AppError) {
        if error.should_log() {
            eprintln!("❌ Command failed for player {}: {}", player_id, error);
        }
        self.broadcaster
            .send_error_to_player(player_id, &error, &self.cmd_sender)
            .await;
    }
}
