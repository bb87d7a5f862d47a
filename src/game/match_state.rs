use std::time::SystemTime;

use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::game::cards::{Card, CardEffect, CardType};
use crate::game::characters::draw_character_options;
use crate::game::deck::Deck;
use crate::game::effects::{ActiveEffect, SpecialContext, SpecialEffectRegistry};
use crate::game::player::{Player, UserIdentity};
use crate::game::roles::{roles_for_count, Role};

/// Coarse lifecycle stage. Transitions are monotonic:
/// Waiting -> Preparing -> InProgress -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    Preparing,
    InProgress,
    Completed,
}

/// Fine-grained state within the setup/turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Waiting,
    RoleDistribution,
    CharacterSelection,
    DrawingCards,
    PlayingCards,
    Discarding,
    Finished,
}

impl MatchPhase {
    pub fn name(&self) -> &'static str {
        match self {
            MatchPhase::Waiting => "Waiting",
            MatchPhase::RoleDistribution => "RoleDistribution",
            MatchPhase::CharacterSelection => "CharacterSelection",
            MatchPhase::DrawingCards => "DrawingCards",
            MatchPhase::PlayingCards => "PlayingCards",
            MatchPhase::Discarding => "Discarding",
            MatchPhase::Finished => "Finished",
        }
    }
}

/// What `end_turn` did: either the player must shed cards first, or the
/// turn pointer actually rotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndTurnOutcome {
    MustDiscard,
    Rotated { next_player_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub status: MatchStatus,
}

/// Aggregate root for one match, from lobby to resolution. Owns its
/// players, deck and active effects; every mutating command validates its
/// preconditions first and leaves the state untouched on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub id: String,
    pub name: String,
    pub host_id: String,
    pub max_players: usize,
    /// Seating order; defines turn rotation and adjacency.
    pub players: Vec<Player>,
    pub status: MatchStatus,
    pub current_phase: MatchPhase,
    pub current_player_index: usize,
    pub roles: Vec<Role>,
    pub deck: Deck,
    pub active_effects: Vec<ActiveEffect>,
    pub turn_counter: u32,
    pub created_at: SystemTime,
}

impl MatchState {
    /// Cards the current player draws when their turn begins.
    pub const TURN_DRAW_COUNT: usize = 2;

    pub fn new(name: String, host: UserIdentity, max_players: usize) -> AppResult<Self> {
        crate::errors::validation::validate_max_players(max_players)?;
        let host_player = Player::new(host);
        let host_id = host_player.id.clone();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            host_id,
            max_players,
            players: vec![host_player],
            status: MatchStatus::Waiting,
            current_phase: MatchPhase::Waiting,
            current_player_index: 0,
            roles: Vec::new(),
            deck: Deck::new(),
            active_effects: Vec::new(),
            turn_counter: 0,
            created_at: SystemTime::now(),
        })
    }

    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn current_player(&self) -> AppResult<&Player> {
        self.players
            .get(self.current_player_index)
            .ok_or(AppError::PlayerNotFound)
    }

    pub fn is_player_turn(&self, player_id: &str) -> bool {
        self.players
            .get(self.current_player_index)
            .map(|p| p.id == player_id)
            .unwrap_or(false)
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            player_count: self.players.len(),
            max_players: self.max_players,
            status: self.status,
        }
    }

    // ---- Lobby ----

    /// Adds a participant. Filling the match to capacity advances it to
    /// Preparing and loads the role multiset for the player count.
    pub fn add_player(&mut self, identity: UserIdentity) -> AppResult<String> {
        if self.status != MatchStatus::Waiting {
            return Err(AppError::MatchAlreadyStarted {
                match_id: self.id.clone(),
            });
        }
        if self.players.len() >= self.max_players {
            return Err(AppError::MatchFull {
                match_id: self.id.clone(),
                max_players: self.max_players,
            });
        }
        if self.players.iter().any(|p| p.user_id == identity.user_id) {
            return Err(AppError::PlayerAlreadyInMatch {
                display_name: identity.display_name,
            });
        }

        let player = Player::new(identity);
        let player_id = player.id.clone();
        self.players.push(player);

        if self.players.len() == self.max_players {
            self.status = MatchStatus::Preparing;
            self.current_phase = MatchPhase::RoleDistribution;
            self.roles = roles_for_count(self.max_players);
        }
        Ok(player_id)
    }

    /// Leaving is only possible while the match is still in the lobby.
    pub fn remove_player(&mut self, player_id: &str) -> AppResult<String> {
        if self.status != MatchStatus::Waiting {
            return Err(AppError::MatchAlreadyStarted {
                match_id: self.id.clone(),
            });
        }
        let index = self
            .player_index(player_id)
            .ok_or(AppError::PlayerNotFound)?;
        let removed = self.players.remove(index);
        Ok(removed.username)
    }

    // ---- Setup ----

    /// Shuffles the role multiset over the seating order. The Don is
    /// swapped into seat order slot 0 of the shuffled assignment so the
    /// engine can locate it cheaply; externally the only guarantee is
    /// that exactly one Don exists once roles are assigned.
    pub fn distribute_roles(&mut self) -> AppResult<()> {
        if self.current_phase != MatchPhase::RoleDistribution {
            return Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            });
        }
        if self.roles.is_empty() || self.roles.len() != self.players.len() {
            return Err(AppError::UnsupportedPlayerCount {
                count: self.players.len(),
            });
        }

        let mut assigned = self.roles.clone();
        let mut random_generator = rng();
        assigned.shuffle(&mut random_generator);
        if let Some(don_index) = assigned.iter().position(|r| *r == Role::Don) {
            assigned.swap(0, don_index);
        }
        for (player, role) in self.players.iter_mut().zip(assigned) {
            player.role = Some(role);
        }

        self.current_phase = MatchPhase::CharacterSelection;
        for player in &mut self.players {
            player.character_options = Some(draw_character_options());
        }
        Ok(())
    }

    /// Locks in one of the player's two offered characters and seeds
    /// health and ammo from its base stats (the Don gets +1 ammo, once).
    /// Returns true when this selection made everyone ready: the match
    /// moves to InProgress and the deck is built and shuffled — the only
    /// point where the deck becomes non-empty.
    pub fn select_character(&mut self, player_id: &str, character_id: &str) -> AppResult<bool> {
        if self.current_phase != MatchPhase::CharacterSelection {
            return Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            });
        }
        let index = self
            .player_index(player_id)
            .ok_or(AppError::PlayerNotFound)?;
        let player = &mut self.players[index];
        if player.selected_character.is_some() {
            return Err(AppError::CharacterAlreadySelected);
        }
        let character = player
            .character_options
            .as_ref()
            .and_then(|options| options.iter().find(|c| c.id == character_id))
            .cloned()
            .ok_or(AppError::CharacterNotOffered)?;

        player.health = character.base_health;
        player.max_health = character.base_health;
        player.ammo = character.base_ammo;
        if player.role == Some(Role::Don) {
            player.ammo += 1;
        }
        player.selected_character = Some(character);
        player.is_ready = true;

        if self.players.iter().all(|p| p.is_ready) {
            self.status = MatchStatus::InProgress;
            self.current_phase = MatchPhase::DrawingCards;
            self.deck.initialize();
            return Ok(true);
        }
        Ok(false)
    }

    // ---- Turn cycle ----

    /// Turn-start draw for the current player, then on to PlayingCards.
    pub fn start_turn(&mut self) -> AppResult<Vec<Card>> {
        self.ensure_in_progress()?;
        if self.current_phase != MatchPhase::DrawingCards {
            return Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            });
        }
        let drawn = self.draw_cards_for_current(Self::TURN_DRAW_COUNT)?;
        self.current_phase = MatchPhase::PlayingCards;
        Ok(drawn)
    }

    fn draw_cards_for_current(&mut self, count: usize) -> AppResult<Vec<Card>> {
        let index = self.current_player_index;
        if index >= self.players.len() {
            return Err(AppError::PlayerNotFound);
        }
        let drawn = self.deck.draw_cards(count);
        self.players[index].hand.extend(drawn.iter().cloned());
        Ok(drawn)
    }

    /// One-weapon-per-turn and no-duplicate-equipment gates.
    pub fn check_can_play(&self, card: &Card, player: &Player) -> AppResult<()> {
        if card.card_type == CardType::Weapon && player.has_played_firefight {
            return Err(AppError::WeaponAlreadyPlayed);
        }
        if card.card_type == CardType::Equipment && player.has_equipment_named(&card.name) {
            return Err(AppError::DuplicateEquipment {
                name: card.name.clone(),
            });
        }
        Ok(())
    }

    pub fn can_play_card(&self, card: &Card, player: &Player) -> bool {
        self.check_can_play(card, player).is_ok()
    }

    /// The sole mutation path for card effects. Once the preconditions
    /// hold the play always completes: the card leaves the hand, its
    /// effect applies (silently doing nothing when a required target does
    /// not resolve), and the card lands on the discard pile.
    pub fn play_card(
        &mut self,
        player_id: &str,
        card_id: &str,
        target_id: Option<&str>,
        specials: &SpecialEffectRegistry,
    ) -> AppResult<()> {
        self.ensure_in_progress()?;
        if self.current_phase != MatchPhase::PlayingCards {
            return Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            });
        }
        let actor_index = self
            .player_index(player_id)
            .ok_or(AppError::PlayerNotFound)?;
        if actor_index != self.current_player_index {
            return Err(AppError::NotPlayerTurn);
        }
        let card_position = self.players[actor_index]
            .hand_position(card_id)
            .ok_or(AppError::CardNotInHand)?;
        let card = self.players[actor_index].hand[card_position].clone();
        self.check_can_play(&card, &self.players[actor_index])?;

        let card = self.players[actor_index].hand.remove(card_position);
        if card.card_type == CardType::Weapon {
            self.players[actor_index].has_played_firefight = true;
        }
        if card.card_type == CardType::Equipment {
            self.players[actor_index].equipment.push(card.clone());
        }
        self.apply_card_effect(&card, actor_index, target_id, specials);
        self.deck.discard_card(card);
        Ok(())
    }

    fn apply_card_effect(
        &mut self,
        card: &Card,
        actor_index: usize,
        target_id: Option<&str>,
        specials: &SpecialEffectRegistry,
    ) {
        match &card.effect {
            CardEffect::Damage(amount) => {
                if let Some(target_index) = target_id.and_then(|id| self.player_index(id)) {
                    if self.players[target_index].can_be_targeted() {
                        self.players[target_index].apply_damage(*amount);
                    }
                }
            }
            CardEffect::Heal(amount) => {
                self.players[actor_index].heal(*amount);
            }
            CardEffect::Draw(amount) => {
                let drawn = self.deck.draw_cards(*amount as usize);
                self.players[actor_index].hand.extend(drawn);
            }
            CardEffect::Shield => {
                let player_id = self.players[actor_index].id.clone();
                self.active_effects.push(ActiveEffect::shield(player_id));
            }
            CardEffect::Range(bonus) => {
                // Cumulative across plays, not turn-scoped
                self.players[actor_index].attack_range += bonus;
            }
            CardEffect::Special(tag) => {
                let context = SpecialContext {
                    tag: tag.clone(),
                    actor_id: self.players[actor_index].id.clone(),
                    target_id: target_id.map(String::from),
                };
                specials.dispatch(self, &context);
            }
        }
    }

    /// Sheds one card during the forced discard phase. When the hand is
    /// back within the health limit the turn rotation resumes.
    pub fn discard_card(
        &mut self,
        player_id: &str,
        card_id: &str,
    ) -> AppResult<Option<EndTurnOutcome>> {
        self.ensure_in_progress()?;
        if self.current_phase != MatchPhase::Discarding {
            return Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            });
        }
        let index = self
            .player_index(player_id)
            .ok_or(AppError::PlayerNotFound)?;
        if index != self.current_player_index {
            return Err(AppError::NotPlayerTurn);
        }
        let card_position = self.players[index]
            .hand_position(card_id)
            .ok_or(AppError::CardNotInHand)?;
        let card = self.players[index].hand.remove(card_position);
        self.deck.discard_card(card);

        let player = &self.players[index];
        if player.hand_size() <= player.health as usize {
            return self.advance_turn().map(Some);
        }
        Ok(None)
    }

    pub fn end_turn(&mut self, player_id: &str) -> AppResult<EndTurnOutcome> {
        self.ensure_in_progress()?;
        if !self.is_player_turn(player_id) {
            return Err(AppError::NotPlayerTurn);
        }
        self.advance_turn()
    }

    /// Hand-limit check, circular rotation skipping eliminated seats,
    /// per-turn flag reset, then the single decrement-then-prune pass
    /// over all active effects.
    fn advance_turn(&mut self) -> AppResult<EndTurnOutcome> {
        let current = self.current_player()?;
        if current.hand_size() > current.health as usize {
            self.current_phase = MatchPhase::Discarding;
            return Ok(EndTurnOutcome::MustDiscard);
        }

        let seat_count = self.players.len();
        let mut next = (self.current_player_index + 1) % seat_count;
        for _ in 0..seat_count {
            if !self.players[next].is_eliminated() {
                break;
            }
            next = (next + 1) % seat_count;
        }
        self.current_player_index = next;
        self.turn_counter += 1;
        self.current_phase = MatchPhase::DrawingCards;
        self.players[next].has_played_firefight = false;
        self.tick_active_effects();

        Ok(EndTurnOutcome::Rotated {
            next_player_id: self.players[next].id.clone(),
        })
    }

    fn tick_active_effects(&mut self) {
        for effect in &mut self.active_effects {
            effect.duration = effect.duration.saturating_sub(1);
        }
        self.active_effects.retain(|effect| effect.duration > 0);
    }

    // ---- Targeting ----

    /// Minimum of clockwise and counterclockwise steps around the
    /// seating circle.
    pub fn seat_distance(&self, from_index: usize, to_index: usize) -> usize {
        let seat_count = self.players.len();
        if seat_count == 0 {
            return 0;
        }
        let clockwise = (to_index + seat_count - from_index) % seat_count;
        let counterclockwise = (from_index + seat_count - to_index) % seat_count;
        clockwise.min(counterclockwise)
    }

    /// Weapon cards need the target within attack range and never target
    /// self; Kidnap needs an adjacent seat; everything else is
    /// unrestricted. Eliminated players are never legal targets.
    pub fn can_target(&self, actor_id: &str, target_id: &str, card: &Card) -> bool {
        let (Some(actor_index), Some(target_index)) =
            (self.player_index(actor_id), self.player_index(target_id))
        else {
            return false;
        };
        if !self.players[target_index].can_be_targeted() {
            return false;
        }
        let distance = self.seat_distance(actor_index, target_index);

        if card.card_type == CardType::Weapon {
            if actor_index == target_index {
                return false;
            }
            // A weapon's range counts from its base reach of 1, so the
            // stock Revolver only extends the shooter's own range at 2+.
            let reach = (self.players[actor_index].attack_range + card.range).saturating_sub(1);
            return distance <= reach as usize;
        }
        if matches!(&card.effect, CardEffect::Special(tag) if tag == "Kidnap") {
            return distance <= 1;
        }
        true
    }

    // ---- Resolution ----

    /// Explicit end of match (win condition fired or host termination).
    pub fn finish(&mut self) {
        self.status = MatchStatus::Completed;
        self.current_phase = MatchPhase::Finished;
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    fn ensure_in_progress(&self) -> AppResult<()> {
        match self.status {
            MatchStatus::InProgress => Ok(()),
            MatchStatus::Completed => Err(AppError::MatchEnded),
            _ => Err(AppError::WrongPhase {
                phase: self.current_phase.name().to_string(),
            }),
        }
    }
}
