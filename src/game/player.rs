use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::cards::Card;
use crate::game::characters::Character;
use crate::game::roles::Role;

/// What the external auth collaborator supplies for the current actor.
/// The engine never looks inside it beyond these two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub display_name: String,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Per-match participant id. Engine commands and targeting use this.
    pub id: String,
    /// Stable identity from the auth collaborator.
    pub user_id: String,
    pub username: String,
    pub role: Option<Role>,
    pub selected_character: Option<Character>,
    pub character_options: Option<Vec<Character>>,
    pub health: u32,
    pub max_health: u32,
    pub ammo: u32,
    pub is_ready: bool,
    /// Draw order; front/back only matters for display.
    pub hand: Vec<Card>,
    /// Played equipment, deduplicated by card name.
    pub equipment: Vec<Card>,
    pub attack_range: u32,
    pub has_played_firefight: bool,
}

impl Player {
    pub const BASE_ATTACK_RANGE: u32 = 1;

    /// Health and ammo stay at zero until a character is selected.
    pub fn new(identity: UserIdentity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: identity.user_id,
            username: identity.display_name,
            role: None,
            selected_character: None,
            character_options: None,
            health: 0,
            max_health: 0,
            ammo: 0,
            is_ready: false,
            hand: Vec::new(),
            equipment: Vec::new(),
            attack_range: Self::BASE_ATTACK_RANGE,
            has_played_firefight: false,
        }
    }

    /// The single damage entry point; health never goes below zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// The single heal entry point; health never exceeds `max_health`.
    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_eliminated(&self) -> bool {
        self.health == 0 && self.selected_character.is_some()
    }

    pub fn can_be_targeted(&self) -> bool {
        !self.is_eliminated()
    }

    pub fn has_equipment_named(&self, name: &str) -> bool {
        self.equipment.iter().any(|card| card.name == name)
    }

    pub fn hand_position(&self, card_id: &str) -> Option<usize> {
        self.hand.iter().position(|card| card.id == card_id)
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }
}
