use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::match_state::MatchState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Shield,
    RangeBoost,
    DamageBoost,
    Custom(String),
}

/// A timed modifier attached to a player. Durations count down once per
/// end-of-turn transition; expired effects are pruned in the same pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub player_id: String,
    pub duration: u32,
}

impl ActiveEffect {
    pub fn shield(player_id: impl Into<String>) -> Self {
        Self {
            kind: EffectKind::Shield,
            player_id: player_id.into(),
            duration: 1,
        }
    }
}

/// Context handed to a special-effect handler.
#[derive(Debug, Clone)]
pub struct SpecialContext {
    pub tag: String,
    pub actor_id: String,
    pub target_id: Option<String>,
}

pub type SpecialHandler = Box<dyn Fn(&mut MatchState, &SpecialContext) + Send + Sync>;

/// Handler table for `CardEffect::Special` tags. Unregistered tags are a
/// no-op: the card is still consumed and discarded, nothing else happens.
#[derive(Default)]
pub struct SpecialEffectRegistry {
    handlers: HashMap<String, SpecialHandler>,
}

impl SpecialEffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, tag: impl Into<String>, handler: F)
    where
        F: Fn(&mut MatchState, &SpecialContext) + Send + Sync + 'static,
    {
        self.handlers.insert(tag.into(), Box::new(handler));
    }

    pub fn dispatch(&self, state: &mut MatchState, context: &SpecialContext) {
        if let Some(handler) = self.handlers.get(&context.tag) {
            handler(state, context);
        }
    }

    pub fn has_handler(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }
}
