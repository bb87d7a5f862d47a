use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Weapon,
    Defense,
    Equipment,
    Action,
}

/// Tagged card effect, matched exhaustively wherever it is applied.
/// `Special` is the extension point: it carries a tag that is looked up
/// in the special-effect handler table at play time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    Damage(u32),
    Heal(u32),
    Draw(u32),
    Shield,
    Range(u32),
    Special(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub card_type: CardType,
    pub name: String,
    pub effect: CardEffect,
    pub description: String,
    /// Only meaningful for weapon cards; added to the shooter's attack range.
    pub range: u32,
}

impl Card {
    fn from_template(template: &CardTemplate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            card_type: template.card_type,
            name: template.name.to_string(),
            effect: template.effect.clone(),
            description: template.description.to_string(),
            range: template.range,
        }
    }
}

#[derive(Debug, Clone)]
struct CardTemplate {
    card_type: CardType,
    name: &'static str,
    effect: CardEffect,
    description: &'static str,
    range: u32,
    copies: u32,
}

impl CardTemplate {
    fn new(
        card_type: CardType,
        name: &'static str,
        effect: CardEffect,
        description: &'static str,
    ) -> Self {
        Self {
            card_type,
            name,
            effect,
            description,
            range: 1,
            copies: 1,
        }
    }

    fn range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    fn copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }
}

// Fixed card multiset: the basic weapon and both defense cards come in
// two copies, everything else is unique.
static CARD_TEMPLATES: Lazy<Vec<CardTemplate>> = Lazy::new(|| {
    use CardEffect::*;
    use CardType::*;

    vec![
        // Weapons
        CardTemplate::new(Weapon, "Revolver", Damage(1), "Basic weapon").copies(2),
        CardTemplate::new(Weapon, "Shotgun", Damage(2), "Powerful close-range weapon"),
        CardTemplate::new(Weapon, "Rifle", Damage(1), "Long-range weapon").range(2),
        CardTemplate::new(
            Weapon,
            "Double Barrel",
            Special("Can shoot twice".to_string()),
            "Allows two shots per turn",
        ),
        // Defense
        CardTemplate::new(Defense, "Behind the Barricade", Shield, "Block an attack").copies(2),
        CardTemplate::new(Defense, "Dodge", Shield, "Avoid being hit").copies(2),
        // Equipment
        CardTemplate::new(Equipment, "Scope", Range(1), "Increase attack range by 1"),
        CardTemplate::new(Equipment, "Don's Cigar", Heal(1), "Heal 1 health point"),
        CardTemplate::new(Equipment, "Golden Watch", Draw(3), "Draw 3 cards"),
        // Actions
        CardTemplate::new(Action, "Shootout", Damage(1), "Standard attack"),
        CardTemplate::new(
            Action,
            "Showdown",
            Special("Duel".to_string()),
            "Challenge to a duel",
        ),
        CardTemplate::new(
            Action,
            "Dirty Ties",
            Special("Kidnap".to_string()),
            "Take a card from opponent",
        ),
        CardTemplate::new(
            Action,
            "Bribe",
            Special("Block next card".to_string()),
            "Prevent opponent from playing next card",
        ),
    ]
});

/// Builds a fresh, unshuffled copy of the full card multiset. Every card
/// gets its own entity id so duplicate copies stay distinguishable.
pub fn create_initial_deck() -> Vec<Card> {
    let mut deck = Vec::new();
    for template in CARD_TEMPLATES.iter() {
        for _ in 0..template.copies {
            deck.push(Card::from_template(template));
        }
    }
    deck
}

/// Total number of cards in the fixed catalog multiset.
pub fn catalog_size() -> usize {
    CARD_TEMPLATES.iter().map(|t| t.copies as usize).sum()
}
