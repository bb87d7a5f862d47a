use once_cell::sync::Lazy;
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Catalog entry. Stable ids so references survive serialization across
/// processes; never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub ability: String,
    pub base_health: u32,
    pub base_ammo: u32,
}

impl Character {
    fn new(id: &str, name: &str, ability: &str, base_health: u32, base_ammo: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ability: ability.to_string(),
            base_health,
            base_ammo,
        }
    }
}

static CHARACTERS: Lazy<Vec<Character>> = Lazy::new(|| {
    vec![
        Character::new("enforcer", "Enforcer", "Can deal extra damage", 4, 2),
        Character::new("medic", "Medic", "Can heal other players", 3, 1),
        Character::new("scout", "Scout", "Can see other players' cards", 3, 2),
        Character::new("sniper", "Sniper", "Can attack from distance", 3, 1),
        Character::new("tank", "Tank", "Has extra health", 5, 1),
        Character::new("assassin", "Assassin", "Can eliminate players silently", 3, 2),
    ]
});

pub fn all_characters() -> &'static [Character] {
    &CHARACTERS
}

pub fn character_by_id(character_id: &str) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == character_id)
}

/// Two distinct candidate characters for one player. Distinctness within
/// the pair is guaranteed by drawing from a shuffled copy of the catalog;
/// different players may be offered overlapping pairs.
pub fn draw_character_options() -> Vec<Character> {
    let mut pool = CHARACTERS.clone();
    let mut random_generator = rng();
    pool.shuffle(&mut random_generator);
    pool.truncate(2);
    pool
}
