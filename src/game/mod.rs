pub mod broadcaster;
pub mod cards;
pub mod characters;
pub mod deck;
pub mod effects;
pub mod match_loop;
pub mod match_state;
pub mod player;
pub mod roles;
pub mod turn_timer;
pub mod win;

/// Forces the lazy card and character catalogs at process start so the
/// first match doesn't pay for catalog construction.
pub fn initialize_catalogs() {
    let card_count = cards::catalog_size();
    let character_count = characters::all_characters().len();
    println!(
        "🃏 Catalogs initialized: {} cards, {} characters",
        card_count, character_count
    );
}
