//! crates/dream_journal_core/src/card.rs
//!
//! The collectible-card layout derived from a dream entry.

use serde::{Deserialize, Serialize};

use crate::domain::DreamEntry;
use crate::styles::truncate_with_ellipsis;

const CARD_DESCRIPTION_CHARS: usize = 200;
const CARD_FLAVOR_TEXT: &str = "Dreams are the playground of the subconscious mind.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDesign {
    pub name: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(rename = "type", default)]
    pub type_line: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub power_toughness: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flavor_text: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub set_symbol: String,
    #[serde(default)]
    pub background_style: String,
    #[serde(default)]
    pub border_color: String,
    #[serde(default)]
    pub text_color: String,
}

impl CardDesign {
    /// Derives the card entirely from the entry's current content.
    pub fn for_entry(entry: &DreamEntry) -> Self {
        let name = entry
            .dream_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Dream from {}", entry.entry_date));

        let description = entry
            .enhanced_description
            .as_deref()
            .map(|text| truncate_with_ellipsis(text, CARD_DESCRIPTION_CHARS))
            .unwrap_or_default();

        Self {
            name,
            mana_cost: String::new(),
            type_line: "Enchantment — Dream".to_string(),
            rarity: "rare".to_string(),
            power_toughness: String::new(),
            description,
            flavor_text: CARD_FLAVOR_TEXT.to_string(),
            artist: "AI Generated".to_string(),
            set_symbol: "DW".to_string(),
            background_style: entry.art_style.as_str().to_string(),
            border_color: "purple".to_string(),
            text_color: "white".to_string(),
        }
    }
}
