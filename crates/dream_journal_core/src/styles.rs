//! crates/dream_journal_core/src/styles.rs
//!
//! The art-style catalogue, image quality tiers, and the prompt enhancement
//! applied to dream text before it is sent for image generation.

use std::fmt;
use std::str::FromStr;

/// Image prompts are capped below the provider's 4000 character limit.
pub const MAX_IMAGE_PROMPT_CHARS: usize = 3900;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArtStyle {
    #[default]
    Ethereal,
    Surreal,
    Nightmare,
    Cosmic,
    Mystical,
    Nostalgic,
    Vibrant,
}

impl ArtStyle {
    pub const ALL: [ArtStyle; 7] = [
        ArtStyle::Ethereal,
        ArtStyle::Surreal,
        ArtStyle::Nightmare,
        ArtStyle::Cosmic,
        ArtStyle::Mystical,
        ArtStyle::Nostalgic,
        ArtStyle::Vibrant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtStyle::Ethereal => "ethereal",
            ArtStyle::Surreal => "surreal",
            ArtStyle::Nightmare => "nightmare",
            ArtStyle::Cosmic => "cosmic",
            ArtStyle::Mystical => "mystical",
            ArtStyle::Nostalgic => "nostalgic",
            ArtStyle::Vibrant => "vibrant",
        }
    }

    /// Unknown or missing styles silently become `Ethereal`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ArtStyle::Ethereal => "Ethereal",
            ArtStyle::Surreal => "Surreal",
            ArtStyle::Nightmare => "Nightmare",
            ArtStyle::Cosmic => "Cosmic",
            ArtStyle::Mystical => "Mystical",
            ArtStyle::Nostalgic => "Nostalgic",
            ArtStyle::Vibrant => "Vibrant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ArtStyle::Ethereal => "Soft, flowing, mystical atmosphere",
            ArtStyle::Surreal => "Salvador Dali inspired, impossible geometry",
            ArtStyle::Nightmare => "Dark fantasy, gothic atmosphere",
            ArtStyle::Cosmic => "Celestial bodies, stardust, otherworldly",
            ArtStyle::Mystical => "Magical, enchanted, mystical elements",
            ArtStyle::Nostalgic => "Vintage, warm sepia tones, soft focus",
            ArtStyle::Vibrant => "Bold colors, dynamic energy, psychedelic elements",
        }
    }

    /// The visual vocabulary prepended to every image prompt in this style.
    pub fn prompt_base(self) -> &'static str {
        match self {
            ArtStyle::Ethereal => "ethereal dreamscape, soft flowing forms, gossamer textures, opalescent colors, mystical atmosphere",
            ArtStyle::Surreal => "surrealist masterpiece, impossible geometry, melting reality, vivid contrasts, Salvador Dali inspired",
            ArtStyle::Nightmare => "dark fantasy art, gothic atmosphere, shadowy forms, psychological horror elements, unsettling beauty",
            ArtStyle::Cosmic => "cosmic dreamscape, celestial bodies, nebulae, stardust, infinite space, otherworldly",
            ArtStyle::Mystical => "mystical dreamscape, magical elements, enchanted atmosphere, glowing particles, ancient symbols, spiritual energy",
            ArtStyle::Nostalgic => "nostalgic dreamscape, faded memories, vintage film aesthetic, warm sepia tones, soft focus",
            ArtStyle::Vibrant => "vibrant dream world, bold colors, dynamic energy, psychedelic elements, explosive creativity",
        }
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown art style '{0}'")]
pub struct UnknownArtStyle(pub String);

impl FromStr for ArtStyle {
    type Err = UnknownArtStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ArtStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| UnknownArtStyle(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

impl ImageQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Hd => "hd",
        }
    }

    /// Unknown or missing tiers fall back to `Standard`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("hd") => ImageQuality::Hd,
            _ => ImageQuality::Standard,
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the image-generation prompt for `dream_text` in `style`.
pub fn enhance_prompt(dream_text: &str, style: ArtStyle, has_character_references: bool) -> String {
    let mut enhanced = format!("{}. {}", style.prompt_base(), dream_text.trim());
    enhanced.push_str(". In the style of Magic: The Gathering card art, highly detailed fantasy illustration");
    if has_character_references {
        enhanced.push_str(". Include character based on provided reference with dreamlike alterations");
    }
    enhanced.push_str(". Masterpiece quality, trending on artstation, 8k resolution, photorealistic details");

    truncate_with_ellipsis(&enhanced, MAX_IMAGE_PROMPT_CHARS)
}

/// Cuts `text` to `max_chars` characters and appends `...` when anything was dropped.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
