//! crates/dream_journal_core/src/prompts.rs
//!
//! Follow-up journal prompt selection.
//!
//! Questions are grouped into topic categories. Given the prompts a user has
//! already answered, the selector works out which categories those touched and
//! suggests the opening question of up to three categories that have not been
//! explored yet. Categories are always visited in declaration order.

use std::collections::BTreeSet;
use std::fmt;

pub const MAX_FOLLOW_UP_PROMPTS: usize = 3;

/// Used when every category has been touched, to keep digging into symbolism.
pub const FALLBACK_CATEGORY: PromptCategory = PromptCategory::Symbols;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PromptCategory {
    Initial,
    Emotions,
    Characters,
    Environment,
    Symbols,
}

/// Keyword rules checked in order; the first rule with a matching keyword wins.
/// No rule maps to `Initial`, so it is only ever skipped through the fallback.
const CLASSIFICATION_RULES: [(&[&str], PromptCategory); 4] = [
    (&["feel", "emotion", "feeling"], PromptCategory::Emotions),
    (&["who", "character", "person"], PromptCategory::Characters),
    (&["where", "place", "setting"], PromptCategory::Environment),
    (&["symbol", "object", "important"], PromptCategory::Symbols),
];

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Initial,
        PromptCategory::Emotions,
        PromptCategory::Characters,
        PromptCategory::Environment,
        PromptCategory::Symbols,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptCategory::Initial => "initial",
            PromptCategory::Emotions => "emotions",
            PromptCategory::Characters => "characters",
            PromptCategory::Environment => "environment",
            PromptCategory::Symbols => "symbols",
        }
    }

    /// The candidate questions for this category, most important first.
    pub fn questions(self) -> &'static [&'static str] {
        match self {
            PromptCategory::Initial => &[
                "What was the first thing you remember from your dream?",
                "How were you feeling at the start of the dream?",
                "Where did the dream take place?",
            ],
            PromptCategory::Emotions => &[
                "What emotions did you experience most strongly?",
                "Did the emotional tone change during the dream?",
                "How did you feel when you woke up?",
            ],
            PromptCategory::Characters => &[
                "Who else was in your dream?",
                "How did you interact with other dream characters?",
                "Did anyone feel familiar or unfamiliar?",
            ],
            PromptCategory::Environment => &[
                "Describe the setting in more detail",
                "Did the environment change throughout the dream?",
                "What stood out most about the place?",
            ],
            PromptCategory::Symbols => &[
                "What objects or symbols seemed important?",
                "Did anything unusual or impossible happen?",
                "What felt most significant about the dream?",
            ],
        }
    }

    /// Case-insensitive keyword classification of an already asked prompt.
    pub fn classify(prompt_text: &str) -> Option<Self> {
        let lowered = prompt_text.to_lowercase();
        CLASSIFICATION_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|(_, category)| *category)
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories still worth asking about, in declaration order.
pub fn unasked_categories<S: AsRef<str>>(already_answered: &[S]) -> Vec<PromptCategory> {
    let asked: BTreeSet<PromptCategory> = already_answered
        .iter()
        .filter_map(|prompt| PromptCategory::classify(prompt.as_ref()))
        .collect();
    unasked_from(&asked)
}

/// The complement of `asked`, or the fallback category when nothing is left.
pub(crate) fn unasked_from(asked: &BTreeSet<PromptCategory>) -> Vec<PromptCategory> {
    let unasked: Vec<PromptCategory> = PromptCategory::ALL
        .into_iter()
        .filter(|category| !asked.contains(category))
        .collect();

    if unasked.is_empty() {
        vec![FALLBACK_CATEGORY]
    } else {
        unasked
    }
}

/// Picks up to three new follow-up questions, one per unexplored category.
pub fn select_follow_up_prompts<S: AsRef<str>>(already_answered: &[S]) -> Vec<&'static str> {
    unasked_categories(already_answered)
        .into_iter()
        .filter_map(|category| category.questions().first().copied())
        .take(MAX_FOLLOW_UP_PROMPTS)
        .collect()
}
