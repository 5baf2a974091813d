//! crates/dream_journal_core/src/pricing.rs
//!
//! Cost estimates for the paid AI operations, in USD.

use crate::styles::ImageQuality;

pub const TRANSCRIPTION_COST_PER_MINUTE: f64 = 0.006;
pub const ANALYSIS_INPUT_COST_PER_1K: f64 = 0.01;
pub const ANALYSIS_OUTPUT_COST_PER_1K: f64 = 0.03;
pub const IMAGE_STANDARD_COST: f64 = 0.040;
pub const IMAGE_HD_COST: f64 = 0.080;

pub fn transcription_cost(duration_seconds: f64) -> f64 {
    duration_seconds.max(0.0) / 60.0 * TRANSCRIPTION_COST_PER_MINUTE
}

pub fn analysis_cost(prompt_tokens: u32, completion_tokens: u32) -> f64 {
    (f64::from(prompt_tokens) * ANALYSIS_INPUT_COST_PER_1K
        + f64::from(completion_tokens) * ANALYSIS_OUTPUT_COST_PER_1K)
        / 1000.0
}

/// Square 1024px images only; that is the only size requested.
pub fn image_cost(quality: ImageQuality) -> f64 {
    match quality {
        ImageQuality::Standard => IMAGE_STANDARD_COST,
        ImageQuality::Hd => IMAGE_HD_COST,
    }
}
