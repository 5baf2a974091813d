//! crates/dream_journal_core/src/statistics.rs
//!
//! Summary statistics over a user's dream journal.

use std::collections::HashMap;

use crate::domain::{DateRange, DreamEntry};

/// How many labels each "most common" list holds.
pub const TOP_LABELS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub total_dreams: usize,
    pub average_lucidity: f64,
    pub average_vividness: f64,
    pub most_common_themes: Vec<LabelCount>,
    pub most_common_emotions: Vec<LabelCount>,
    pub most_common_symbols: Vec<LabelCount>,
    pub dreams_with_images: usize,
    pub date_range: DateRange,
}

/// Aggregates the entries that fall inside `range`; the rest are ignored.
pub fn compute_statistics(entries: &[DreamEntry], range: &DateRange) -> StatisticsReport {
    let filtered: Vec<&DreamEntry> = entries
        .iter()
        .filter(|entry| range.contains(entry.entry_date))
        .collect();

    let total_dreams = filtered.len();
    let lucidity_sum: u64 = filtered
        .iter()
        .map(|entry| u64::from(entry.lucidity_level.get()))
        .sum();
    let vividness_sum: u64 = filtered
        .iter()
        .map(|entry| u64::from(entry.vividness_level.get()))
        .sum();

    StatisticsReport {
        total_dreams,
        average_lucidity: average(lucidity_sum, total_dreams),
        average_vividness: average(vividness_sum, total_dreams),
        most_common_themes: most_common(filtered.iter().flat_map(|e| e.themes.iter()), TOP_LABELS),
        most_common_emotions: most_common(filtered.iter().flat_map(|e| e.emotions.iter()), TOP_LABELS),
        most_common_symbols: most_common(filtered.iter().flat_map(|e| e.symbols.iter()), TOP_LABELS),
        dreams_with_images: filtered.iter().filter(|entry| entry.has_image()).count(),
        date_range: *range,
    }
}

fn average(sum: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round2(sum as f64 / count as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Counts labels and keeps the `limit` most frequent. Equal counts keep the
/// order in which each label was first seen.
pub fn most_common<'a, I>(labels: I, limit: usize) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for label in labels {
        match positions.get(label.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(label.as_str(), counts.len());
                counts.push(LabelCount {
                    label: label.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
