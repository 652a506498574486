//! Candidate ranking for search results
//!
//! Two policies:
//! - strict: used after text search, falls back to the service's own top hit
//! - lenient: used after muscle-filtered search, returns nothing rather than
//!   an unrelated exercise

use crate::exercises::Named;

use super::normalize::{normalize, same_word, tokens};

/// Equipment and stance words that say nothing about the movement itself
pub const MODIFIER_TOKENS: &[&str] = &[
    "standing", "seated", "sitting", "incline", "decline", "flat", "barbell", "dumbbell",
    "dumbbells", "db", "cable", "machine", "smith", "kettlebell", "band", "banded", "ez", "bar",
    "single", "one", "arm", "alternating", "alternate", "kneeling", "lying", "bent", "over",
    "close", "wide", "grip", "neutral", "medium", "weighted", "bodyweight", "assisted", "with",
    "the", "a", "and", "on", "of", "to",
];

/// Movement-type words; sharing one signals the same kind of exercise
pub const MOVEMENT_TOKENS: &[&str] = &[
    "press", "row", "curl", "pulldown", "extension", "raise", "fly", "flye", "squat", "deadlift",
    "lunge", "pushdown", "pullover", "shrug", "crunch", "dip", "thrust", "bridge", "kickback",
    "pull", "push", "plank", "carry", "walk", "swing", "clean", "snatch", "jerk", "step",
];

/// Best candidate for a text-search query.
///
/// Exact, then candidate-starts-with-query, then query-starts-with-candidate,
/// then substring, then the first candidate.
pub fn strict<'a, T: Named>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    let query = normalize(query);
    let names: Vec<String> = candidates.iter().map(|c| normalize(c.display_name())).collect();

    let tiers: [&dyn Fn(&str) -> bool; 4] = [
        &|name: &str| name == query,
        &|name: &str| name.starts_with(&query),
        &|name: &str| !name.is_empty() && query.starts_with(name),
        &|name: &str| name.contains(&query),
    ];

    for tier in tiers {
        if let Some(idx) = names.iter().position(|n| tier(n.as_str())) {
            return candidates.get(idx);
        }
    }

    candidates.first()
}

/// Query words split into core and distinctive sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWords {
    /// Words left after removing modifiers
    pub core: Vec<String>,
    /// Core words that are not movement types
    pub distinctive: Vec<String>,
    /// Movement types present in the query
    pub movements: Vec<String>,
}

impl QueryWords {
    pub fn from_query(query: &str) -> Self {
        let core: Vec<String> = tokens(query)
            .into_iter()
            .filter(|w| !MODIFIER_TOKENS.contains(&w.as_str()))
            .collect();
        let (movements, distinctive): (Vec<String>, Vec<String>) = core
            .iter()
            .cloned()
            .partition(|w| MOVEMENT_TOKENS.contains(&w.as_str()));
        Self {
            core,
            distinctive,
            movements,
        }
    }
}

/// Best candidate for a muscle-filtered query, or none.
pub fn lenient<'a, T: Named>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    let normalized_query = normalize(query);
    let words = QueryWords::from_query(query);
    let names: Vec<String> = candidates.iter().map(|c| normalize(c.display_name())).collect();
    let name_words: Vec<Vec<String>> = candidates.iter().map(|c| tokens(c.display_name())).collect();

    // whole words only: "t" from "T-Bar" must not match inside "seated"
    let has_word = |idx: usize, word: &str| name_words[idx].iter().any(|t| same_word(t, word));

    // 1. exact
    if let Some(idx) = names.iter().position(|n| *n == normalized_query) {
        return candidates.get(idx);
    }

    // 2. every core word present
    if !words.core.is_empty() {
        if let Some(idx) = (0..candidates.len()).find(|&i| words.core.iter().all(|w| has_word(i, w.as_str()))) {
            return candidates.get(idx);
        }
    }

    // 3. shared movement type, anchored by a distinctive word when the query has one
    if !words.movements.is_empty() {
        if let Some(idx) = (0..candidates.len()).find(|&i| {
            let shares_movement = words.movements.iter().any(|m| has_word(i, m.as_str()));
            let anchored = words.distinctive.is_empty() || words.distinctive.iter().any(|w| has_word(i, w.as_str()));
            shares_movement && anchored
        }) {
            return candidates.get(idx);
        }
    }

    // 4. most distinctive-word hits, first wins ties
    let mut best: Option<(usize, usize)> = None;
    for idx in 0..candidates.len() {
        let hits = words.distinctive.iter().filter(|w| has_word(idx, w.as_str())).count();
        if hits >= 1 && best.is_none_or(|(_, top)| hits > top) {
            best = Some((idx, hits));
        }
    }
    if let Some((idx, _)) = best {
        return candidates.get(idx);
    }

    // 5. prefix/suffix either way
    if !normalized_query.is_empty() {
        if let Some(idx) = names.iter().position(|n| {
            !n.is_empty()
                && (normalized_query.starts_with(n.as_str())
                    || normalized_query.ends_with(n.as_str())
                    || n.starts_with(&normalized_query)
                    || n.ends_with(&normalized_query))
        }) {
            return candidates.get(idx);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::ExerciseRecord;

    fn records(names: &[&str]) -> Vec<ExerciseRecord> {
        names.iter().map(|n| ExerciseRecord::new(*n, vec![])).collect()
    }

    fn pick<'a>(found: Option<&'a ExerciseRecord>) -> Option<&'a str> {
        found.map(|r| r.name.as_str())
    }

    #[test]
    fn test_strict_exact_beats_earlier_prefix() {
        let c = records(&["Barbell Row Pause", "Barbell Row"]);
        assert_eq!(pick(strict("barbell-row", &c)), Some("Barbell Row"));
    }

    #[test]
    fn test_strict_priority_order() {
        let c = records(&["Incline Cable Row", "Row", "Cable Row Wide"]);
        // candidate starts with query
        assert_eq!(pick(strict("Cable Row", &c)), Some("Cable Row Wide"));

        let c = records(&["Incline Cable Row", "Cable Row"]);
        // query starts with candidate
        assert_eq!(pick(strict("Cable Row Wide", &c)), Some("Cable Row"));

        let c = records(&["Pause Squat", "Incline Cable Row"]);
        // substring
        assert_eq!(pick(strict("Cable Row", &c)), Some("Incline Cable Row"));
    }

    #[test]
    fn test_strict_defaults_to_first() {
        let c = records(&["Goblet Squat", "Hack Squat"]);
        assert_eq!(pick(strict("Zercher Squat", &c)), Some("Goblet Squat"));
        assert!(strict::<ExerciseRecord>("anything", &[]).is_none());
    }

    #[test]
    fn test_query_words_split() {
        let words = QueryWords::from_query("Standing Single-Arm Cable Zercher Squat");
        assert_eq!(words.core, vec!["zercher", "squat"]);
        assert_eq!(words.distinctive, vec!["zercher"]);
        assert_eq!(words.movements, vec!["squat"]);
    }

    #[test]
    fn test_lenient_rejects_unrelated() {
        let c = records(&["Goblet Squat", "Hack Squat", "Front Squat"]);
        assert_eq!(pick(lenient("Zercher Squat", &c)), None);
        // strict would have taken the first hit
        assert_eq!(pick(strict("Zercher Squat", &c)), Some("Goblet Squat"));
    }

    #[test]
    fn test_lenient_exact_and_all_core_words() {
        let c = records(&["Hack Squat", "Front Squat"]);
        assert_eq!(pick(lenient("front squat", &c)), Some("Front Squat"));

        let c = records(&["Dumbbell Lateral Raise", "Cable Lateral Raise Hold"]);
        assert_eq!(pick(lenient("Seated Lateral Raise", &c)), Some("Dumbbell Lateral Raise"));
    }

    #[test]
    fn test_lenient_movement_only_query() {
        let c = records(&["Pendlay Press", "Seal Row", "Kroc Row"]);
        // "barbell row": core = [row], no distinctive words
        assert_eq!(pick(lenient("Barbell Row", &c)), Some("Seal Row"));
    }

    #[test]
    fn test_lenient_movement_anchored_by_distinctive() {
        let c = records(&["Pendlay Row", "Chest Supported Row", "Chest Fly"]);
        assert_eq!(pick(lenient("Chest-Supported T-Bar Row", &c)), Some("Chest Supported Row"));
    }

    #[test]
    fn test_lenient_highest_hit_count() {
        let c = records(&["Reverse Nordic", "Nordic Hamstring Curl"]);
        // no shared movement; "nordic" and "hamstring" both distinctive
        assert_eq!(pick(lenient("Nordic Hamstring", &c)), Some("Nordic Hamstring Curl"));
    }

    #[test]
    fn test_lenient_ties_broken_by_order() {
        let c = records(&["Sissy Squat", "Sissy Machine"]);
        assert_eq!(pick(lenient("Sissy Lunge Hold", &c)), Some("Sissy Squat"));
    }

    #[test]
    fn test_lenient_prefix_suffix() {
        // no core-word overlap, only the prefix rule applies
        let c = records(&["Plank Jack", "Bar"]);
        assert_eq!(pick(lenient("Bar Hang Over", &c)), Some("Bar"));
    }

    #[test]
    fn test_lenient_single_letter_words_need_whole_word() {
        let c = records(&["Seated Cable Row", "Straight Arm Pulldown"]);
        assert_eq!(pick(lenient("T-Bar Row", &c)), None);

        let c = records(&["Seated Cable Row", "T Bar Row"]);
        assert_eq!(pick(lenient("T-Bar Row", &c)), Some("T Bar Row"));
    }

    #[test]
    fn test_lenient_plural_names() {
        let c = records(&["Hack Squat", "Walking Lunges"]);
        assert_eq!(pick(lenient("Walking Lunge", &c)), Some("Walking Lunges"));
    }

    #[test]
    fn test_lenient_empty_candidates() {
        assert!(lenient::<ExerciseRecord>("Front Squat", &[]).is_none());
    }
}
