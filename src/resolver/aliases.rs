//! Alternative search terms for names the index files under another label

use std::collections::HashMap;

use super::normalize::normalize;

/// Stripped parenthetical forms shorter than this are too vague to search
const MIN_STRIPPED_LEN: usize = 4;

/// Known equivalent search terms, keyed by normalized exercise name
const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("chest supported t bar row", &["T Bar Row", "Chest Supported Row"]),
    ("t bar row", &["T Bar Row"]),
    ("ez bar curl", &["EZ Bar Curl", "Barbell Curl"]),
    ("skull crusher", &["Lying Triceps Extension", "Skullcrusher"]),
    ("skull crushers", &["Lying Triceps Extension", "Skullcrusher"]),
    ("rdl", &["Romanian Deadlift"]),
    ("ohp", &["Overhead Press"]),
    ("military press", &["Overhead Press", "Barbell Overhead Press"]),
    ("pull up", &["Pull Ups"]),
    ("pullup", &["Pull Ups"]),
    ("chin up", &["Chin Ups"]),
    ("push up", &["Push Ups"]),
    ("pushup", &["Push Ups"]),
    ("hip thrust", &["Barbell Hip Thrust"]),
    ("face pull", &["Cable Face Pull"]),
    ("face pulls", &["Cable Face Pull"]),
    ("lat pulldown", &["Cable Lat Pulldown", "Pulldown"]),
    ("bulgarian split squat", &["Dumbbell Bulgarian Split Squat", "Split Squat"]),
    ("db bench press", &["Dumbbell Bench Press"]),
    ("db row", &["Dumbbell Row"]),
    ("seated cable row", &["Cable Seated Row", "Seated Row"]),
    ("good morning", &["Barbell Good Morning"]),
    ("hammer curl", &["Dumbbell Hammer Curl"]),
    ("preacher curl", &["Barbell Preacher Curl", "Dumbbell Preacher Curl"]),
    ("tricep pushdown", &["Cable Pushdown", "Triceps Pushdown"]),
    ("triceps pushdown", &["Cable Pushdown"]),
    ("rear delt fly", &["Dumbbell Rear Delt Fly", "Reverse Fly"]),
    ("pec deck", &["Machine Fly", "Pec Deck Fly"]),
    ("farmers walk", &["Farmers Carry", "Dumbbell Farmers Walk"]),
    ("leg curl", &["Lying Leg Curl", "Seated Leg Curl"]),
    ("calf raise", &["Standing Calf Raise", "Calf Raises"]),
    ("arnold press", &["Dumbbell Arnold Press"]),
    ("shrug", &["Barbell Shrug", "Dumbbell Shrug"]),
];

/// Alias lookup table, owned by the resolver
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Table with no aliases
    pub fn empty() -> Self {
        Self::default()
    }

    /// Curated aliases shipped with the crate
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (name, aliases) in BUILTIN_ALIASES {
            for alias in *aliases {
                table = table.with_alias(name, alias);
            }
        }
        table
    }

    /// Register an alias term for `name` (keyed by its normalized form)
    pub fn with_alias(mut self, name: &str, alias: &str) -> Self {
        let terms = self.entries.entry(normalize(name)).or_default();
        if !terms.iter().any(|t| t.eq_ignore_ascii_case(alias)) {
            terms.push(alias.to_string());
        }
        self
    }

    pub fn aliases_for(&self, raw_name: &str) -> &[String] {
        self.entries
            .get(&normalize(raw_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered, distinct search terms for `raw_name`, the raw name first
    pub fn expand(&self, raw_name: &str) -> Vec<String> {
        let raw = raw_name.trim();
        let mut terms: Vec<String> = Vec::new();
        let mut push = |term: &str| {
            let term = term.trim();
            if !term.is_empty() && !terms.iter().any(|t| t.eq_ignore_ascii_case(term)) {
                terms.push(term.to_string());
            }
        };

        push(raw);

        for alias in self.aliases_for(raw) {
            push(alias);
        }

        if let Some(stripped) = strip_parenthetical(raw) {
            if stripped.chars().count() >= MIN_STRIPPED_LEN {
                push(stripped);
            }
        }

        if raw.contains('-') {
            let spaced = raw.replace('-', " ");
            push(&spaced.split_whitespace().collect::<Vec<_>>().join(" "));
        }

        terms
    }
}

/// Text before the first `(`, if there is a parenthetical
fn strip_parenthetical(raw: &str) -> Option<&str> {
    raw.find('(').map(|idx| raw[..idx].trim())
}
