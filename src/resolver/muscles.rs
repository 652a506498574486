//! Primary muscle inference from exercise names

use crate::exercises::MuscleGroup;

use super::normalize::{is_plural_of, normalize};

/// Keyword rules, checked in order; more specific phrases come first
const MUSCLE_KEYWORDS: &[(&str, MuscleGroup)] = &[
    // legs
    ("leg curl", MuscleGroup::Hamstrings),
    ("nordic", MuscleGroup::Hamstrings),
    ("hamstring", MuscleGroup::Hamstrings),
    ("romanian", MuscleGroup::Hamstrings),
    ("rdl", MuscleGroup::Hamstrings),
    ("stiff leg", MuscleGroup::Hamstrings),
    ("good morning", MuscleGroup::Hamstrings),
    ("leg extension", MuscleGroup::Quads),
    ("leg press", MuscleGroup::Quads),
    ("squat", MuscleGroup::Quads),
    ("lunge", MuscleGroup::Quads),
    ("step up", MuscleGroup::Quads),
    ("quad", MuscleGroup::Quads),
    ("calf", MuscleGroup::Calves),
    ("calves", MuscleGroup::Calves),
    ("hip thrust", MuscleGroup::Glutes),
    ("glute", MuscleGroup::Glutes),
    ("bridge", MuscleGroup::Glutes),
    ("abduction", MuscleGroup::Glutes),
    // arms
    ("tricep", MuscleGroup::Triceps),
    ("skull crusher", MuscleGroup::Triceps),
    ("skullcrusher", MuscleGroup::Triceps),
    ("pushdown", MuscleGroup::Triceps),
    ("close grip bench", MuscleGroup::Triceps),
    ("dip", MuscleGroup::Triceps),
    ("kickback", MuscleGroup::Glutes),
    ("wrist", MuscleGroup::Forearms),
    ("forearm", MuscleGroup::Forearms),
    ("farmer", MuscleGroup::Forearms),
    ("curl", MuscleGroup::Biceps),
    ("bicep", MuscleGroup::Biceps),
    // torso
    ("deadlift", MuscleGroup::Back),
    ("pulldown", MuscleGroup::Back),
    ("pull up", MuscleGroup::Back),
    ("pullup", MuscleGroup::Back),
    ("chin up", MuscleGroup::Back),
    ("row", MuscleGroup::Back),
    ("shrug", MuscleGroup::Back),
    ("lat", MuscleGroup::Back),
    ("back extension", MuscleGroup::Back),
    ("face pull", MuscleGroup::Shoulders),
    ("lateral raise", MuscleGroup::Shoulders),
    ("front raise", MuscleGroup::Shoulders),
    ("rear delt", MuscleGroup::Shoulders),
    ("overhead press", MuscleGroup::Shoulders),
    ("shoulder", MuscleGroup::Shoulders),
    ("military", MuscleGroup::Shoulders),
    ("arnold", MuscleGroup::Shoulders),
    ("ohp", MuscleGroup::Shoulders),
    ("bench", MuscleGroup::Chest),
    ("chest", MuscleGroup::Chest),
    ("pec", MuscleGroup::Chest),
    ("fly", MuscleGroup::Chest),
    ("push up", MuscleGroup::Chest),
    ("pushup", MuscleGroup::Chest),
    ("crunch", MuscleGroup::Core),
    ("plank", MuscleGroup::Core),
    ("sit up", MuscleGroup::Core),
    ("situp", MuscleGroup::Core),
    ("leg raise", MuscleGroup::Core),
    ("russian twist", MuscleGroup::Core),
    ("ab", MuscleGroup::Core),
    ("oblique", MuscleGroup::Core),
];

/// Derives a probable primary muscle group from an exercise name
#[derive(Debug, Clone, Copy, Default)]
pub struct MuscleGroupMapper;

impl MuscleGroupMapper {
    pub fn new() -> Self {
        Self
    }

    /// Muscle group for the first matching keyword rule.
    ///
    /// Single-word keywords must match a whole word ("ab" does not match
    /// "cable"); multi-word phrases match as substrings of the normalized name.
    pub fn infer_primary_muscle(&self, exercise_name: &str) -> Option<MuscleGroup> {
        let normalized = normalize(exercise_name);
        let words: Vec<&str> = normalized.split(' ').collect();

        MUSCLE_KEYWORDS
            .iter()
            .find(|(keyword, _)| {
                if keyword.contains(' ') {
                    normalized.contains(keyword)
                } else {
                    words.iter().any(|w| w == keyword || is_plural_of(w, keyword))
                }
            })
            .map(|(_, group)| *group)
    }

    /// External muscle names to search, in order
    pub fn external_names(&self, group: MuscleGroup) -> &'static [&'static str] {
        group.external_names()
    }
}
