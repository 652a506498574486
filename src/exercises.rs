//! Exercise definitions - canonical records and the media attached to them

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Muscle groups used as the last-resort search key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Shoulders,
    Triceps,
    Back,
    Biceps,
    Forearms,
    Core,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Back => "back",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Core => "core",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Calves => "calves",
        }
    }

    /// Muscle names the lookup service indexes this group under, most specific first
    pub fn external_names(&self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Chest => &["Chest"],
            MuscleGroup::Shoulders => &["Shoulders", "Front Shoulders", "Rear Shoulders"],
            MuscleGroup::Triceps => &["Triceps"],
            MuscleGroup::Back => &["Lats", "Traps (mid-back)", "Lower back", "Traps"],
            MuscleGroup::Biceps => &["Biceps"],
            MuscleGroup::Forearms => &["Forearms"],
            MuscleGroup::Core => &["Abdominals", "Obliques"],
            MuscleGroup::Glutes => &["Glutes"],
            MuscleGroup::Quads => &["Quads"],
            MuscleGroup::Hamstrings => &["Hamstrings"],
            MuscleGroup::Calves => &["Calves"],
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Chest,
            MuscleGroup::Shoulders,
            MuscleGroup::Triceps,
            MuscleGroup::Back,
            MuscleGroup::Biceps,
            MuscleGroup::Forearms,
            MuscleGroup::Core,
            MuscleGroup::Glutes,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Calves,
        ]
    }
}

/// Identifier assigned by the lookup service (numeric or textual)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Int(id) => write!(f, "{}", id),
            ExternalId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Novice,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "novice" | "beginner" => Some(Difficulty::Novice),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" | "expert" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mechanic {
    Isolation,
    Compound,
}

impl Mechanic {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "isolation" => Some(Mechanic::Isolation),
            "compound" => Some(Mechanic::Compound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Force {
    Push,
    Pull,
    Static,
}

impl Force {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "push" => Some(Force::Push),
            "pull" => Some(Force::Pull),
            "static" | "hold" => Some(Force::Static),
            _ => None,
        }
    }
}

/// Camera angle of a media asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Front,
    Back,
    Side,
}

impl Angle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "front" => Some(Angle::Front),
            "back" | "rear" => Some(Angle::Back),
            "side" => Some(Angle::Side),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// One playable media asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaVariant {
    pub url: String,
    pub angle: Angle,
    pub gender: Gender,
}

/// Canonical resolved exercise. Immutable once built.
///
/// Deserialized records get the same media dedup as freshly built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct ExerciseRecord {
    pub id: Option<ExternalId>,
    pub name: String,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub mechanic: Option<Mechanic>,
    pub force: Option<Force>,
    /// First entry is the most salient muscle
    pub primary_muscles: Vec<String>,
    media: Vec<MediaVariant>,
    pub steps: Vec<String>,
}

impl ExerciseRecord {
    /// Build a record with no optional attributes set
    pub fn new(name: impl Into<String>, media: Vec<MediaVariant>) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: None,
            difficulty: None,
            mechanic: None,
            force: None,
            primary_muscles: Vec::new(),
            media: dedup_media(media),
            steps: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ExternalId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_primary_muscles(mut self, muscles: Vec<String>) -> Self {
        self.primary_muscles = muscles;
        self
    }

    pub fn media(&self) -> &[MediaVariant] {
        &self.media
    }

    /// Media for a given angle/gender, if the source provided it
    pub fn media_for(&self, angle: Angle, gender: Gender) -> Option<&MediaVariant> {
        self.media.iter().find(|m| m.angle == angle && m.gender == gender)
    }
}

/// Serialized shape of an `ExerciseRecord`
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<ExternalId>,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    mechanic: Option<Mechanic>,
    #[serde(default)]
    force: Option<Force>,
    #[serde(default)]
    primary_muscles: Vec<String>,
    #[serde(default)]
    media: Vec<MediaVariant>,
    #[serde(default)]
    steps: Vec<String>,
}

impl From<StoredRecord> for ExerciseRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            category: stored.category,
            difficulty: stored.difficulty,
            mechanic: stored.mechanic,
            force: stored.force,
            primary_muscles: stored.primary_muscles,
            media: dedup_media(stored.media),
            steps: stored.steps,
        }
    }
}

/// Drop empty URLs and keep only the first variant per (angle, gender)
pub fn dedup_media(variants: Vec<MediaVariant>) -> Vec<MediaVariant> {
    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| !v.url.trim().is_empty())
        .filter(|v| seen.insert((v.angle, v.gender)))
        .collect()
}

/// Search hit that carries an id but no media yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub id: ExternalId,
    pub name: String,
    pub category: Option<String>,
    pub primary_muscles: Vec<String>,
}

/// A search result, either complete or awaiting enrichment by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Partial(PartialRecord),
    Full(ExerciseRecord),
}

impl Candidate {
    pub fn name(&self) -> &str {
        match self {
            Candidate::Partial(p) => &p.name,
            Candidate::Full(r) => &r.name,
        }
    }
}

/// Anything the matcher can rank by display name
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for ExerciseRecord {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for Candidate {
    fn display_name(&self) -> &str {
        self.name()
    }
}
