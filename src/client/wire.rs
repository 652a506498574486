//! JSON payloads returned by the lookup service

use serde::Deserialize;
use tracing::debug;

use crate::exercises::{
    Angle, Candidate, Difficulty, ExerciseRecord, ExternalId, Force, Gender, Mechanic,
    MediaVariant, PartialRecord,
};

/// List endpoints return either a bare array or `{ "results": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { results } => results,
        }
    }
}

/// Metadata entries are plain strings or objects with a `name`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NamedItem {
    Plain(String),
    Object { name: String },
}

impl NamedItem {
    pub fn into_name(self) -> String {
        match self {
            NamedItem::Plain(name) => name,
            NamedItem::Object { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireVideo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub angle: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireExercise {
    #[serde(default)]
    pub id: Option<ExternalId>,
    pub name: String,
    #[serde(default)]
    pub category: Option<NamedItem>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub mechanic: Option<String>,
    #[serde(default)]
    pub force: Option<String>,
    #[serde(default, alias = "muscles", alias = "primaryMuscles")]
    pub primary_muscles: Vec<NamedItem>,
    #[serde(default, alias = "correct_steps", alias = "instructions")]
    pub steps: Vec<String>,
    #[serde(default, alias = "media")]
    pub videos: Option<Vec<WireVideo>>,
}

impl WireExercise {
    fn media(videos: Vec<WireVideo>) -> Vec<MediaVariant> {
        videos
            .into_iter()
            .filter_map(|v| {
                let angle = v.angle.as_deref().and_then(Angle::parse);
                let gender = v.gender.as_deref().and_then(Gender::parse);
                match (angle, gender) {
                    (Some(angle), Some(gender)) => Some(MediaVariant {
                        url: v.url,
                        angle,
                        gender,
                    }),
                    _ => {
                        debug!(url = %v.url, "Skipping media variant with unknown angle/gender");
                        None
                    }
                }
            })
            .collect()
    }

    /// Full record; missing media decodes as an empty set
    pub fn into_record(self) -> ExerciseRecord {
        let mut record = ExerciseRecord::new(self.name, Self::media(self.videos.unwrap_or_default()));
        record.id = self.id;
        record.category = self.category.map(NamedItem::into_name);
        record.difficulty = self.difficulty.as_deref().and_then(Difficulty::parse);
        record.mechanic = self.mechanic.as_deref().and_then(Mechanic::parse);
        record.force = self.force.as_deref().and_then(Force::parse);
        record.primary_muscles = self.primary_muscles.into_iter().map(NamedItem::into_name).collect();
        record.steps = self.steps;
        record
    }

    /// Search hit: full when it carries usable media, partial when it can be
    /// fetched by id, dropped otherwise
    pub fn into_candidate(self) -> Option<Candidate> {
        let record = self.into_record();
        if !record.media().is_empty() {
            return Some(Candidate::Full(record));
        }

        match record.id {
            Some(id) => Some(Candidate::Partial(PartialRecord {
                id,
                name: record.name,
                category: record.category,
                primary_muscles: record.primary_muscles,
            })),
            None => {
                debug!(name = %record.name, "Dropping search hit without media or id");
                None
            }
        }
    }
}
