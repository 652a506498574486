//! Ordered fallback chain of search strategies

use std::fmt;

use tracing::debug;

use super::aliases::AliasTable;
use super::lookup::GatedLookup;
use super::matcher;
use super::muscles::MuscleGroupMapper;
use crate::error::LookupError;
use crate::exercises::{Candidate, MuscleGroup};

/// Result size requested from each search endpoint
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub text: usize,
    pub muscle: usize,
}

/// Outcome of running one strategy
#[derive(Debug)]
pub enum Attempt {
    Hit(Candidate),
    /// Clean answer with nothing usable in it
    Miss,
    /// Transport failure; the chain moves on
    Failed(LookupError),
}

/// One way of finding a record for a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Text search for one expanded term, ranked strictly
    TextSearch { term: String },
    /// Muscle-filtered search ranked leniently against the raw name.
    /// External muscle names are tried in order until one returns results.
    MuscleSearch {
        query: String,
        group: MuscleGroup,
        muscles: Vec<String>,
    },
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::TextSearch { term } => write!(f, "text:{}", term),
            Strategy::MuscleSearch { group, .. } => write!(f, "muscle:{}", group.name()),
        }
    }
}

impl Strategy {
    pub async fn run(&self, lookup: &GatedLookup, limits: SearchLimits) -> Attempt {
        match self {
            Strategy::TextSearch { term } => match lookup.search_by_text(term, limits.text).await {
                Ok(candidates) => match matcher::strict(term, &candidates) {
                    Some(found) => Attempt::Hit(found.clone()),
                    None => Attempt::Miss,
                },
                Err(e) => Attempt::Failed(e),
            },
            Strategy::MuscleSearch { query, muscles, .. } => {
                let mut answered = false;
                let mut last_error = None;

                for muscle in muscles {
                    match lookup.search_by_muscle(muscle, limits.muscle).await {
                        Ok(candidates) if candidates.is_empty() => {
                            answered = true;
                            debug!(muscle = %muscle, "No exercises listed for muscle");
                        }
                        Ok(candidates) => {
                            return match matcher::lenient(query, &candidates) {
                                Some(found) => Attempt::Hit(found.clone()),
                                None => {
                                    debug!(
                                        muscle = %muscle,
                                        candidates = candidates.len(),
                                        "No name overlap in muscle results"
                                    );
                                    Attempt::Miss
                                }
                            };
                        }
                        Err(e) => last_error = Some(e),
                    }
                }

                match last_error {
                    Some(e) if !answered => Attempt::Failed(e),
                    _ => Attempt::Miss,
                }
            }
        }
    }
}

/// Strategies for `raw_name`: each expanded term, then the muscle fallback
pub fn plan(raw_name: &str, aliases: &AliasTable, mapper: &MuscleGroupMapper) -> Vec<Strategy> {
    let mut chain: Vec<Strategy> = aliases
        .expand(raw_name)
        .into_iter()
        .map(|term| Strategy::TextSearch { term })
        .collect();

    if let Some(group) = mapper.infer_primary_muscle(raw_name) {
        chain.push(Strategy::MuscleSearch {
            query: raw_name.trim().to_string(),
            group,
            muscles: mapper
                .external_names(group)
                .iter()
                .map(|m| m.to_string())
                .collect(),
        });
    }

    chain
}
