use super::domain::SubjectAggregate;
use serde::Serialize;
use std::sync::RwLock;

/// Where an upserted aggregate landed in iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted { position: usize },
    Replaced { position: usize },
}

/// Storage abstraction for the subject map so hosts can choose how long it lives.
///
/// `upsert` must replace a record atomically with respect to `all`.
pub trait SubjectStore: Send + Sync {
    fn upsert(&self, aggregate: SubjectAggregate) -> Result<UpsertOutcome, StoreError>;
    fn all(&self) -> Result<Vec<SubjectAggregate>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("subject store unavailable: {0}")]
    Unavailable(String),
}

/// Insertion-ordered subject list behind a single reader/writer lock.
#[derive(Debug, Default)]
pub struct InMemorySubjectStore {
    subjects: RwLock<Vec<SubjectAggregate>>,
}

impl InMemorySubjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed aggregates, collapsing duplicate names the way `upsert` does.
    pub fn seeded<I>(seed: I) -> Self
    where
        I: IntoIterator<Item = SubjectAggregate>,
    {
        let mut subjects = Vec::new();
        for aggregate in seed {
            upsert_in_place(&mut subjects, aggregate);
        }
        Self {
            subjects: RwLock::new(subjects),
        }
    }
}

fn upsert_in_place(
    subjects: &mut Vec<SubjectAggregate>,
    aggregate: SubjectAggregate,
) -> UpsertOutcome {
    match subjects
        .iter()
        .position(|existing| existing.name == aggregate.name)
    {
        Some(position) => {
            subjects[position] = aggregate;
            UpsertOutcome::Replaced { position }
        }
        None => {
            subjects.push(aggregate);
            UpsertOutcome::Inserted {
                position: subjects.len() - 1,
            }
        }
    }
}

impl SubjectStore for InMemorySubjectStore {
    fn upsert(&self, aggregate: SubjectAggregate) -> Result<UpsertOutcome, StoreError> {
        let mut guard = self
            .subjects
            .write()
            .map_err(|_| StoreError::Unavailable("subject lock poisoned".to_string()))?;
        Ok(upsert_in_place(&mut guard, aggregate))
    }

    fn all(&self) -> Result<Vec<SubjectAggregate>, StoreError> {
        let guard = self
            .subjects
            .read()
            .map_err(|_| StoreError::Unavailable("subject lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}
