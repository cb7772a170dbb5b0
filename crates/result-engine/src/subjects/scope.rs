use serde::{Deserialize, Serialize};

/// Which subjects a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectScope {
    All,
    Only(Vec<String>),
}

impl SubjectScope {
    pub fn only<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    /// Exact name match, the same key the aggregator upserts by.
    pub fn includes(&self, subject_name: &str) -> bool {
        match self {
            SubjectScope::All => true,
            SubjectScope::Only(names) => names.iter().any(|name| name == subject_name),
        }
    }
}

/// A faculty member and the subjects assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyScope {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub scope: SubjectScope,
}

impl FacultyScope {
    pub fn is_head_of_department(&self) -> bool {
        self.scope == SubjectScope::All
    }
}
