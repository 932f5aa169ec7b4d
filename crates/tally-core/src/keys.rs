use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized owner identifier.
///
/// Two owners are the same tenant iff their trimmed, lowercased forms are
/// equal. Normalization happens once, at construction, so equality and
/// hashing elsewhere stay plain string comparisons.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Normalize a raw owner string. Blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a raw stored value refers to this owner. Stored rows may
    /// carry padding or mixed case from before normalization existed.
    pub fn matches_raw(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trimmed student name. Casing is preserved: the stored name is the
/// storage key, while display grouping and roster duplicate checks use the
/// case-insensitive [`StudentName::folded`] form.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentName(String);

impl StudentName {
    /// Trim a raw student name. Blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive form for display grouping and roster dedup.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composite key addressing one student's live counter.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CounterKey {
    pub owner: OwnerId,
    pub student: StudentName,
}

impl CounterKey {
    pub fn new(owner: OwnerId, student: StudentName) -> Self {
        Self { owner, student }
    }
}
