//! Sex coding used by the partitioner.

use std::fmt;

/// Tokens that mark a covariate row as male or female.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexCodes {
    pub male: String,
    pub female: String,
}

impl Default for SexCodes {
    fn default() -> Self {
        Self {
            male: "1".to_string(),
            female: "2".to_string(),
        }
    }
}

impl SexCodes {
    pub fn new(male: impl Into<String>, female: impl Into<String>) -> Self {
        Self {
            male: male.into().trim().to_string(),
            female: female.into().trim().to_string(),
        }
    }

    /// Classifies a raw sex value. Values are compared after trimming;
    /// blank or missing values are always unknown.
    pub fn classify(&self, value: Option<&str>) -> SexGroup {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return SexGroup::Unknown;
        };
        if value == self.male {
            SexGroup::Male
        } else if value == self.female {
            SexGroup::Female
        } else {
            SexGroup::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SexGroup {
    Male,
    Female,
    Unknown,
}

impl SexGroup {
    pub const ALL: [SexGroup; 3] = [SexGroup::Male, SexGroup::Female, SexGroup::Unknown];

    /// Name of the per-group output subdirectory.
    pub fn dir_name(self) -> &'static str {
        match self {
            SexGroup::Male => "data_male",
            SexGroup::Female => "data_female",
            SexGroup::Unknown => "data_unknown",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SexGroup::Male => "male",
            SexGroup::Female => "female",
            SexGroup::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SexGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
