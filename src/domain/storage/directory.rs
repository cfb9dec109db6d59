//! Filesystem location anchors for recording output

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DirectoryParseError;

/// Well-known directory a recording can be written under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directory {
    Documents,
    Data,
    Library,
    Cache,
    External,
    ExternalStorage,
    ExternalCache,
    LibraryNoCloud,
    Temporary,
}

impl Directory {
    pub const ALL: [Directory; 9] = [
        Self::Documents,
        Self::Data,
        Self::Library,
        Self::Cache,
        Self::External,
        Self::ExternalStorage,
        Self::ExternalCache,
        Self::LibraryNoCloud,
        Self::Temporary,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "DOCUMENTS",
            Self::Data => "DATA",
            Self::Library => "LIBRARY",
            Self::Cache => "CACHE",
            Self::External => "EXTERNAL",
            Self::ExternalStorage => "EXTERNAL_STORAGE",
            Self::ExternalCache => "EXTERNAL_CACHE",
            Self::LibraryNoCloud => "LIBRARY_NO_CLOUD",
            Self::Temporary => "TEMPORARY",
        }
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directory {
    type Err = DirectoryParseError;

    /// Case-insensitive; `-` and `_` are interchangeable ("external-cache").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str() == normalized)
            .ok_or_else(|| DirectoryParseError {
                input: s.to_string(),
            })
    }
}
