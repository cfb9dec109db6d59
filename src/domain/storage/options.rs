//! Caller-supplied output location

use serde::{Deserialize, Serialize};

use super::directory::Directory;

/// Where a recording should be written. Every field is optional. Options
/// naming neither a directory nor a path are not persisted; a path given
/// without a directory is anchored in [`Directory::Cache`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<Directory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RecordingOptions {
    pub fn in_directory(directory: Directory) -> Self {
        Self {
            directory: Some(directory),
            ..Default::default()
        }
    }

    pub fn with_sub_directory(mut self, sub_directory: impl Into<String>) -> Self {
        self.sub_directory = Some(sub_directory.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Fill unset fields from `fallback`; fields set here win.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            directory: self.directory.or(fallback.directory),
            sub_directory: self.sub_directory.or(fallback.sub_directory),
            path: self.path.or(fallback.path),
        }
    }

    /// True when the recording should be written to disk
    pub fn is_persistent(&self) -> bool {
        self.directory.is_some() || self.path.is_some()
    }

    /// Directory the output is anchored in
    pub fn anchor(&self) -> Directory {
        self.directory.unwrap_or(Directory::Cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_partial_shapes() {
        let opts: RecordingOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, RecordingOptions::default());

        let opts: RecordingOptions =
            serde_json::from_value(json!({ "directory": "CACHE", "subDirectory": "voice" })).unwrap();
        assert_eq!(opts.directory, Some(Directory::Cache));
        assert_eq!(opts.sub_directory.as_deref(), Some("voice"));
        assert!(opts.path.is_none());
    }

    #[test]
    fn serializes_camel_case_without_nulls() {
        let opts = RecordingOptions::in_directory(Directory::Documents)
            .with_sub_directory("memos")
            .with_path("a.flac");
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({ "directory": "DOCUMENTS", "subDirectory": "memos", "path": "a.flac" })
        );
    }

    #[test]
    fn or_prefers_own_fields() {
        let configured = RecordingOptions::in_directory(Directory::Data).with_sub_directory("default");
        let requested = RecordingOptions::default().with_path("x.flac");
        let merged = requested.or(configured);

        assert_eq!(merged.directory, Some(Directory::Data));
        assert_eq!(merged.sub_directory.as_deref(), Some("default"));
        assert_eq!(merged.path.as_deref(), Some("x.flac"));
        assert!(merged.is_persistent());
    }

    #[test]
    fn bare_path_is_anchored_in_cache() {
        let opts = RecordingOptions::default().with_path("note.flac");
        assert!(opts.is_persistent());
        assert_eq!(opts.anchor(), Directory::Cache);
        assert!(!RecordingOptions::default().with_sub_directory("x").is_persistent());
    }
}
