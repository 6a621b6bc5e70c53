//! Record sets read from JSON files.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use a1_search::{Record, RecordSource, SearchError};

/// A [`RecordSource`] backed by a JSON file holding an array of objects.
///
/// The path `-` reads standard input.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading `path`; `-` means standard input.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    /// The path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<String> {
        if self.path == Path::new("-") {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        } else {
            fs::read_to_string(&self.path)
        }
    }
}

impl RecordSource for JsonFileSource {
    fn fetch(&self) -> a1_search::Result<Vec<Record>> {
        let shown = self.path.display();
        let text = self
            .read()
            .map_err(|e| SearchError::Source(format!("cannot read {shown}: {e}")))?;
        let records: Vec<Record> = serde_json::from_str(&text).map_err(|e| {
            SearchError::Source(format!("{shown} is not a JSON array of objects: {e}"))
        })?;
        tracing::debug!(path = %shown, count = records.len(), "loaded records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_array_of_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "name": "LeBron James"}}, {{"id": 2}}]"#).unwrap();
        let records = JsonFileSource::new(file.path()).fetch().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name").as_str(), Some("LeBron James"));
    }

    #[test]
    fn rejects_non_arrays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 1}}"#).unwrap();
        let err = JsonFileSource::new(file.path()).fetch().unwrap_err();
        assert!(err.to_string().contains("not a JSON array of objects"));
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let source = JsonFileSource::new("/nonexistent/records.json");
        assert!(matches!(source.fetch(), Err(SearchError::Source(_))));
    }
}
