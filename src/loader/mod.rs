//! Dataset loading.
//!
//! Reads dispatch records from a JSON export file, or from a directory of
//! exports (the dispatch system writes one file per export; offline
//! submissions land in a separate file that is merged here). Files are
//! merged in path order; a duplicate id keeps its first occurrence.

use crate::models::IncidentRecord;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors raised while acquiring the record set.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no .json files found under {0}")]
    EmptyDirectory(PathBuf),
}

/// Load all records from a file or directory dataset.
///
/// Directory datasets merge every `.json` file found below the path, in
/// sorted path order. Duplicate ids are skipped with a warning so the
/// loaded collection upholds the id-uniqueness invariant. Fatality counts
/// exceeding the victim count are clamped rather than rejected.
pub fn load_records(path: &Path) -> Result<Vec<IncidentRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let files = if path.is_dir() {
        json_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut records: Vec<IncidentRecord> = Vec::new();
    let mut seen_ids: HashSet<u64> = HashSet::new();

    for file in files {
        let batch = load_file(&file)?;
        debug!("loaded {} records from {}", batch.len(), file.display());

        for mut record in batch {
            if !seen_ids.insert(record.id) {
                warn!(
                    "duplicate record id {} in {}, keeping the first occurrence",
                    record.id,
                    file.display()
                );
                continue;
            }
            normalize(&mut record);
            records.push(record);
        }
    }

    Ok(records)
}

/// All `.json` files below a directory, sorted by path.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry)
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "json") =>
            {
                Some(entry.into_path())
            }
            Ok(_) => None,
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .collect();

    files.sort();

    if files.is_empty() {
        return Err(DatasetError::EmptyDirectory(dir.to_path_buf()));
    }

    Ok(files)
}

fn load_file(path: &Path) -> Result<Vec<IncidentRecord>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Enforce the record invariants a sloppy export can break.
fn normalize(record: &mut IncidentRecord) {
    if record.fatal_victims > record.victims {
        warn!(
            "record {}: vitimasFatais {} exceeds vitimas {}, clamping",
            record.id, record.fatal_victims, record.victims
        );
        record.fatal_victims = record.victims;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record_json(id: u64) -> String {
        format!(
            r#"{{
                "id": {id},
                "tipo": "Incêndio",
                "dataHora": "2026-08-01T10:00:00Z",
                "status": "Finalizado"
            }}"#
        )
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        fs::write(&path, format!("[{}, {}]", record_json(1), record_json(2))).unwrap();

        let records = load_records(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn test_load_directory_merges_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), format!("[{}]", record_json(2))).unwrap();
        fs::write(dir.path().join("a.json"), format!("[{}]", record_json(1))).unwrap();

        let records = load_records(dir.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            format!("[{}, {}]", record_json(1), record_json(1)),
        )
        .unwrap();

        let records = load_records(dir.path()).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_fatal_victims_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.json");
        fs::write(
            &path,
            r#"[{
                "id": 1,
                "tipo": "Acidente",
                "dataHora": "2026-08-01T10:00:00Z",
                "status": "Finalizado",
                "vitimas": 2,
                "vitimasFatais": 5
            }]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();

        assert_eq!(records[0].fatal_victims, 2);
    }

    #[test]
    fn test_missing_path() {
        let err = load_records(Path::new("/nonexistent/incidents.json")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn test_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDirectory(_)));
    }
}
