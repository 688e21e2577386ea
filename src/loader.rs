//! This module provides the `AutomatonLoader` struct, responsible for loading automaton
//! definitions from JSON files, strings and directories.

use crate::types::AutomatonError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// `AutomatonLoader` loads any model that deserializes from its plain-data definition,
/// such as [`crate::Nfa`], [`crate::Dfa`] or [`crate::TuringMachine`]. Definitions are
/// analyzed while they are deserialized, so every loaded model is valid.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads a single model from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` if the file is read and holds a valid definition.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::Json)` if the content is not a valid definition.
    pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_from_string(&content)
    }

    /// Loads a single model from JSON text.
    ///
    /// # Arguments
    ///
    /// * `content` - A string slice containing the JSON definition.
    pub fn load_from_string<T: DeserializeOwned>(content: &str) -> Result<T, AutomatonError> {
        let model = serde_json::from_str(content)?;
        Ok(model)
    }

    /// Loads every `.json` file in `directory`, in file name order.
    ///
    /// Subdirectories and other files are skipped. Each element of the result is either the
    /// loaded model with its path or the error that file produced.
    pub fn load_all<T: DeserializeOwned>(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, T), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(AutomatonError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));
        paths.sort();
        tracing::debug!(directory = %directory.display(), files = paths.len(), "loading definitions");

        results.extend(paths.into_iter().map(|path| match Self::load(&path) {
            Ok(model) => Ok((path, model)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping invalid definition");
                Err(e)
            }
        }));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::Dfa;
    use crate::nfa::Nfa;
    use crate::turing::TuringMachine;
    use crate::types::{RunConfig, TmVerdict, Verdict};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const ODD_AS: &str = r#"{
        "states": ["even", "odd"],
        "alphabet": ["a"],
        "transitions": [
            {"from": "even", "symbol": "a", "to": "odd"},
            {"from": "odd", "symbol": "a", "to": "even"}
        ],
        "start": "even",
        "accept": ["odd"]
    }"#;

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("odd.json");
        write_file(&file_path, ODD_AS);

        let dfa: Dfa = AutomatonLoader::load(&file_path).unwrap();
        assert_eq!(dfa.start(), Some("even"));
        assert_eq!(dfa.run("aaa"), Ok(Verdict::Accept));

        let nfa: Nfa = AutomatonLoader::load(&file_path).unwrap();
        assert_eq!(nfa.run("aa"), Ok(Verdict::Reject));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = AutomatonLoader::load::<Nfa>(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_malformed_json() {
        let result = AutomatonLoader::load_from_string::<Nfa>("{ not json");
        assert!(matches!(result, Err(AutomatonError::Json(_))));
    }

    #[test]
    fn test_load_invalid_definition() {
        let content = ODD_AS.replace(r#""start": "even""#, r#""start": "nowhere""#);
        match AutomatonLoader::load_from_string::<Dfa>(&content) {
            Err(AutomatonError::Json(message)) => assert!(message.contains("nowhere")),
            other => panic!("Expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_turing_machine() {
        let content = r#"{
            "states": ["q0", "done"],
            "input_alphabet": ["1"],
            "blank": "_",
            "rules": [
                {"from": "q0", "read": "1", "to": "q0", "write": "1", "direction": "Right"},
                {"from": "q0", "read": "_", "to": "done", "write": "1", "direction": "Stay"}
            ],
            "start": "q0",
            "accept": ["done"]
        }"#;

        let tm: TuringMachine = AutomatonLoader::load_from_string(content).unwrap();
        let outcome = tm.run("11", &RunConfig::default()).unwrap();
        assert_eq!(outcome.verdict, TmVerdict::Accepted);
        assert_eq!(outcome.tape_string(), "111");
    }

    #[test]
    fn test_load_all_from_directory() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("b_valid.json"), ODD_AS);
        write_file(&dir.path().join("a_invalid.json"), "This is not JSON");
        write_file(&dir.path().join("ignored.txt"), ODD_AS);
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let results = AutomatonLoader::load_all::<Dfa>(dir.path());
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());

        let (path, dfa) = results[1].as_ref().unwrap();
        assert!(path.ends_with("b_valid.json"));
        assert_eq!(dfa.states().len(), 2);
    }

    #[test]
    fn test_load_all_missing_directory() {
        let dir = tempdir().unwrap();
        let results = AutomatonLoader::load_all::<Nfa>(&dir.path().join("missing"));
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(AutomatonError::FileError(_))));
    }
}
