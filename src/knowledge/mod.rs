//! Knowledge-Base Index
//!
//! Static, name-keyed catalogs of UI components (`components.json`) and
//! utility functions (`utils.json`). Each file is a JSON object whose keys are
//! entry names; entries keep the file's order.
//!
//! Loading never fails: a missing or malformed file is logged and yields an
//! empty index, so AI-backed tools degrade to "no matches".

mod entries;

pub use entries::{ComponentInfo, EntrySummary, UtilityInfo};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::{DataFile, Environment, paths::candidate_paths};
use crate::types::{CodeIntelError, Result};

/// A record type stored in a [`KnowledgeBase`]
pub trait KnowledgeEntry: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Singular noun used in messages ("component", "utility")
    const KIND: &'static str;
    /// Search path for the backing file
    const DATA_FILE: DataFile;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
    fn description(&self) -> &str;
}

pub type ComponentKnowledgeBase = KnowledgeBase<ComponentInfo>;
pub type UtilityKnowledgeBase = KnowledgeBase<UtilityInfo>;

/// Immutable catalog of entries
#[derive(Debug, Clone)]
pub struct KnowledgeBase<E> {
    entries: Vec<E>,
    index: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl<E: KnowledgeEntry> KnowledgeBase<E> {
    /// Resolve the backing file through its search path and load it.
    pub fn load(env: &Environment) -> Self {
        match E::DATA_FILE.resolve(env) {
            Some(path) => Self::load_from(&path),
            None => {
                let err = CodeIntelError::DataFileNotFound {
                    file: E::DATA_FILE.file_name().to_string(),
                    searched: candidate_paths(&E::DATA_FILE.candidates(env), env),
                };
                error!("Failed to load {} knowledge base: {}", E::KIND, err);
                Self::empty()
            }
        }
    }

    /// Load a specific file, logging and returning an empty index on failure.
    pub fn load_from(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(kb) => {
                info!(
                    "Loaded {} {} entries from {}",
                    kb.len(),
                    E::KIND,
                    path.display()
                );
                kb
            }
            Err(err) => {
                error!("Failed to load {} knowledge base: {}", E::KIND, err);
                Self::empty()
            }
        }
    }

    /// Strict variant of [`load_from`](Self::load_from)
    pub fn from_path(path: &Path) -> Result<Self> {
        let parse_error = |message: String| CodeIntelError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;

        let mut entries = Vec::with_capacity(object.len());
        for (name, value) in object {
            let mut entry: E = serde_json::from_value(value)
                .map_err(|e| parse_error(format!("{} \"{}\": {}", E::KIND, name, e)))?;
            entry.set_name(name);
            entries.push(entry);
        }

        let mut kb = Self::from_entries(entries);
        kb.source = Some(path.to_path_buf());
        Ok(kb)
    }

    /// Build from records directly; later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = E>) -> Self {
        let mut kb = Self::empty();
        for entry in entries {
            match kb.index.get(entry.name()) {
                Some(&i) => kb.entries[i] = entry,
                None => {
                    kb.index.insert(entry.name().to_string(), kb.entries.len());
                    kb.entries.push(entry);
                }
            }
        }
        kb
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            source: None,
        }
    }

    pub fn all(&self) -> &[E] {
        &self.entries
    }

    /// Exact-name lookup
    pub fn get(&self, name: &str) -> Option<&E> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn summary(&self) -> Vec<EntrySummary> {
        self.entries
            .iter()
            .map(|e| EntrySummary {
                name: e.name().to_string(),
                description: e.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl<E: KnowledgeEntry> Default for KnowledgeBase<E> {
    fn default() -> Self {
        Self::empty()
    }
}
