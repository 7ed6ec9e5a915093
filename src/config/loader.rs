//! Providers Configuration Loader
//!
//! Owns the parsed `config.json` document. The file is located through the
//! [`DataFile::Config`] search path, parsed on first use and memoized.
//!
//! ## Reload semantics
//!
//! `load(true)` parses into a local value first and swaps the shared `Arc`
//! only after the parse succeeds, so concurrent readers never observe a
//! partially-loaded document and a broken file never evicts a good cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::paths::{DataFile, Environment, candidate_paths};
use super::types::ProvidersDocument;
use crate::types::{CodeIntelError, Result};

#[derive(Debug, Default)]
struct Cached {
    document: Option<Arc<ProvidersDocument>>,
    source: Option<PathBuf>,
}

/// Cached, reloadable provider configuration
#[derive(Debug)]
pub struct ProvidersStore {
    env: Environment,
    /// Fixed document for stores built without a backing file
    pinned: bool,
    cache: RwLock<Cached>,
}

impl ProvidersStore {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            pinned: false,
            cache: RwLock::new(Cached::default()),
        }
    }

    /// Store around an in-memory document; reloads return it unchanged.
    pub fn from_document(document: ProvidersDocument) -> Self {
        Self {
            env: Environment::from_vars(Vec::<(String, String)>::new()),
            pinned: true,
            cache: RwLock::new(Cached {
                document: Some(Arc::new(document)),
                source: None,
            }),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Return the cached document, loading it on first use or when forced.
    pub fn load(&self, force_reload: bool) -> Result<Arc<ProvidersDocument>> {
        if !force_reload || self.pinned {
            let cache = self.cache.read().unwrap_or_else(|p| p.into_inner());
            if let Some(document) = &cache.document {
                return Ok(Arc::clone(document));
            }
        }

        let path = self.locate()?;
        let document = Arc::new(Self::read_document(&path)?);
        info!(
            "Loaded {} provider(s) from {}",
            document.providers.len(),
            path.display()
        );

        let mut cache = self.cache.write().unwrap_or_else(|p| p.into_inner());
        cache.document = Some(Arc::clone(&document));
        cache.source = Some(path);
        Ok(document)
    }

    /// Shorthand for `load(false)`
    pub fn get(&self) -> Result<Arc<ProvidersDocument>> {
        self.load(false)
    }

    pub fn reload(&self) -> Result<Arc<ProvidersDocument>> {
        self.load(true)
    }

    /// File the cached document was read from, if any
    pub fn source_path(&self) -> Option<PathBuf> {
        let cache = self.cache.read().unwrap_or_else(|p| p.into_inner());
        cache.source.clone()
    }

    fn locate(&self) -> Result<PathBuf> {
        DataFile::Config.resolve(&self.env).ok_or_else(|| {
            let searched = candidate_paths(&DataFile::Config.candidates(&self.env), &self.env);
            CodeIntelError::ConfigNotFound {
                file: DataFile::Config.file_name().to_string(),
                searched,
            }
        })
    }

    /// Parse a providers document from disk
    pub fn read_document(path: &Path) -> Result<ProvidersDocument> {
        debug!("Reading providers configuration: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| CodeIntelError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| CodeIntelError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
