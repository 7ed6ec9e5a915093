//! Paths Command
//!
//! Shows every location probed for each data file and which one wins.

use serde::Serialize;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::paths::candidate_paths;
use crate::config::{DataFile, Environment, ServiceSettings};

#[derive(Debug, Serialize)]
pub struct SearchPath {
    pub file: &'static str,
    pub candidates: Vec<PathBuf>,
    pub resolved: Option<PathBuf>,
}

pub fn collect(env: &Environment) -> Vec<SearchPath> {
    let mut paths: Vec<SearchPath> = [DataFile::Config, DataFile::Components, DataFile::Utils]
        .into_iter()
        .map(|file| SearchPath {
            file: file.file_name(),
            candidates: candidate_paths(&file.candidates(env), env),
            resolved: file.resolve(env),
        })
        .collect();

    paths.push(SearchPath {
        file: crate::constants::files::SETTINGS,
        candidates: candidate_paths(&ServiceSettings::candidates(env), env),
        resolved: ServiceSettings::resolve_path(env),
    });
    paths
}

pub fn run(env: &Environment) {
    let out = Output::new();
    out.header("Data file search paths");

    for search in collect(env) {
        out.section(search.file);
        if search.candidates.is_empty() {
            out.info("no candidate locations");
        }
        for candidate in &search.candidates {
            let chosen = search.resolved.as_ref() == Some(candidate);
            out.candidate(&candidate.display().to_string(), candidate.is_file(), chosen);
        }
        if search.resolved.is_none() {
            out.warning("not found");
        }
    }
}
