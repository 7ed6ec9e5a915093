//! Path Resolution
//!
//! Turns a prioritized list of environment variables and fallback paths into a
//! single existing file path.
//!
//! ## Expansion rules
//!
//! - leading `~/` or a bare `~` → home directory
//! - `$HOME` → home directory
//! - `${NAME}` and `$NAME` → value of `NAME`, or empty string when unset
//!
//! Expansion is textual and happens before any existence check.

use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tracing::debug;

use crate::constants::{env as env_names, files};

static BRACED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid braced variable pattern"));

static BARE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("valid bare variable pattern")
});

// =============================================================================
// Environment
// =============================================================================

#[derive(Debug, Clone)]
enum VarSource {
    Process,
    Fixed(HashMap<String, String>),
}

/// Snapshot of the process environment used for path resolution.
///
/// `Environment::system()` reads the real process; `Environment::from_vars`
/// builds an isolated environment so resolution can be exercised without
/// touching global state.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: VarSource,
    home: Option<PathBuf>,
    cwd: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
}

impl Environment {
    pub fn system() -> Self {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self {
            vars: VarSource::Process,
            home,
            cwd: std::env::current_dir().ok(),
            exe_dir,
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: VarSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            home: None,
            cwd: None,
            exe_dir: None,
        }
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_exe_dir(mut self, exe_dir: impl Into<PathBuf>) -> Self {
        self.exe_dir = Some(exe_dir.into());
        self
    }

    /// Value of a variable; empty values count as unset.
    pub fn var(&self, name: &str) -> Option<String> {
        let value = match &self.vars {
            VarSource::Process => std::env::var(name).ok(),
            VarSource::Fixed(map) => map.get(name).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// True when variables come from the real process environment
    pub fn is_process(&self) -> bool {
        matches!(self.vars, VarSource::Process)
    }

    /// Non-empty variables whose name starts with `prefix`, prefix stripped
    pub fn prefixed_vars(&self, prefix: &str) -> Vec<(String, String)> {
        let strip = |(name, value): (String, String)| {
            let key = name.strip_prefix(prefix)?.to_string();
            (!key.is_empty() && !value.is_empty()).then_some((key, value))
        };
        let mut vars: Vec<(String, String)> = match &self.vars {
            VarSource::Process => std::env::vars().filter_map(strip).collect(),
            VarSource::Fixed(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .filter_map(strip)
                .collect(),
        };
        vars.sort();
        vars
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn exe_dir(&self) -> Option<&Path> {
        self.exe_dir.as_deref()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::system()
    }
}

// =============================================================================
// Expansion
// =============================================================================

/// Expand `~`, `$HOME`, `${VAR}` and `$VAR` references in a path.
pub fn expand_path(raw: &str, env: &Environment) -> PathBuf {
    if raw.is_empty() {
        return PathBuf::new();
    }

    let home = env.home_dir().map(|h| h.to_string_lossy().into_owned());
    let mut expanded = raw.to_string();

    if let Some(home) = &home {
        if let Some(rest) = expanded.strip_prefix("~/") {
            expanded = Path::new(home).join(rest).to_string_lossy().into_owned();
        } else if expanded == "~" {
            expanded = home.clone();
        }

        if expanded.contains("$HOME") {
            expanded = expanded.replace("$HOME", home);
        }
    }

    let expanded = BRACED_VAR.replace_all(&expanded, |caps: &regex::Captures<'_>| {
        env.var(&caps[1]).unwrap_or_default()
    });
    let expanded = BARE_VAR.replace_all(&expanded, |caps: &regex::Captures<'_>| {
        env.var(&caps[1]).unwrap_or_default()
    });

    PathBuf::from(expanded.into_owned())
}

// =============================================================================
// Candidates
// =============================================================================

/// One entry in a priority-ordered search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Environment variable holding a file path
    EnvFile(String),
    /// Environment variable holding a directory; `file` is appended
    EnvDir { var: String, file: String },
    /// Literal path (already computed by the caller, still expanded)
    Path(PathBuf),
}

impl Candidate {
    pub fn env_file(var: impl Into<String>) -> Self {
        Self::EnvFile(var.into())
    }

    pub fn env_dir(var: impl Into<String>, file: impl Into<String>) -> Self {
        Self::EnvDir {
            var: var.into(),
            file: file.into(),
        }
    }

    /// Concrete path for this candidate, or `None` when its variable is unset.
    pub fn to_path(&self, env: &Environment) -> Option<PathBuf> {
        match self {
            Self::EnvFile(var) => env.var(var).map(|value| expand_path(&value, env)),
            Self::EnvDir { var, file } => env
                .var(var)
                .map(|value| expand_path(&value, env).join(file)),
            Self::Path(path) => Some(expand_path(&path.to_string_lossy(), env)),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::EnvFile(var) => format!("env {}", var),
            Self::EnvDir { var, file } => format!("env {}/{}", var, file),
            Self::Path(_) => "fallback".to_string(),
        }
    }
}

/// Walk candidates in order and return the first one that exists on disk.
pub fn resolve_candidates(candidates: &[Candidate], env: &Environment) -> Option<PathBuf> {
    for candidate in candidates {
        let Some(path) = candidate.to_path(env) else {
            continue;
        };

        if path.exists() {
            debug!("Resolved {} -> {}", candidate.label(), path.display());
            return Some(path);
        }
        debug!(
            "Candidate {} does not exist: {}",
            candidate.label(),
            path.display()
        );
    }
    None
}

/// Resolve a file from env vars (in priority order) and then fallback paths.
///
/// Returns `None` when every candidate is missing; callers decide whether
/// that is fatal.
pub fn resolve<S: AsRef<str>, P: AsRef<Path>>(
    env_vars: &[S],
    fallback_paths: &[P],
    env: &Environment,
) -> Option<PathBuf> {
    let candidates: Vec<Candidate> = env_vars
        .iter()
        .map(|v| Candidate::env_file(v.as_ref()))
        .chain(
            fallback_paths
                .iter()
                .map(|p| Candidate::Path(p.as_ref().to_path_buf())),
        )
        .collect();
    resolve_candidates(&candidates, env)
}

/// Every concrete path a candidate list would probe, in order.
pub fn candidate_paths(candidates: &[Candidate], env: &Environment) -> Vec<PathBuf> {
    candidates.iter().filter_map(|c| c.to_path(env)).collect()
}

// =============================================================================
// Search Paths
// =============================================================================

/// Ordered search path for one of the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Config,
    Components,
    Utils,
}

impl DataFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            DataFile::Config => files::CONFIG,
            DataFile::Components => files::COMPONENTS,
            DataFile::Utils => files::UTILS,
        }
    }

    fn direct_vars(&self) -> (&'static str, &'static str) {
        match self {
            DataFile::Config => (env_names::CONFIG_FILE, env_names::legacy::CONFIG_FILE),
            DataFile::Components => (
                env_names::COMPONENTS_FILE,
                env_names::legacy::COMPONENTS_FILE,
            ),
            DataFile::Utils => (env_names::UTILS_FILE, env_names::legacy::UTILS_FILE),
        }
    }

    /// Candidates in priority order:
    /// direct file var → data dir var → legacy file var → legacy dir var →
    /// (`CONFIG_PATH`, config only) → cwd `data/` → executable `data/`.
    pub fn candidates(&self, env: &Environment) -> Vec<Candidate> {
        let file = self.file_name();
        let (direct, legacy_direct) = self.direct_vars();

        let mut candidates = vec![
            Candidate::env_file(direct),
            Candidate::env_dir(env_names::DATA_DIR, file),
            Candidate::env_file(legacy_direct),
            Candidate::env_dir(env_names::legacy::DATA_DIR, file),
        ];

        if *self == DataFile::Config {
            candidates.push(Candidate::env_file(env_names::GENERIC_CONFIG_PATH));
        }

        if let Some(cwd) = env.current_dir() {
            candidates.push(Candidate::Path(cwd.join(files::DATA_DIR).join(file)));
        }
        if let Some(exe_dir) = env.exe_dir() {
            candidates.push(Candidate::Path(exe_dir.join(files::DATA_DIR).join(file)));
        }

        candidates
    }

    pub fn resolve(&self, env: &Environment) -> Option<PathBuf> {
        resolve_candidates(&self.candidates(env), env)
    }
}

// =============================================================================
// Tests
// =============================================================================
