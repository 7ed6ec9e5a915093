//! Check Command
//!
//! Validates the providers document, the settings file and the knowledge-base
//! files without contacting any model.

use crate::cli::Output;
use crate::config::{
    ConfigReport, DataFile, Environment, ProvidersStore, ServiceSettings, check_document,
};
use crate::knowledge::{ComponentKnowledgeBase, UtilityKnowledgeBase};

/// Full report for the environment. Load failures are reported, not raised.
pub fn inspect(env: &Environment) -> ConfigReport {
    let store = ProvidersStore::new(env.clone());
    let mut report = match store.get() {
        Ok(document) => check_document(&document),
        Err(e) => ConfigReport {
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    };

    if let Err(e) = ServiceSettings::load(env) {
        report.errors.push(e.to_string());
    }

    check_data_file(env, DataFile::Components, &mut report, |path| {
        ComponentKnowledgeBase::from_path(path).map(|kb| kb.len())
    });
    check_data_file(env, DataFile::Utils, &mut report, |path| {
        UtilityKnowledgeBase::from_path(path).map(|kb| kb.len())
    });

    report
}

fn check_data_file(
    env: &Environment,
    file: DataFile,
    report: &mut ConfigReport,
    load: impl Fn(&std::path::Path) -> crate::types::Result<usize>,
) {
    let Some(path) = file.resolve(env) else {
        report.warnings.push(format!(
            "{} not found; its tools will answer from an empty catalog",
            file.file_name()
        ));
        return;
    };

    match load(&path) {
        Ok(0) => report
            .warnings
            .push(format!("{} has no entries", path.display())),
        Ok(_) => {}
        Err(e) => report.warnings.push(e.to_string()),
    }
}

/// Print the report; returns `false` when it contains errors.
pub fn run(env: &Environment) -> bool {
    let report = inspect(env);
    let out = Output::new();
    out.header("Configuration check");

    for error in &report.errors {
        out.error(error);
    }
    for warning in &report.warnings {
        out.warning(warning);
    }

    if report.is_ok() {
        out.success(&format!(
            "Configuration is usable ({} warning(s))",
            report.warnings.len()
        ));
    } else {
        out.error(&format!("{} error(s) found", report.errors.len()));
    }
    report.is_ok()
}
