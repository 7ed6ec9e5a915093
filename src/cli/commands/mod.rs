//! Maintenance Commands
//!
//! Usage:
//!   code-intel [serve]
//!   code-intel models [-f json]
//!   code-intel check
//!   code-intel paths

pub mod check;
pub mod models;
pub mod paths;
pub mod serve;
