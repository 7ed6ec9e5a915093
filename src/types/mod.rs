pub mod error;

pub use error::{CodeIntelError, Result};
