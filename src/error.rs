use thiserror::Error;

use crate::ConfigError;

/// Unified error type for the fallible crate surface: file I/O and programmatic
/// configuration.
///
/// Rule text itself never fails to compile; see
/// [`RuleSet::diagnostics()`](crate::RuleSet::diagnostics).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
