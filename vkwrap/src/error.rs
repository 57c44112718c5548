//! Generation errors.
//!
//! Everything in here is fatal for the current target: the run aborts and
//! no output is persisted. Recoverable shape problems are not errors; they
//! downgrade the struct's complexity tier instead (see `classify`).

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenerateError>;

/// Fatal generation error.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A type has no category attribute, so its text has no section to land
    /// in. Guessing would silently drop code from the output.
    #[error("type '{name}' has no resolvable section category")]
    UnresolvedCategory { name: String },

    /// A feature requires a type the registry does not define.
    #[error("feature '{feature}' requires unknown type '{name}'")]
    UnknownType { feature: String, name: String },

    /// A feature requires a command the registry does not define.
    #[error("feature '{feature}' requires unknown command '{name}'")]
    UnknownCommand { feature: String, name: String },

    /// A prototype guard was configured with a directive but no symbol, or
    /// a symbol but no directive.
    #[error("guard '{0}' has a directive without a symbol (or a symbol without a directive)")]
    GuardMismatch(&'static str),
}
