//! Error types for registration and dispatch.
//!
//! Handler failures are not represented here: they travel as the handler's own
//! `anyhow::Error`, untouched.

use thiserror::Error;

/// Configuration mistakes detected while a command or top-level argument is
/// being registered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("SubCommand {0:?} Already Exists")]
    DuplicateCommand(String),

    #[error("bool argument must have a default value (parameter `{0}`)")]
    BoolWithoutDefault(String),

    #[error("no converter registered for type <{type_name}> (parameter `{param}`)")]
    UnknownType { param: String, type_name: String },

    #[error("parameter `{0}` without a default follows a parameter with a default")]
    NonDefaultAfterDefault(String),

    #[error("{defaults} defaults given for {params} positional parameters")]
    TooManyDefaults { params: usize, defaults: usize },

    #[error("duplicate parameter name `{0}`")]
    DuplicateParameter(String),

    #[error("parameter name `{0}` is reserved")]
    ReservedName(String),

    #[error("parameter name must not be empty")]
    EmptyName,

    #[error("default for parameter `{param}` does not convert: {message}")]
    InvalidDefault { param: String, message: String },
}

/// Failures between argv and the handler call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Usage, help and version outcomes reported by clap.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("failed to read parsed value: {0}")]
    Matches(#[from] clap::parser::MatchesError),

    #[error("parser selected unregistered command {0:?}")]
    UnknownCommand(String),
}

impl DispatchError {
    /// The clap error kind when this is a usage outcome.
    pub fn usage_kind(&self) -> Option<clap::error::ErrorKind> {
        match self {
            DispatchError::Usage(e) => Some(e.kind()),
            _ => None,
        }
    }
}
