//! Error types for the parser and the command layer
//!
//! Provides structured error handling with context and proper error chains.

use crate::core::argv::ParsedArg;
use thiserror::Error;

/// The ways a raw argument line can fail to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The raw input string had zero length
    #[error("no argument provided")]
    EmptyInput,

    /// A bare word would become the command name after flags were recorded
    #[error("flags must come after command name (found {token:?})")]
    MisplacedFlags { token: String },

    /// A `key=` flag without any usable value
    #[error("flag {flag:?} has no provided value")]
    MissingFlagValue { flag: String },
}

/// A parse failure together with the node built up to that point.
///
/// The partial node is only meant for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    partial: Box<ParsedArg>,
}

impl ParseError {
    /// Create a new parse error carrying the partially built node
    pub fn new(kind: ParseErrorKind, partial: ParsedArg) -> Self {
        Self {
            kind,
            partial: Box::new(partial),
        }
    }

    /// Create an empty-input error
    pub fn empty_input() -> Self {
        Self::new(ParseErrorKind::EmptyInput, ParsedArg::default())
    }

    /// Create a misplaced-flags error
    pub fn misplaced_flags(token: impl Into<String>, partial: ParsedArg) -> Self {
        Self::new(
            ParseErrorKind::MisplacedFlags {
                token: token.into(),
            },
            partial,
        )
    }

    /// Create a missing-flag-value error
    pub fn missing_flag_value(flag: impl Into<String>, partial: ParsedArg) -> Self {
        Self::new(ParseErrorKind::MissingFlagValue { flag: flag.into() }, partial)
    }

    /// What went wrong
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The node as it stood when parsing stopped
    pub fn partial(&self) -> &ParsedArg {
        &self.partial
    }

    /// Replace the partial node, used when an error bubbles up a level
    pub(crate) fn with_partial(mut self, partial: ParsedArg) -> Self {
        self.partial = Box::new(partial);
        self
    }
}

/// Errors raised while resolving flags and dispatching commands
#[derive(Error, Debug)]
pub enum CmdError {
    /// The input line could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No registered top-level command matches
    #[error("command not found {name:?}")]
    CommandNotFound { name: String },

    /// A command has no subcommand with the requested name
    #[error("{command:?} has no subcommand named {name:?}")]
    UnknownSubcommand { command: String, name: String },

    /// A command was selected but nothing is attached to run
    #[error("no action associated with command {command:?}")]
    NoAction { command: String },

    /// A flag value could not be coerced into its declared type
    #[error("invalid value {value:?} for flag {flag:?}: {reason}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// A user supplied validator rejected a flag value
    #[error("validation failed for flag {flag:?}: {message}")]
    Validation { flag: String, message: String },

    /// Configuration is unusable
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Writing help output failed
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

impl CmdError {
    /// Create a new command-not-found error
    pub fn command_not_found(name: impl Into<String>) -> Self {
        Self::CommandNotFound { name: name.into() }
    }

    /// Create a new unknown-subcommand error
    pub fn unknown_subcommand(command: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownSubcommand {
            command: command.into(),
            name: name.into(),
        }
    }

    /// Create a new missing-action error
    pub fn no_action(command: impl Into<String>) -> Self {
        Self::NoAction {
            command: command.into(),
        }
    }

    /// Create a new invalid flag value error
    pub fn invalid_flag_value(
        flag: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFlagValue {
            flag: flag.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(flag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            flag: flag.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CmdError>;
