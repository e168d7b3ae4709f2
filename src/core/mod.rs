//! Core argument parsing
//!
//! Classifies raw tokens and builds the chain of parsed command levels.

pub mod argv;
pub mod token;

pub use argv::{ParsedArg, parse, parse_tokens};
