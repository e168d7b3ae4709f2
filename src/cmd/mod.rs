//! Command layer built on top of the argument parser
//!
//! Typed flags, per-command contexts, help rendering and dispatch.

pub mod app;
pub mod command;
pub mod context;
pub mod flag;
pub mod help;

pub use app::App;
pub use command::{Action, Command};
pub use context::Context;
pub use flag::{Flag, FlagKind, FlagValue};
