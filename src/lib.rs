//! # cmdkit
//!
//! A command-line tokenizer and hierarchical command dispatcher.
//! A raw argument line is split on spaces and parsed into a chain of
//! [`ParsedArg`] levels, one per subcommand, each carrying its flags.
//!
//! ## Features
//!
//! - `--key=value`, boolean `-h` and bracketed list flags (`--dirs=[a b c]`)
//! - Nested subcommands with trailing free text
//! - Typed flags with environment-variable fallback and defaults
//! - Generated help for applications and commands
//!
//! ## Example
//!
//! ```
//! use cmdkit::parse;
//!
//! let parsed = parse("git --rack=20 push origin")?;
//! assert_eq!(parsed.name, "git");
//! assert_eq!(parsed.sub.as_deref().map(|s| s.name.as_str()), Some("push"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::cmd::{App, Command, Context, Flag, FlagKind, FlagValue};
pub use crate::core::{ParsedArg, parse, parse_tokens};
pub use crate::error::{CmdError, ParseError, ParseErrorKind};

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
