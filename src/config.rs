//! Configuration management for command applications
//!
//! Centralizes configuration options and provides validation.

use crate::{
    cli::{Args, Command},
    error::CmdError,
};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Application title used in help output
    pub title: String,
    /// Prefix for environment variable names derived from flag names
    pub env_prefix: Option<String>,
    /// Maximum length of command summaries in listings
    pub desc_cutoff: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            title: "cmdkit".to_string(),
            env_prefix: None,
            desc_cutoff: 100,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, CmdError> {
        let mut config = Self {
            debug: args.debug,
            ..Self::default()
        };

        if let Command::Demo {
            title, env_prefix, ..
        } = &args.command
        {
            config.title = title.clone();
            config.env_prefix = env_prefix.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), CmdError> {
        if self.title.trim().is_empty() {
            return Err(CmdError::config("application title must not be empty"));
        }

        if self.desc_cutoff == 0 {
            return Err(CmdError::config("description cutoff must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_demo_args() {
        let args = Args::try_parse_from([
            "cmdkit",
            "--debug",
            "demo",
            "--title",
            "shop",
            "--env-prefix",
            "SHOP",
            "add",
        ])
        .unwrap();
        let config = Config::from_args(&args).unwrap();

        assert!(config.debug);
        assert_eq!(config.title, "shop");
        assert_eq!(config.env_prefix.as_deref(), Some("SHOP"));
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let config = Config {
            title: " ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CmdError::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_cutoff() {
        let config = Config {
            desc_cutoff: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
