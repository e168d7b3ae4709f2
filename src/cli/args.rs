//! Command-line argument parsing for the cmdkit binary

use clap::{Parser, Subcommand};

/// cmdkit - Inspect how argument lines are parsed and dispatched
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cmdkit")]
pub struct Args {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse an argument line and print the resulting command chain
    Parse {
        /// Print the chain as JSON
        #[arg(long)]
        json: bool,

        /// Tokens of the line to parse
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },

    /// Run the bundled example application against an argument line
    Demo {
        /// Application title, also used as the program name
        #[arg(long, default_value = "example")]
        title: String,

        /// Prefix for environment variables backing flags
        #[arg(long = "env-prefix")]
        env_prefix: Option<String>,

        /// Tokens passed to the application after the program name
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = Args::try_parse_from(["cmdkit", "parse", "tool", "-v"]).unwrap();
        assert!(!args.debug);
        match args.command {
            Command::Parse { json, line } => {
                assert!(!json);
                assert_eq!(line, vec!["tool", "-v"]);
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_parse_debug_flag() {
        let args = Args::try_parse_from(["cmdkit", "--debug", "parse", "tool"]).unwrap();
        assert!(args.debug);
    }

    #[test]
    fn test_parse_requires_line() {
        assert!(Args::try_parse_from(["cmdkit", "parse"]).is_err());
    }

    #[test]
    fn test_demo_defaults() {
        let args = Args::try_parse_from(["cmdkit", "demo", "add"]).unwrap();
        match args.command {
            Command::Demo {
                title,
                env_prefix,
                line,
            } => {
                assert_eq!(title, "example");
                assert!(env_prefix.is_none());
                assert_eq!(line, vec!["add"]);
            }
            _ => panic!("Expected Demo command"),
        }
    }
}
