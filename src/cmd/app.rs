//! Application entry point tying the parser to registered commands

use crate::{
    cmd::{
        command::Command,
        context::Context,
        flag::{Flag, builtin_flags},
        help,
    },
    config::Config,
    core::argv::{self, ParsedArg},
    error::CmdError,
};
use std::io::Write;
use tracing::{debug, info, instrument};

/// A set of top-level commands sharing root flags
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    flags: Vec<Flag>,
    commands: Vec<Command>,
}

impl App {
    /// Create an application with only the built-in flags
    pub fn new(config: Config) -> Self {
        Self {
            config,
            flags: builtin_flags(),
            commands: Vec::new(),
        }
    }

    /// Add a root flag, visible to every command through its parent context
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn command(mut self, cmd: Command) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Find a top-level command by name
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|cmd| cmd.name() == name)
    }

    /// Rendered top-level usage
    pub fn usage(&self) -> String {
        help::app_usage(&self.config.title, &self.commands, self.config.desc_cutoff)
    }

    /// Run with process-style arguments, program name first
    pub fn run_args<I, S>(&self, args: I, out: &mut dyn Write) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.run_line(&line, out)
    }

    /// Parse a raw line and dispatch to the selected command
    #[instrument(level = "debug", skip(self, out))]
    pub fn run_line(&self, line: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        let node = argv::parse(line).map_err(CmdError::from)?;

        if node.has_kv("h") || node.has_kv("help") {
            return self.write(out, &self.usage());
        }

        let synthetic;
        let selected = match node.sub.as_deref() {
            Some(sub) => sub,
            None if node.text == "flags" && self.find_command("flags").is_none() => {
                return self.write(out, &help::all_flags_usage(&self.commands));
            }
            None if self.find_command(&node.text).is_some() => {
                debug!("Promoting trailing text {:?} to a command", node.text);
                synthetic = ParsedArg::new(node.text.clone());
                &synthetic
            }
            None => return self.write(out, &self.usage()),
        };

        let target = self
            .find_command(&selected.name)
            .ok_or_else(|| CmdError::command_not_found(&selected.name))?;

        let root = Context::resolve(
            &node,
            &self.flags,
            self.config.env_prefix.as_deref(),
            None,
            self.usage(),
        )?;

        info!("Dispatching to command {:?}", target.name());
        target.run(selected, &root, &self.config, out)
    }

    fn write(&self, out: &mut dyn Write, text: &str) -> anyhow::Result<()> {
        out.write_all(text.as_bytes()).map_err(CmdError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn example_app(sink: Arc<Mutex<String>>) -> App {
        App::new(Config {
            title: "example".to_string(),
            ..Config::default()
        })
        .flag(Flag::int("age"))
        .flag(Flag::string("name"))
        .command(
            Command::new("add")
                .desc("displays a add message")
                .action(move |ctx| {
                    *sink.lock().unwrap() =
                        format!("{:?} -> {}", ctx.string("name"), ctx.int("age"));
                    Ok(())
                }),
        )
    }

    #[test]
    fn test_root_flags_reach_command() {
        let seen = Arc::new(Mutex::new(String::new()));
        let app = example_app(Arc::clone(&seen));
        let mut out = Vec::new();

        app.run_line("example --name=wallet --age=20 add", &mut out)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), "\"wallet\" -> 20");
    }

    #[test]
    fn test_run_args_joins_process_arguments() {
        let seen = Arc::new(Mutex::new(String::new()));
        let app = example_app(Arc::clone(&seen));
        let mut out = Vec::new();

        app.run_args(["example", "--age=3", "add", "now"], &mut out)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), "\"\" -> 3");
    }

    #[test]
    fn test_no_command_prints_usage() {
        let app = example_app(Arc::new(Mutex::new(String::new())));
        let mut out = Vec::new();
        app.run_line("example", &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Usage: example [flags] [command]"));
        assert!(text.contains("⠙ add"));
    }

    #[test]
    fn test_flags_listing() {
        let app = example_app(Arc::new(Mutex::new(String::new())));
        let mut out = Vec::new();
        app.run_line("example flags", &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Command: add"));
        assert!(text.contains("⠙ timeout"));
    }

    #[test]
    fn test_unknown_command() {
        let app = example_app(Arc::new(Mutex::new(String::new())));
        let mut out = Vec::new();
        let err = app.run_line("example remove thing", &mut out).unwrap_err();

        match err.downcast_ref::<CmdError>() {
            Some(CmdError::CommandNotFound { name }) => assert_eq!(name, "remove"),
            other => panic!("Expected CommandNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors_surface() {
        let app = example_app(Arc::new(Mutex::new(String::new())));
        let mut out = Vec::new();
        let err = app.run_line("", &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CmdError>(),
            Some(CmdError::Parse(_))
        ));
    }
}
