//! Command declarations and recursive dispatch over a parsed chain

use crate::{
    cmd::{
        context::Context,
        flag::{Flag, builtin_flags},
        help,
    },
    config::Config,
    core::argv::ParsedArg,
    error::CmdError,
};
use anyhow::Context as _;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Function run when a command is selected
pub type Action = Arc<dyn Fn(&Context<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A named command with its flags, subcommands and action
#[derive(Clone)]
pub struct Command {
    name: String,
    desc: String,
    short_desc: String,
    usages: Vec<String>,
    flags: Vec<Flag>,
    commands: Vec<Command>,
    action: Option<Action>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("commands", &self.commands)
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl Command {
    /// Create a command; names are matched in lowercase
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_lowercase(),
            desc: String::new(),
            short_desc: String::new(),
            usages: Vec::new(),
            flags: builtin_flags(),
            commands: Vec::new(),
            action: None,
        }
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// One-line summary shown in command listings
    pub fn short_desc(mut self, desc: impl Into<String>) -> Self {
        self.short_desc = desc.into();
        self
    }

    /// Add an example invocation
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usages.push(usage.into());
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, cmd: Command) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.desc
    }

    pub fn short_description(&self) -> &str {
        &self.short_desc
    }

    pub fn usages(&self) -> &[String] {
        &self.usages
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.commands
    }

    /// Find a direct subcommand by name
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    /// Run this command against its level of the parsed chain
    #[instrument(level = "debug", skip_all, fields(command = %self.name))]
    pub fn run(
        &self,
        node: &ParsedArg,
        parent: &Context<'_>,
        config: &Config,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        if node.has_kv("help") || node.has_kv("h") {
            let usage = help::command_usage(self, config.desc_cutoff);
            out.write_all(usage.as_bytes()).map_err(CmdError::from)?;
            return Ok(());
        }

        if node.has_kv("flags") {
            out.write_all(help::flag_usage(self).as_bytes())
                .map_err(CmdError::from)?;
            return Ok(());
        }

        let ctx = Context::resolve(
            node,
            &self.flags,
            config.env_prefix.as_deref(),
            Some(parent),
            help::command_usage(self, config.desc_cutoff),
        )?;

        match node.sub.as_deref() {
            Some(sub) => {
                let target = self
                    .find_subcommand(&sub.name)
                    .ok_or_else(|| CmdError::unknown_subcommand(&self.name, &sub.name))?;
                return target.run(sub, &ctx, config, out);
            }
            None => {
                // A single trailing word is kept as text by the parser.
                if let Some(target) = self.find_subcommand(&node.text) {
                    debug!("Promoting trailing text {:?} to a subcommand", node.text);
                    let synthetic = ParsedArg::new(node.text.clone());
                    return target.run(&synthetic, &ctx, config, out);
                }
            }
        }

        let action = self
            .action
            .as_ref()
            .ok_or_else(|| CmdError::no_action(&self.name))?;

        debug!("Running action");
        action(&ctx).with_context(|| format!("command {:?} failed", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::flag::FlagValue;
    use crate::core::argv::parse;
    use std::sync::Mutex;

    fn root() -> Context<'static> {
        Context::default()
    }

    #[test]
    fn test_name_is_lowercased() {
        assert_eq!(Command::new("Add").name(), "add");
    }

    #[test]
    fn test_runs_action_with_flags() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let cmd = Command::new("add")
            .flag(Flag::int("age"))
            .action(move |ctx| {
                *sink.lock().unwrap() = Some(ctx.int("age"));
                Ok(())
            });

        let node = parse("add --age=12").unwrap();
        let mut out = Vec::new();
        cmd.run(&node, &root(), &Config::default(), &mut out).unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(12));
    }

    #[test]
    fn test_dispatches_to_subcommand() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&seen);
        let cmd = Command::new("remote")
            .flag(Flag::string("name"))
            .subcommand(Command::new("add").action(move |ctx| {
                *sink.lock().unwrap() =
                    format!("{}:{}", ctx.string("name"), ctx.args().join(","));
                Ok(())
            }));

        let node = parse("remote --name=origin add git@host").unwrap();
        let mut out = Vec::new();
        cmd.run(&node, &root(), &Config::default(), &mut out).unwrap();

        assert_eq!(*seen.lock().unwrap(), "origin:git@host");
    }

    #[test]
    fn test_trailing_text_selects_subcommand() {
        let seen = Arc::new(Mutex::new(false));
        let sink = Arc::clone(&seen);
        let cmd = Command::new("remote").subcommand(Command::new("list").action(move |_| {
            *sink.lock().unwrap() = true;
            Ok(())
        }));

        let node = parse("remote list").unwrap();
        assert!(node.sub.is_none());

        let mut out = Vec::new();
        cmd.run(&node, &root(), &Config::default(), &mut out).unwrap();
        assert!(*seen.lock().unwrap());
    }

    #[test]
    fn test_unknown_subcommand() {
        let cmd = Command::new("remote").subcommand(Command::new("add"));
        let node = parse("remote drop origin").unwrap();
        let mut out = Vec::new();
        let err = cmd
            .run(&node, &root(), &Config::default(), &mut out)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CmdError>(),
            Some(CmdError::UnknownSubcommand { .. })
        ));
    }

    #[test]
    fn test_missing_action() {
        let cmd = Command::new("idle");
        let node = parse("idle").unwrap();
        let mut out = Vec::new();
        let err = cmd
            .run(&node, &root(), &Config::default(), &mut out)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CmdError>(),
            Some(CmdError::NoAction { .. })
        ));
    }

    #[test]
    fn test_help_flag_prints_usage() {
        let cmd = Command::new("add").desc("adds things").action(|_| {
            anyhow::bail!("should not run");
        });
        let node = parse("add -h").unwrap();
        let mut out = Vec::new();
        cmd.run(&node, &root(), &Config::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Command: add [flags] [sub commands]"));
        assert!(text.contains("adds things"));
    }

    #[test]
    fn test_flags_flag_prints_flag_usage() {
        let cmd = Command::new("add").flag(Flag::int("age").default_value(FlagValue::Int(3)));
        let node = parse("add --flags").unwrap();
        let mut out = Vec::new();
        cmd.run(&node, &root(), &Config::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Default: 3"));
    }

    #[test]
    fn test_action_error_is_wrapped() {
        let cmd = Command::new("fail").action(|_| anyhow::bail!("boom"));
        let node = parse("fail").unwrap();
        let mut out = Vec::new();
        let err = cmd
            .run(&node, &root(), &Config::default(), &mut out)
            .unwrap_err();

        assert_eq!(err.to_string(), "command \"fail\" failed");
        assert_eq!(err.root_cause().to_string(), "boom");
    }
}
