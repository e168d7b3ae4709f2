//! Help text rendering for applications, commands and flags

use crate::cmd::{command::Command, flag::Flag};

/// Shorten a description to `limit` characters, marking the cut with `...`
pub fn cutoff(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let kept: String = text.chars().take(limit).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn summary(cmd: &Command, limit: usize) -> String {
    if cmd.short_description().trim().is_empty() {
        cutoff(cmd.description(), limit)
    } else {
        cutoff(cmd.short_description(), limit)
    }
}

fn command_list(commands: &[Command], limit: usize) -> String {
    commands
        .iter()
        .map(|cmd| {
            format!(
                "\t⠙ {}        {}\n",
                cmd.name().to_lowercase(),
                summary(cmd, limit)
            )
        })
        .collect()
}

fn flag_list(flags: &[Flag]) -> String {
    flags
        .iter()
        .map(|flag| {
            let default = flag
                .default()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string());
            format!(
                "\t⠙ {}\n\t\t Default: {}\n\t\t Desc: {}\n",
                flag.name().to_lowercase(),
                default,
                flag.description()
            )
        })
        .collect()
}

/// Top-level usage listing every registered command
pub fn app_usage(title: &str, commands: &[Command], limit: usize) -> String {
    let title = title.to_lowercase();
    format!(
        "Usage: {title} [flags] [command]\n\n\
         ⡿ COMMANDS:\n{}\n\
         ⡿ HELP:\n\tRun [command] help\n\n\
         ⡿ OTHERS:\n\tRun '{title} flags' to print all flags of all commands.\n\n",
        command_list(commands, limit)
    )
}

/// Flags accepted by a single command
pub fn flag_usage(cmd: &Command) -> String {
    format!(
        "Command: {}\n\n⡿ Flags:\n{}\n",
        cmd.name().to_lowercase(),
        flag_list(cmd.flags())
    )
}

/// Flags of every command, one block per command
pub fn all_flags_usage(commands: &[Command]) -> String {
    commands.iter().map(flag_usage).collect()
}

/// Full help for one command
pub fn command_usage(cmd: &Command, limit: usize) -> String {
    let name = cmd.name().to_lowercase();

    let examples: String = cmd
        .usages()
        .iter()
        .map(|usage| format!("\t⠙ {usage}\n"))
        .collect();

    let usage_lines: String = cmd
        .flags()
        .iter()
        .map(|flag| {
            let default = flag.default().map(ToString::to_string).unwrap_or_default();
            format!("\t⠙ {name} --{}={default}\n", flag.name().to_lowercase())
        })
        .collect();

    format!(
        "Command: {name} [flags] [sub commands]\n\n\
         ⡿ DESC:\n\t{}\n\n\
         ⡿ HELP:\n\tRun {name} help to print this message.\n\
         \tRun {name} [command] help to print help for sub command.\n\n\
         ⡿ Flags:\n{}\n\
         ⡿ Examples:\n{examples}\n\
         ⡿ USAGE:\n{usage_lines}\n\
         ⡿ SUB COMMANDS:\n{}\n",
        cmd.description(),
        flag_list(cmd.flags()),
        command_list(cmd.subcommands(), limit)
    )
}
