//! Command implementations for the CLI

use crate::{
    cli::Command,
    cmd::{self, App, Flag, FlagValue},
    config::Config,
    core::argv::{self, ParsedArg},
};
use anyhow::Context;
use std::io::{self, Write};
use tracing::{info, instrument};

/// Execute the appropriate command based on CLI arguments
#[instrument(skip(config))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Parse { json, line } => execute_parse_command(line, *json),
        Command::Demo { line, .. } => execute_demo_command(config, line),
    }
}

/// Execute the parse command
#[instrument]
fn execute_parse_command(line: &[String], json: bool) -> anyhow::Result<()> {
    let raw = line.join(" ");
    let parsed = argv::parse(&raw).context("Failed to parse argument line")?;
    info!("Parsed {} level(s)", parsed.depth());

    let rendered = if json {
        serde_json::to_string_pretty(&parsed).context("Failed to serialize parsed line")?
    } else {
        render_tree(&parsed)
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("Failed to write output")?;
    Ok(())
}

/// Execute the demo command
#[instrument(skip(config))]
fn execute_demo_command(config: &Config, line: &[String]) -> anyhow::Result<()> {
    let app = demo_app(config.clone());
    let args = std::iter::once(config.title.as_str()).chain(line.iter().map(String::as_str));

    let mut stdout = io::stdout().lock();
    app.run_args(args, &mut stdout)
}

/// The example application: root `age`/`name` flags plus `add` and `echo`
pub fn demo_app(config: Config) -> App {
    App::new(config)
        .flag(Flag::int("age").desc("age of the caller"))
        .flag(Flag::string("name").desc("name of the caller"))
        .command(
            cmd::Command::new("add")
                .desc("displays a add message")
                .usage("example --name=wallet --age=20 add")
                .action(|ctx| {
                    println!(
                        "Welcome to add: {:?} -> {}",
                        ctx.string("name"),
                        ctx.int("age")
                    );
                    Ok(())
                }),
        )
        .command(
            cmd::Command::new("echo")
                .desc("prints the remaining words")
                .flag(
                    Flag::int("times")
                        .alias("n")
                        .default_value(FlagValue::Int(1))
                        .desc("how often to repeat"),
                )
                .flag(Flag::bool("upper").desc("print in uppercase"))
                .action(|ctx| {
                    let mut text = ctx.args().join(" ");
                    if ctx.bool("upper") {
                        text = text.to_uppercase();
                    }
                    for _ in 0..ctx.int("times").max(0) {
                        println!("{text}");
                    }
                    Ok(())
                }),
        )
}

/// Indented one-line-per-level rendering of a parsed chain
pub fn render_tree(parsed: &ParsedArg) -> String {
    parsed
        .levels()
        .enumerate()
        .map(|(depth, level)| {
            let mut line = format!("{}{}", "  ".repeat(depth), level.name);
            for (key, values) in &level.pairs {
                line.push_str(&format!(" {key}=[{}]", values.join(",")));
            }
            if level.sub.is_none() && !level.text.is_empty() {
                line.push_str(&format!(" text={:?}", level.text));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let parsed = argv::parse("tool -v push --force origin").unwrap();
        assert_eq!(
            render_tree(&parsed),
            "tool v=[true]\n  push force=[true] text=\"origin\""
        );
    }

    #[test]
    fn test_demo_app_registers_commands() {
        let app = demo_app(Config::default());
        assert!(app.find_command("add").is_some());
        assert!(app.find_command("echo").is_some());
    }
}
