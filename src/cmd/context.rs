//! Per-command flag values resolved from a parsed node

use crate::{
    cmd::flag::{Flag, FlagValue},
    core::argv::ParsedArg,
    error::Result,
    utils::env::EnvUtils,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Values available to a running command.
///
/// Lookups that miss at this level fall back to the parent command's context.
#[derive(Debug, Default)]
pub struct Context<'p> {
    parent: Option<&'p Context<'p>>,
    pairs: HashMap<String, FlagValue>,
    args: Vec<String>,
    help: String,
    deadline: Option<Instant>,
}

impl<'p> Context<'p> {
    /// Resolve the declared flags of a command against one parsed level
    #[instrument(level = "debug", skip_all, fields(command = %node.name))]
    pub fn resolve(
        node: &ParsedArg,
        flags: &[Flag],
        env_prefix: Option<&str>,
        parent: Option<&'p Context<'p>>,
        help: String,
    ) -> Result<Self> {
        let mut pairs = HashMap::new();

        for flag in flags {
            let Some(value) = resolve_flag(node, flag, env_prefix)? else {
                continue;
            };
            if let Some(alias) = flag.alias_name() {
                pairs.insert(alias.to_string(), value.clone());
            }
            pairs.insert(flag.name().to_string(), value);
        }

        let args = if node.sub.is_none() {
            node.text
                .split(' ')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        let deadline = match pairs.get("timeout") {
            Some(FlagValue::Duration(timeout)) => Some(Instant::now() + *timeout),
            _ => parent.and_then(|p| p.deadline),
        };

        Ok(Self {
            parent,
            pairs,
            args,
            help,
            deadline,
        })
    }

    /// Free text left after the command name
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Rendered help for the command owning this context
    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn parent(&self) -> Option<&Context<'p>> {
        self.parent
    }

    /// When the `timeout` flag expires, if one was given here or above
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Whether a key was resolved at this level
    pub fn is_set(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// Look up a key here, then in the parents
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        match self.pairs.get(key) {
            Some(value) => Some(value),
            None => self.parent.and_then(|p| p.get(key)),
        }
    }

    pub fn bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FlagValue::Bool(true)))
    }

    pub fn string(&self, key: &str) -> &str {
        match self.get(key) {
            Some(FlagValue::String(v)) => v.as_str(),
            _ => "",
        }
    }

    pub fn int(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(FlagValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn uint(&self, key: &str) -> u64 {
        match self.get(key) {
            Some(FlagValue::UInt(v)) => *v,
            _ => 0,
        }
    }

    pub fn float(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(FlagValue::Float(v)) => *v,
            _ => 0.0,
        }
    }

    pub fn duration(&self, key: &str) -> Duration {
        match self.get(key) {
            Some(FlagValue::Duration(v)) => *v,
            _ => Duration::ZERO,
        }
    }

    pub fn string_list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(FlagValue::StringList(v)) => v.as_slice(),
            _ => &[],
        }
    }

    pub fn int_list(&self, key: &str) -> &[i64] {
        match self.get(key) {
            Some(FlagValue::IntList(v)) => v.as_slice(),
            _ => &[],
        }
    }
}

/// Line values first, then the alias, the environment and finally the fallback
fn resolve_flag(
    node: &ParsedArg,
    flag: &Flag,
    env_prefix: Option<&str>,
) -> Result<Option<FlagValue>> {
    let given = node
        .values(flag.name())
        .or_else(|| flag.alias_name().and_then(|alias| node.values(alias)));
    if let Some(values) = given {
        return flag.parse(values).map(Some);
    }

    let env_name = match (flag.env_name(), env_prefix) {
        (Some(name), _) => Some(name.to_string()),
        (None, Some(prefix)) => Some(EnvUtils::derive_name(prefix, flag.name())),
        (None, None) => None,
    };
    if let Some(raw) = env_name.as_deref().and_then(EnvUtils::get_var) {
        debug!("Flag {:?} taken from environment", flag.name());
        let values: Vec<String> = if flag.kind().is_list() {
            raw.split(',').map(|s| s.trim().to_string()).collect()
        } else {
            vec![raw]
        };
        return flag.parse(&values).map(Some);
    }

    Ok(flag.fallback())
}
