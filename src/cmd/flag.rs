//! Typed flag declarations and value coercion

use crate::error::{CmdError, Result};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static DURATION_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|ms|s|m|h))+$")
        .expect("duration pattern is valid")
});

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|ms|s|m|h)").expect("duration pattern is valid")
});

/// Hook run against the raw strings of a flag before coercion
pub type Validator = Arc<dyn Fn(&[String]) -> std::result::Result<(), String> + Send + Sync>;

/// Hook that may rewrite or reject a value after coercion
pub type Morph = Arc<dyn Fn(FlagValue) -> std::result::Result<FlagValue, String> + Send + Sync>;

/// The declared type of a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    /// Boolean that is `true` unless given
    TBool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt64,
    Float32,
    Float64,
    Duration,
    StringList,
    BoolList,
    IntList,
    Int64List,
    UInt64List,
    DurationList,
}

impl FlagKind {
    /// Whether the flag takes every value instead of only the first
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Self::StringList
                | Self::BoolList
                | Self::IntList
                | Self::Int64List
                | Self::UInt64List
                | Self::DurationList
        )
    }
}

/// A coerced flag value
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Duration(Duration),
    StringList(Vec<String>),
    BoolList(Vec<bool>),
    IntList(Vec<i64>),
    UIntList(Vec<u64>),
    DurationList(Vec<Duration>),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Debug>(items: &[T]) -> String {
            items
                .iter()
                .map(|item| format!("{item:?}"))
                .collect::<Vec<_>>()
                .join(",")
        }

        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Duration(v) => write!(f, "{v:?}"),
            Self::StringList(v) => write!(f, "[{}]", v.join(",")),
            Self::BoolList(v) => write!(f, "[{}]", list(v)),
            Self::IntList(v) => write!(f, "[{}]", list(v)),
            Self::UIntList(v) => write!(f, "[{}]", list(v)),
            Self::DurationList(v) => write!(f, "[{}]", list(v)),
        }
    }
}

/// Declaration of a single flag accepted by a command
#[derive(Clone)]
pub struct Flag {
    name: String,
    alias: Option<String>,
    env: Option<String>,
    desc: String,
    kind: FlagKind,
    default: Option<FlagValue>,
    validator: Option<Validator>,
    morph: Option<Morph>,
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("env", &self.env)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .field("morph", &self.morph.is_some())
            .finish()
    }
}

impl Flag {
    /// Create a new flag of the given kind
    pub fn new(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            env: None,
            desc: String::new(),
            kind,
            default: None,
            validator: None,
            morph: None,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    pub fn tbool(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::TBool)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::StringList)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Int)
    }

    pub fn uint(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::UInt)
    }

    pub fn float64(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Float64)
    }

    pub fn duration(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Duration)
    }

    /// Set a short alternative name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Read the value from this environment variable when not given
    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Value used when neither the line nor the environment provide one
    pub fn default_value(mut self, value: FlagValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Reject raw values before they are coerced
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&[String]) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Transform the coerced value, or reject it with a message
    pub fn morph<F>(mut self, morph: F) -> Self
    where
        F: Fn(FlagValue) -> std::result::Result<FlagValue, String> + Send + Sync + 'static,
    {
        self.morph = Some(Arc::new(morph));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn env_name(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.desc
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn default(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    /// Value assumed when the flag was not provided anywhere
    pub fn fallback(&self) -> Option<FlagValue> {
        match (&self.default, self.kind) {
            (Some(value), _) => Some(value.clone()),
            (None, FlagKind::TBool) => Some(FlagValue::Bool(true)),
            (None, _) => None,
        }
    }

    /// Validate and coerce the raw strings collected for this flag
    pub fn parse(&self, values: &[String]) -> Result<FlagValue> {
        if let Some(validator) = &self.validator {
            validator(values).map_err(|message| CmdError::validation(&self.name, message))?;
        }

        let value = if self.kind.is_list() {
            self.parse_list(values)?
        } else {
            let first = values.first().ok_or_else(|| {
                CmdError::invalid_flag_value(&self.name, "", "no value provided")
            })?;
            self.parse_scalar(first)?
        };

        match &self.morph {
            Some(morph) => morph(value).map_err(|message| CmdError::validation(&self.name, message)),
            None => Ok(value),
        }
    }

    fn parse_scalar(&self, raw: &str) -> Result<FlagValue> {
        let value = match self.kind {
            FlagKind::Bool | FlagKind::TBool => FlagValue::Bool(self.coerce(raw, parse_bool)?),
            FlagKind::String => FlagValue::String(raw.to_string()),
            FlagKind::Int | FlagKind::Int64 => {
                FlagValue::Int(self.coerce(raw, |s| s.parse::<i64>())?)
            }
            FlagKind::Int8 => FlagValue::Int(self.coerce(raw, |s| s.parse::<i8>())?.into()),
            FlagKind::Int16 => FlagValue::Int(self.coerce(raw, |s| s.parse::<i16>())?.into()),
            FlagKind::Int32 => FlagValue::Int(self.coerce(raw, |s| s.parse::<i32>())?.into()),
            FlagKind::UInt | FlagKind::UInt64 => {
                FlagValue::UInt(self.coerce(raw, |s| s.parse::<u64>())?)
            }
            FlagKind::Float32 => FlagValue::Float(self.coerce(raw, |s| s.parse::<f32>())?.into()),
            FlagKind::Float64 => FlagValue::Float(self.coerce(raw, |s| s.parse::<f64>())?),
            FlagKind::Duration => FlagValue::Duration(self.coerce(raw, parse_duration)?),
            _ => return self.parse_list(&[raw.to_string()]),
        };
        Ok(value)
    }

    fn parse_list(&self, values: &[String]) -> Result<FlagValue> {
        let value = match self.kind {
            FlagKind::BoolList => FlagValue::BoolList(self.coerce_all(values, parse_bool)?),
            FlagKind::IntList | FlagKind::Int64List => {
                FlagValue::IntList(self.coerce_all(values, |s| s.parse::<i64>())?)
            }
            FlagKind::UInt64List => {
                FlagValue::UIntList(self.coerce_all(values, |s| s.parse::<u64>())?)
            }
            FlagKind::DurationList => {
                FlagValue::DurationList(self.coerce_all(values, parse_duration)?)
            }
            _ => FlagValue::StringList(values.to_vec()),
        };
        Ok(value)
    }

    fn coerce<T, E, F>(&self, raw: &str, convert: F) -> Result<T>
    where
        E: fmt::Display,
        F: Fn(&str) -> std::result::Result<T, E>,
    {
        convert(raw.trim())
            .map_err(|e| CmdError::invalid_flag_value(&self.name, raw, e.to_string()))
    }

    fn coerce_all<T, E, F>(&self, values: &[String], convert: F) -> Result<Vec<T>>
    where
        E: fmt::Display,
        F: Fn(&str) -> std::result::Result<T, E>,
    {
        values
            .iter()
            .map(|raw| self.coerce(raw, &convert))
            .collect()
    }
}

/// Flags every command and application accepts
pub fn builtin_flags() -> Vec<Flag> {
    vec![
        Flag::bool("help").alias("h").desc("Print help for the command"),
        Flag::duration("timeout")
            .alias("tm")
            .desc("Deadline for the command to finish"),
    ]
}

/// Parse a boolean from `1`/`0`, `t`/`f` and `true`/`false` spellings
pub fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("not a bool".to_string()),
    }
}

/// Parse a duration such as `300ms`, `2s` or `1h30m`
pub fn parse_duration(raw: &str) -> std::result::Result<Duration, String> {
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    if !DURATION_FULL.is_match(raw) {
        return Err("not a duration".to_string());
    }

    let mut nanos = 0f64;
    for cap in DURATION_PART.captures_iter(raw) {
        let amount: f64 = cap[1].parse().map_err(|_| "not a duration".to_string())?;
        let unit = match &cap[2] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            _ => 3600e9,
        };
        nanos += amount * unit;
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}
