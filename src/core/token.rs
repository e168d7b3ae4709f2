//! Token classification for the argument parser
//!
//! Splits the "what is this token" question away from the stateful
//! consumption logic in [`crate::core::argv`].

/// Classification of a single raw token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Empty string, a lone `-` or a lone `--`
    Ignorable,
    /// Anything that is not a flag: command names, subcommands, free text
    Bare(&'a str),
    /// A token with leading dashes and content after them
    Flag(FlagToken<'a>),
}

/// A flag token broken into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagToken<'a> {
    /// The token with all leading `-` removed
    pub opt: &'a str,
    /// Trimmed text left of the first `=`, empty without one
    pub key: &'a str,
    /// Trimmed text right of the first `=`, empty without one
    pub value: &'a str,
    /// Whether the flag carried an `=`
    pub has_eq: bool,
}

/// Shape of the value attached to a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape<'a> {
    /// No value at all, as in `-h` or `--name=`
    None,
    /// A plain value, as in `--name=wallet`
    Scalar(&'a str),
    /// A list opened and closed in the same token, as in `--dirs=[a,b]`
    ListSingle(&'a str),
    /// A list whose closer lives in a later token, as in `--dirs=[a b c]`
    ListSpanning(&'a str),
}

impl<'a> FlagToken<'a> {
    /// Work out what kind of value this flag carries
    pub fn value_shape(&self) -> ValueShape<'a> {
        if is_list(self.value) {
            if is_list_end(self.value) {
                ValueShape::ListSingle(self.value)
            } else {
                ValueShape::ListSpanning(self.value)
            }
        } else if self.value.is_empty() {
            ValueShape::None
        } else {
            ValueShape::Scalar(self.value)
        }
    }
}

/// Classify a raw token
pub fn classify(token: &str) -> Token<'_> {
    if is_ignored(token) {
        return Token::Ignorable;
    }
    if !is_flag(token) {
        return Token::Bare(token);
    }

    let opt = token.trim_start_matches('-');
    let (key, value, has_eq) = match opt.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim(), true),
        None => ("", "", false),
    };

    Token::Flag(FlagToken {
        opt,
        key,
        value,
        has_eq,
    })
}

/// True for flags such as `-v` or `--user` but not `-` or `--`
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-') && !token.trim_start_matches('-').is_empty()
}

/// True for tokens skipped entirely
pub fn is_ignored(token: &str) -> bool {
    matches!(token, "" | "-" | "--")
}

/// True when a value opens a bracketed list
pub fn is_list(value: &str) -> bool {
    value.starts_with('[')
}

/// True when a token closes a bracketed list
pub fn is_list_end(value: &str) -> bool {
    value.ends_with(']')
}
