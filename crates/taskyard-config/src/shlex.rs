//! Shell-quoted command strings.
//!
//! [`ShlexSlice`] keeps a raw command string from the document next to the
//! words a POSIX shell would split it into. The raw text is what users see
//! in summaries and logs; the words are what gets handed to a container.

use std::fmt;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::value,
    multi::many0,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use taskyard_common::error::{Result, TaskyardError};

/// Characters that separate words outside of quotes.
const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// Characters a backslash escapes inside double quotes.
const fn is_double_quote_escape(c: char) -> bool {
    matches!(c, '$' | '`' | '"' | '\\' | '\n')
}

/// Skips separators and escaped newlines between words.
fn skip_separators(input: &str) -> IResult<&str, ()> {
    let separators = value((), take_while1(is_separator));
    let continuation = value((), tag("\\\n"));
    let (input, _) = many0(alt((separators, continuation))).parse(input)?;
    Ok((input, ()))
}

/// Reads one word starting at the beginning of `input`.
///
/// Returns the unescaped word and the unconsumed remainder.
fn split_word(input: &str) -> std::result::Result<(String, &str), &'static str> {
    let mut word = String::new();
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            c if is_separator(c) => return Ok((word, &input[idx..])),
            '\\' => match chars.next() {
                Some((_, '\n')) => {}
                Some((_, escaped)) => word.push(escaped),
                None => return Err("unterminated backslash-escape"),
            },
            '\'' => loop {
                match chars.next() {
                    Some((_, '\'')) => break,
                    Some((_, quoted)) => word.push(quoted),
                    None => return Err("unterminated single-quoted string"),
                }
            },
            '"' => loop {
                match chars.next() {
                    Some((_, '"')) => break,
                    Some((_, '\\')) => match chars.next() {
                        Some((_, '\n')) => {}
                        Some((_, escaped)) if is_double_quote_escape(escaped) => {
                            word.push(escaped);
                        }
                        Some((_, other)) => {
                            word.push('\\');
                            word.push(other);
                        }
                        None => return Err("unterminated double-quoted string"),
                    },
                    Some((_, quoted)) => word.push(quoted),
                    None => return Err("unterminated double-quoted string"),
                }
            },
            other => word.push(other),
        }
    }

    Ok((word, ""))
}

/// Splits `input` into words using POSIX shell quoting rules.
///
/// Quotes group words, backslashes escape, and whitespace outside quotes
/// separates. An empty quoted string such as `''` produces an empty word.
///
/// # Errors
///
/// Returns [`TaskyardError::Parse`] if a quote is never closed or the input
/// ends in a lone backslash.
pub fn split(input: &str) -> Result<Vec<String>> {
    let parse_err = |message: &str| TaskyardError::Parse {
        path: None,
        input: input.to_owned(),
        message: message.to_owned(),
    };

    let mut words = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, ()) =
            skip_separators(remaining).map_err(|e| parse_err(&format!("{e}")))?;
        if rest.is_empty() {
            break;
        }

        let (word, rest) = split_word(rest).map_err(parse_err)?;
        words.push(word);
        remaining = rest;
    }

    Ok(words)
}

/// A command string from the document together with its shell words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShlexSlice {
    original: String,
    parsed: Vec<String>,
}

impl ShlexSlice {
    /// Splits `original` and keeps both forms.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Parse`] if the quoting is malformed.
    pub fn parse(original: impl Into<String>) -> Result<Self> {
        let original = original.into();
        let parsed = split(&original)?;
        Ok(Self { original, parsed })
    }

    /// Builds a slice from a raw document value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Type`] if `raw` is not a string, or
    /// [`TaskyardError::Parse`] if the string has malformed quoting.
    pub fn transform_config(raw: &serde_yaml::Value) -> Result<Self> {
        match raw {
            serde_yaml::Value::String(value) => Self::parse(value.as_str()),
            other => Err(TaskyardError::Type {
                path: None,
                expected: "string",
                found: value_type_name(other),
            }),
        }
    }

    /// Returns the shell words.
    #[must_use]
    pub fn value(&self) -> &[String] {
        &self.parsed
    }

    /// Returns the original text, verbatim.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Returns `true` if the original text is the empty string.
    ///
    /// A whitespace-only string is not empty even though it has no words;
    /// use [`ShlexSlice::has_tokens`] for that.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Returns `true` if splitting produced at least one word.
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        !self.parsed.is_empty()
    }
}

/// Human-readable name of a YAML value's type.
pub(crate) const fn value_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

impl fmt::Display for ShlexSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for ShlexSlice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for ShlexSlice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        Self::transform_config(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        split(input).expect("should split")
    }

    #[test]
    fn split_single_quoted_argument() {
        assert_eq!(
            words("bash -c 'echo something'"),
            vec!["bash", "-c", "echo something"]
        );
    }

    #[test]
    fn split_collapses_runs_of_whitespace() {
        assert_eq!(words("  make \t build\n test  "), vec!["make", "build", "test"]);
    }

    #[test]
    fn split_double_quotes_keep_unknown_escapes() {
        assert_eq!(
            words(r#"echo "a \"b\" \$HOME \n""#),
            vec!["echo", r#"a "b" $HOME \n"#]
        );
    }

    #[test]
    fn split_backslash_escapes_outside_quotes() {
        assert_eq!(words(r"touch my\ file"), vec!["touch", "my file"]);
    }

    #[test]
    fn split_joins_adjacent_segments() {
        assert_eq!(words(r#"--name="a b"'c'd"#), vec!["--name=a bcd"]);
    }

    #[test]
    fn split_keeps_empty_quoted_words() {
        assert_eq!(words("run '' \"\""), vec!["run", "", ""]);
    }

    #[test]
    fn split_line_continuations() {
        assert_eq!(words("make \\\n  all"), vec!["make", "all"]);
        assert_eq!(words("ab\\\ncd"), vec!["abcd"]);
    }

    #[test]
    fn split_single_quotes_are_literal() {
        assert_eq!(words(r"echo '\n $x'"), vec!["echo", r"\n $x"]);
    }

    #[test]
    fn split_unterminated_single_quote_fails() {
        let err = split("echo 'oops").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("echo 'oops"), "got: {msg}");
        assert!(msg.contains("single-quoted"), "got: {msg}");
    }

    #[test]
    fn split_unterminated_double_quote_fails() {
        assert!(split("echo \"oops").is_err());
        assert!(split("echo \"oops\\").is_err());
    }

    #[test]
    fn split_trailing_backslash_fails() {
        assert!(split("echo \\").is_err());
        assert!(split("\\").is_err());
    }

    #[test]
    fn display_preserves_original_text() {
        for input in ["bash -c 'echo hi'", "  spaced   out ", "", "a\\\nb"] {
            let slice = ShlexSlice::parse(input).expect("should parse");
            assert_eq!(slice.to_string(), input);
        }
    }

    #[test]
    fn empty_is_about_original_text() {
        let empty = ShlexSlice::parse("").expect("should parse");
        assert!(empty.is_empty());
        assert!(!empty.has_tokens());

        let blank = ShlexSlice::parse("   ").expect("should parse");
        assert!(!blank.is_empty());
        assert!(!blank.has_tokens());
        assert!(blank.value().is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert!(ShlexSlice::default().is_empty());
    }

    #[test]
    fn transform_config_accepts_strings() {
        let raw = serde_yaml::Value::String("ls -la".into());
        let slice = ShlexSlice::transform_config(&raw).expect("should transform");
        assert_eq!(slice.value(), ["ls", "-la"]);
        assert_eq!(slice.as_str(), "ls -la");
    }

    #[test]
    fn transform_config_rejects_other_types() {
        let raw: serde_yaml::Value = serde_yaml::from_str("[ls, -la]").expect("yaml");
        let err = ShlexSlice::transform_config(&raw).unwrap_err();
        assert!(matches!(
            err,
            TaskyardError::Type {
                path: None,
                expected: "string",
                found: "sequence"
            }
        ));
        assert_eq!(err.to_string(), "must be a string, not sequence");
    }

    #[test]
    fn deserialize_goes_through_transform() {
        let slice: ShlexSlice = serde_yaml::from_str("\"go test ./...\"").expect("yaml");
        assert_eq!(slice.value(), ["go", "test", "./..."]);

        let result: std::result::Result<ShlexSlice, _> = serde_yaml::from_str("42");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("must be a string, not number"), "got: {msg}");
    }

    #[test]
    fn serialize_writes_original_text() {
        let slice = ShlexSlice::parse("echo 'a  b'").expect("should parse");
        let json = serde_json::to_string(&slice).expect("serialize");
        assert_eq!(json, r#""echo 'a  b'""#);
    }
}
