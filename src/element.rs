use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::utils::prelude::*;

static ELEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:(?<int>[+-]?[0-9]+)|"(?<quoted>(?:[^"\\]|\\.)*)"|(?<word>[A-Za-z_][A-Za-z0-9_-]*))$"#)
        .expect("element pattern compiles")
});

/// Whether `s` reads back as a bare-word string, i.e. matches `[A-Za-z_][A-Za-z0-9_-]*`.
fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Resolves `\` escapes in the body of a quoted string.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

/// A set member that is either an integer or a string, so integers and strings can share
/// one set. `Int(1)` and `Str("1")` are different members.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Int(i64),
    Str(String),
}

impl Element {
    /// The element's textual form, which parses back to the same element. Strings that are
    /// not bare words are quoted, with `"` and `\` escaped by a backslash.
    pub fn notate(&self) -> String {
        match self {
            Element::Int(i) => i.to_string(),
            Element::Str(s) if is_bare_word(s) => s.clone(),
            Element::Str(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Int(i) => write!(f, "{i}"),
            Element::Str(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for Element {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let Some(matches) = ELEMENT_PATTERN.captures(s) else {
            return Err(anyhow!("could not parse element {s}"));
        };

        if let Some(int) = matches.name("int") {
            let value = int
                .as_str()
                .parse::<i64>()
                .with_context(|| format!("integer element {s} out of range"))?;
            return Ok(Element::Int(value));
        }

        match (matches.name("quoted"), matches.name("word")) {
            (Some(quoted), _) => Ok(Element::Str(unescape(quoted.as_str()))),
            (_, Some(word)) => Ok(Element::Str(word.as_str().to_owned())),
            _ => Err(anyhow!("could not parse element {s}")),
        }
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::Int(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::Int(value as i64)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Str(value.to_owned())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn parse_integers() {
        assert_eq!("42".parse::<Element>().unwrap(), Element::Int(42));
        assert_eq!("-3".parse::<Element>().unwrap(), Element::Int(-3));
        assert_eq!("+7".parse::<Element>().unwrap(), Element::Int(7));
        assert!("99999999999999999999".parse::<Element>().is_err());
    }

    #[test]
    fn parse_strings() {
        assert_eq!("a".parse::<Element>().unwrap(), Element::from("a"));
        assert_eq!("snake_case-2".parse::<Element>().unwrap(), Element::from("snake_case-2"));
        assert_eq!("\"1\"".parse::<Element>().unwrap(), Element::from("1"));
        assert_eq!("\"\"".parse::<Element>().unwrap(), Element::from(""));
    }

    #[test]
    fn reject_malformed() {
        for s in ["", "1a", "a b", "\"open", "{}", "-"] {
            assert!(s.parse::<Element>().is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn ints_and_strings_are_distinct() {
        assert_ne!(Element::from(1), Element::from("1"));
        assert_eq!(Element::from(1).to_string(), Element::from("1").to_string());
    }

    #[test]
    fn notation_reads_back() {
        for e in [Element::from(-5), Element::from("b"), Element::from("1"), Element::from("")] {
            assert_eq!(e.notate().parse::<Element>().unwrap(), e);
        }
        assert_eq!(Element::from("1").notate(), "\"1\"");
        assert_eq!(Element::from("b").notate(), "b");
    }

    #[test]
    fn notation_escapes_quotes_and_backslashes() {
        for text in ["x\"y", "\"", "back\\slash", "\\\"", "a b", "é", "trailing\\"] {
            let e = Element::from(text);
            assert_eq!(e.notate().parse::<Element>().unwrap(), e, "{text} should read back");
        }
        assert_eq!(Element::from("x\"y").notate(), r#""x\"y""#);
        assert_eq!(Element::from("a\\b").notate(), r#""a\\b""#);
        assert_eq!(r#""\"""#.parse::<Element>().unwrap(), Element::from("\""));
        assert!(r#""x"y""#.parse::<Element>().is_err());
    }
}
