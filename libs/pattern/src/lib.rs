//! Name matching for netlist lookups.
//!
//! Patterns use Unix shell (or Tcl `string match`) wildcards by default:
//!
//! * `*` matches zero or more characters.
//! * `?` matches exactly one character.
//! * `\` makes the next character literal, so `\*` only matches `*`.
//!
//! A pattern may instead be compiled as an anchored regular expression,
//! and either kind may ignore case.
//!
//! # Examples
//!
//! ```
//! use pattern::PatternMatch;
//!
//! let pat = PatternMatch::glob("U*");
//! assert!(pat.matches("U1"));
//! assert!(!pat.matches("BUF1"));
//! ```
#![warn(missing_docs)]

use std::fmt::{Display, Formatter};

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// An error compiling a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The regular expression is invalid.
    #[error("invalid regular expression `{pattern}`: {source}")]
    Regex {
        /// The offending pattern text.
        pattern: String,
        /// The underlying compilation error.
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Token {
    Star,
    AnyChar,
    Literal(char),
}

#[derive(Debug, Clone)]
enum Matcher {
    Glob(Vec<Token>),
    Regex(Regex),
}

/// A compiled name pattern.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    source: String,
    nocase: bool,
    matcher: Matcher,
}

impl PatternMatch {
    /// Compiles a case-sensitive shell-style pattern.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::glob_with_case(pattern, false)
    }

    /// Compiles a shell-style pattern, optionally ignoring case.
    pub fn glob_with_case(pattern: impl Into<String>, nocase: bool) -> Self {
        let source = pattern.into();
        let matcher = Matcher::Glob(tokenize(&source));
        Self {
            source,
            nocase,
            matcher,
        }
    }

    /// Compiles an anchored regular expression.
    ///
    /// The expression must match the whole name, as if it were wrapped in `^(?:...)$`.
    pub fn regex(pattern: impl Into<String>, nocase: bool) -> Result<Self, PatternError> {
        let source = pattern.into();
        let regex = RegexBuilder::new(&format!("^(?:{source})$"))
            .case_insensitive(nocase)
            .build()
            .map_err(|source_err| PatternError::Regex {
                pattern: source.clone(),
                source: source_err,
            })?;
        Ok(Self {
            source,
            nocase,
            matcher: Matcher::Regex(regex),
        })
    }

    /// The pattern text this matcher was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this pattern ignores case.
    #[inline]
    pub fn is_nocase(&self) -> bool {
        self.nocase
    }

    /// Whether this pattern was compiled as a regular expression.
    #[inline]
    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    /// Returns `true` if the pattern contains wildcards or is a regular expression.
    pub fn has_wildcards(&self) -> bool {
        match &self.matcher {
            Matcher::Glob(tokens) => tokens.iter().any(|t| !matches!(t, Token::Literal(_))),
            Matcher::Regex(_) => true,
        }
    }

    /// Returns the literal name this pattern matches, if it has no wildcards
    /// and is case-sensitive.
    pub fn literal(&self) -> Option<String> {
        match &self.matcher {
            Matcher::Glob(tokens) if !self.nocase => tokens
                .iter()
                .map(|t| match t {
                    Token::Literal(c) => Some(*c),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Tests the given name against this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Glob(tokens) => {
                let chars: Vec<char> = name.chars().collect();
                glob_match(tokens, &chars, self.nocase)
            }
            Matcher::Regex(regex) => regex.is_match(name),
        }
    }
}

impl Display for PatternMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl From<&str> for PatternMatch {
    fn from(value: &str) -> Self {
        Self::glob(value)
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = match c {
            '*' => Token::Star,
            '?' => Token::AnyChar,
            // A trailing backslash matches itself.
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            c => Token::Literal(c),
        };
        // Consecutive stars are equivalent to one.
        if token == Token::Star && tokens.last() == Some(&Token::Star) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}

fn chars_eq(a: char, b: char, nocase: bool) -> bool {
    a == b || (nocase && a.to_lowercase().eq(b.to_lowercase()))
}

/// Iterative wildcard match with single-star backtracking.
fn glob_match(tokens: &[Token], name: &[char], nocase: bool) -> bool {
    let (mut t, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match tokens.get(t) {
            Some(Token::Star) => {
                backtrack = Some((t, n));
                t += 1;
                continue;
            }
            Some(Token::AnyChar) => {
                t += 1;
                n += 1;
                continue;
            }
            Some(Token::Literal(c)) if chars_eq(*c, name[n], nocase) => {
                t += 1;
                n += 1;
                continue;
            }
            _ => {}
        }
        match backtrack {
            Some((star, start)) => {
                t = star + 1;
                n = start + 1;
                backtrack = Some((star, start + 1));
            }
            None => return false,
        }
    }

    tokens[t..].iter().all(|t| *t == Token::Star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn star_matches_prefixes() {
        let pat = PatternMatch::glob("U*");
        assert!(pat.matches("U1"));
        assert!(pat.matches("U"));
        assert!(pat.matches("U23x"));
        assert!(!pat.matches("BUF1"));
        assert!(!pat.matches("u1"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let pat = PatternMatch::glob("U?");
        assert!(pat.matches("U1"));
        assert!(!pat.matches("U"));
        assert!(!pat.matches("U12"));
    }

    #[test]
    fn star_backtracks() {
        let pat = PatternMatch::glob("*_reg*/D");
        assert!(pat.matches("count_reg_3/D"));
        assert!(pat.matches("a_reg_reg/D"));
        assert!(!pat.matches("count_reg_3/Q"));
        assert!(PatternMatch::glob("*").matches(""));
        assert!(PatternMatch::glob("a**b").matches("ab"));
    }

    #[test]
    fn escaped_wildcards_are_literal() {
        let pat = PatternMatch::glob(r"a\*b");
        assert!(pat.matches("a*b"));
        assert!(!pat.matches("axb"));
        assert!(!pat.has_wildcards());
        assert!(PatternMatch::glob("a?b").has_wildcards());
        assert_eq!(pat.literal().as_deref(), Some("a*b"));
    }

    #[test]
    fn nocase_glob() {
        let pat = PatternMatch::glob_with_case("buf*", true);
        assert!(pat.matches("BUF1"));
        assert!(pat.literal().is_none());
    }

    #[test]
    fn regex_is_anchored() {
        let pat = PatternMatch::regex("U[0-9]+", false).unwrap();
        assert!(pat.matches("U12"));
        assert!(!pat.matches("XU12"));
        assert!(!pat.matches("U12x"));
        assert!(pat.is_regex());
        assert!(pat.has_wildcards());
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(matches!(
            PatternMatch::regex("U[", false),
            Err(PatternError::Regex { .. })
        ));
    }
}
