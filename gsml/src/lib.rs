//! A parser library for GSML game data files.
//!
//! This library provides a tokenizer and recursive-descent parser for the GSML
//! text format, which is built from braces `{}`, bare values and
//! `key <op> value` properties. Files are read as UTF-8, falling back to
//! `WINDOWS_1252` for legacy content.

pub mod data;
pub mod de;
pub mod error;

use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

pub use data::{Entry, GsmlData, GsmlElement, GsmlOperator, GsmlProperty};
pub use de::from_data;
pub use error::ParseError;

/// A token scanned from GSML text.
#[derive(Debug, Clone, PartialEq)]
pub enum GsmlToken {
    /// An unquoted word: identifiers, numbers, `yes`/`no`.
    Word(String),
    /// A quoted string value.
    Quoted(String),
    Operator(GsmlOperator),
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
}

impl GsmlToken {
    fn describe(&self) -> String {
        match self {
            GsmlToken::Word(s) => s.clone(),
            GsmlToken::Quoted(s) => format!("\"{}\"", s),
            GsmlToken::Operator(op) => op.to_string(),
            GsmlToken::LeftBrace => "{".to_string(),
            GsmlToken::RightBrace => "}".to_string(),
        }
    }
}

/// A token together with the line it was found on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: GsmlToken,
    pub line: usize,
}

/// Reads a file and decodes it to text.
pub fn read_file(path: &Path) -> Result<String, ParseError> {
    let bytes = fs::read(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            log::debug!("{} is not UTF-8, decoding as WINDOWS-1252", path.display());
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            Ok(text.into_owned())
        }
    }
}

/// Reads and parses a file.
pub fn parse_file(path: &Path) -> Result<GsmlData, ParseError> {
    let text = read_file(path)?;
    parse_str(&text)
}

/// Parses GSML text into an anonymous root block.
pub fn parse_str(text: &str) -> Result<GsmlData, ParseError> {
    let tokens = tokenize(text)?;
    parse(&tokens)
}

fn is_word_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '=' | '{' | '}' | '#' | '"' | '<' | '>' | '!')
}

/// Splits text into tokens, dropping comments.
pub fn tokenize(text: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '#' => {
                while let Some(&nc) = chars.peek() {
                    if nc == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '{' => tokens.push(SpannedToken {
                token: GsmlToken::LeftBrace,
                line,
            }),
            '}' => tokens.push(SpannedToken {
                token: GsmlToken::RightBrace,
                line,
            }),
            '"' => {
                let start_line = line;
                let mut s = String::new();
                let mut closed = false;
                for nc in chars.by_ref() {
                    if nc == '"' {
                        closed = true;
                        break;
                    }
                    if nc == '\n' {
                        line += 1;
                    }
                    s.push(nc);
                }
                if !closed {
                    return Err(ParseError::UnterminatedString { line: start_line });
                }
                tokens.push(SpannedToken {
                    token: GsmlToken::Quoted(s),
                    line: start_line,
                });
            }
            '=' | '<' | '>' | '!' => {
                let mut op = c.to_string();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    op.push('=');
                }
                let operator = GsmlOperator::parse(&op)
                    .ok_or(ParseError::UnexpectedChar { line, found: c })?;
                tokens.push(SpannedToken {
                    token: GsmlToken::Operator(operator),
                    line,
                });
            }
            '+' | '-' if chars.peek() == Some(&'=') => {
                chars.next();
                let operator = if c == '+' {
                    GsmlOperator::Addition
                } else {
                    GsmlOperator::Subtraction
                };
                tokens.push(SpannedToken {
                    token: GsmlToken::Operator(operator),
                    line,
                });
            }
            _ => {
                let mut s = c.to_string();
                while let Some(&nc) = chars.peek() {
                    if is_word_terminator(nc) {
                        break;
                    }
                    s.push(nc);
                    chars.next();
                }
                tokens.push(SpannedToken {
                    token: GsmlToken::Word(s),
                    line,
                });
            }
        }
    }

    Ok(tokens)
}

/// Builds the tree from a token stream.
pub fn parse(tokens: &[SpannedToken]) -> Result<GsmlData, ParseError> {
    let mut root = GsmlData::anonymous();
    let end = parse_elements(tokens, 0, &mut root, false)?;
    debug_assert_eq!(end, tokens.len());
    Ok(root)
}

/// Parses elements into `block` until the closing brace (when `nested`) or
/// end of input. Returns the position after the last consumed token.
fn parse_elements(
    tokens: &[SpannedToken],
    mut pos: usize,
    block: &mut GsmlData,
    nested: bool,
) -> Result<usize, ParseError> {
    loop {
        let Some(current) = tokens.get(pos) else {
            if nested {
                let line = tokens.last().map(|t| t.line).unwrap_or(1);
                return Err(ParseError::UnexpectedEof { line });
            }
            return Ok(pos);
        };

        match &current.token {
            GsmlToken::RightBrace => {
                if nested {
                    return Ok(pos + 1);
                }
                return Err(ParseError::UnbalancedBrace { line: current.line });
            }
            GsmlToken::LeftBrace => {
                let mut child = GsmlData::anonymous();
                pos = parse_elements(tokens, pos + 1, &mut child, true)?;
                block.push_child(child);
            }
            GsmlToken::Operator(_) => {
                return Err(ParseError::UnexpectedToken {
                    line: current.line,
                    token: current.token.describe(),
                    expected: "a key, value or block".to_string(),
                });
            }
            GsmlToken::Word(key) | GsmlToken::Quoted(key) => {
                let operator = match tokens.get(pos + 1).map(|t| &t.token) {
                    Some(GsmlToken::Operator(op)) => *op,
                    _ => {
                        block.push_value(key.clone());
                        pos += 1;
                        continue;
                    }
                };

                let rhs = tokens.get(pos + 2).ok_or(ParseError::UnexpectedEof {
                    line: current.line,
                })?;
                match &rhs.token {
                    GsmlToken::LeftBrace => {
                        let mut child = GsmlData::with_operator(key.clone(), operator);
                        pos = parse_elements(tokens, pos + 3, &mut child, true)?;
                        block.push_child(child);
                    }
                    GsmlToken::Word(value) | GsmlToken::Quoted(value) => {
                        block.push_property(GsmlProperty::new(key.clone(), operator, value.clone()));
                        pos += 3;
                    }
                    other => {
                        return Err(ParseError::UnexpectedToken {
                            line: rhs.line,
                            token: other.describe(),
                            expected: format!("a value or block after '{} {}'", key, operator),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_operators() {
        let tokens = tokenize("a >= 1 b += -2 c -= 3 d != e").unwrap();
        let ops: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.token {
                GsmlToken::Operator(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                GsmlOperator::GreaterThanOrEqual,
                GsmlOperator::Addition,
                GsmlOperator::Subtraction,
                GsmlOperator::Inequality
            ]
        );
        assert!(tokens.contains(&SpannedToken {
            token: GsmlToken::Word("-2".to_string()),
            line: 1
        }));
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = tokenize("# header\nkey = value # trailing\n").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("name = \"oops"),
            Err(ParseError::UnterminatedString { line: 1 })
        );
    }

    #[test]
    fn test_lone_bang_is_rejected() {
        assert_eq!(
            tokenize("a ! b"),
            Err(ParseError::UnexpectedChar { line: 1, found: '!' })
        );
    }

    #[test]
    fn test_parse_nested_blocks() {
        let data = parse_str(
            r#"
            gunpowder = {
                cost = 100
                prerequisites = { metallurgy alchemy }
                modifier = {
                    law_cost_modifier = -5
                }
            }
            "#,
        )
        .unwrap();

        let tech = data.get_child("gunpowder").unwrap();
        assert_eq!(tech.get_property_value("cost"), Some("100"));
        let prereqs: Vec<_> = tech.get_child("prerequisites").unwrap().values().collect();
        assert_eq!(prereqs, vec!["metallurgy", "alchemy"]);
        assert_eq!(
            tech.get_child("modifier")
                .unwrap()
                .get_property_value("law_cost_modifier"),
            Some("-5")
        );
    }

    #[test]
    fn test_parse_comparison_property() {
        let data = parse_str("tier >= duchy").unwrap();
        let prop = data.properties().next().unwrap();
        assert_eq!(prop.key, "tier");
        assert_eq!(prop.operator, GsmlOperator::GreaterThanOrEqual);
        assert_eq!(prop.value, "duchy");
    }

    #[test]
    fn test_parse_anonymous_blocks() {
        let data = parse_str("list = { { a = 1 } { a = 2 } }").unwrap();
        let list = data.get_child("list").unwrap();
        assert_eq!(list.children().count(), 2);
        assert!(list.children().all(|c| c.tag().is_none()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_str("a = { b = 1"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse_str("a = 1 }"),
            Err(ParseError::UnbalancedBrace { line: 1 })
        ));
        assert!(matches!(
            parse_str("= 1"),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_str("a = }"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_empty_input_is_empty_root() {
        let data = parse_str("  # nothing here\n").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_round_trip_through_text() {
        let text = "a = 1\nb >= { c = d\n}\n";
        let data = parse_str(text).unwrap();
        let reparsed = parse_str(&data.to_gsml_string()).unwrap();
        assert_eq!(data, reparsed);
    }
}
