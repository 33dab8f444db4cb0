//! Error types for the GSML parser.

use std::fmt;

/// Errors that can occur while reading, tokenizing or parsing GSML text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The file could not be read.
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
    /// A character that cannot start any token.
    UnexpectedChar {
        /// Line the character was found on (1-based).
        line: usize,
        /// The offending character.
        found: char,
    },
    /// A quoted string was never closed.
    UnterminatedString {
        /// Line the string started on.
        line: usize,
    },
    /// Unexpected end of input while a block was still open.
    UnexpectedEof {
        /// Line of the last token read.
        line: usize,
    },
    /// Encountered a token that is not valid at this point.
    UnexpectedToken {
        /// Line of the token.
        line: usize,
        /// The token that was found.
        token: String,
        /// What was expected instead.
        expected: String,
    },
    /// A closing brace without a matching opening brace.
    UnbalancedBrace {
        /// Line of the stray `}`.
        line: usize,
    },
    /// A parsed tree could not be converted into the requested type.
    Deserialize(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path, message)
            }
            ParseError::UnexpectedChar { line, found } => {
                write!(f, "Unexpected character '{}' on line {}", found, line)
            }
            ParseError::UnterminatedString { line } => {
                write!(f, "Unterminated string starting on line {}", line)
            }
            ParseError::UnexpectedEof { line } => {
                write!(f, "Unexpected end of file after line {} (unclosed block)", line)
            }
            ParseError::UnexpectedToken {
                line,
                token,
                expected,
            } => {
                write!(
                    f,
                    "Unexpected token '{}' on line {}, expected {}",
                    token, line, expected
                )
            }
            ParseError::UnbalancedBrace { line } => {
                write!(f, "Closing brace without matching opening brace on line {}", line)
            }
            ParseError::Deserialize(message) => {
                write!(f, "Deserialization failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ParseError {}
