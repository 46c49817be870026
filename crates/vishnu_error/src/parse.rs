//! Parse errors for dice expressions, filter arguments and command arguments.

/// Parse error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// Token does not match the `NdM` / `NdM+K` grammar.
    #[display("Malformed dice expression: '{}'", _0)]
    DiceToken(String),

    /// Die with fewer than two sides.
    #[display("Dice expression '{}' has {} sides (minimum is 2)", token, sides)]
    DieSides {
        /// The offending token
        token: String,
        /// Number of sides supplied
        sides: u32,
    },

    /// More dice than the configured maximum.
    #[display("Too many dice: {} (maximum is {})", count, max)]
    TooManyDice {
        /// Number of dice requested
        count: u32,
        /// Configured maximum
        max: u32,
    },

    /// Filter argument not of the form `key=value`.
    #[display("Malformed filter argument: '{}'", _0)]
    FilterToken(String),

    /// Filter key not in the recognized-key table.
    #[display("Unknown filter key '{}' (expected one of: {})", key, expected.join(", "))]
    UnknownFilterKey {
        /// Key supplied by the caller
        key: String,
        /// Keys recognized by the command
        expected: Vec<String>,
    },

    /// Value could not be read as an integer.
    #[display("Invalid integer for '{}': '{}'", field, value)]
    InvalidInteger {
        /// Name of the argument
        field: String,
        /// Raw value
        value: String,
    },

    /// Value could not be read as a `YYYY-MM-DD` date.
    #[display("Invalid date '{}' (expected YYYY-MM-DD)", _0)]
    InvalidDate(String),

    /// Integer outside the accepted range.
    #[display("Value for '{}' is out of range: {}", field, reason)]
    OutOfRange {
        /// Name of the argument
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No command registered under this name.
    #[display("Unknown command '{}'", _0)]
    UnknownCommand(String),

    /// Required positional argument missing.
    #[display("Missing required argument '{}' for command '{}'", argument, command)]
    MissingArgument {
        /// Command name
        command: String,
        /// Name of the missing argument
        argument: String,
    },
}

/// Parse error with source location tracking.
///
/// # Examples
///
/// ```
/// use vishnu_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::DiceToken("abc".to_string()));
/// assert!(format!("{}", err).contains("abc"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Reply text shown to the caller.
    pub fn user_message(&self) -> String {
        match &self.kind {
            ParseErrorKind::DiceToken(token) => format!(
                "Error: `{}` is not a valid roll. Use a format like `3d8` or `3d8+4`.",
                token
            ),
            ParseErrorKind::MissingArgument { command, argument } => {
                format!("Error: `{}` needs a {} argument.", command, argument)
            }
            ParseErrorKind::UnknownCommand(name) => {
                format!("Error: `{}` is not a command. Use `help` to list commands.", name)
            }
            other => format!("Error: {}.", other),
        }
    }
}
