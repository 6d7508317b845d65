//! Error types for the window counter.

use std::error::Error;
use std::fmt;
use std::io;

/// Invalid [`WindowConfig`](crate::WindowConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Window width is below [`WindowConfig::MIN_WIDTH`](crate::WindowConfig::MIN_WIDTH).
    WidthTooSmall {
        /// The configured width that was too small.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthTooSmall { configured } => {
                write!(f, "window width must be at least 2, got {configured}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Failure while reading input values.
#[derive(Debug)]
pub enum InputError {
    /// The underlying reader failed.
    Io(io::Error),
    /// A token was not a valid signed 64-bit integer.
    Parse {
        /// 1-based line number of the token.
        line: usize,
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read input: {err}"),
            Self::Parse { line, token } => {
                write!(f, "line {line}: '{token}' is not an integer")
            }
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for InputError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Errors from an end-to-end [`run`](crate::run).
#[derive(Debug)]
pub enum WindowError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// The input could not be read or parsed.
    Input(InputError),
    /// The count could not be written.
    Output(io::Error),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Input(err) => write!(f, "invalid input: {err}"),
            Self::Output(err) => write!(f, "failed to write result: {err}"),
        }
    }
}

impl Error for WindowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Input(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for WindowError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InputError> for WindowError {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}
