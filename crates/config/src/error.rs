use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(String),
    /// JSON / TOML parse or deserialization error.
    Parse(String),
    /// One or more validation failures, reported together.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "catalog parse error: {msg}"),
            Self::Validation(errors) => {
                write!(f, "catalog has {} validation error(s)", errors.len())?;
                for e in errors {
                    write!(f, "\n  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
