//! Deploy-node specialty names: lowercase letters, digits and hyphens.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SPECIALTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+$").expect("specialty pattern is a valid regex")
});

/// A validated specialty, e.g. `nestjs` or `a-1-b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Specialty(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecialtyError {
    #[error("Specialty cannot be empty")]
    Empty,

    #[error("Use lowercase letters, numbers, and hyphens only")]
    InvalidCharacters,
}

impl Specialty {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for Specialty {
    type Err = SpecialtyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

/// Validate `input` exactly as typed; surrounding whitespace is rejected.
pub fn validate(input: &str) -> Result<Specialty, SpecialtyError> {
    if input.trim().is_empty() {
        return Err(SpecialtyError::Empty);
    }
    if !SPECIALTY_RE.is_match(input) {
        return Err(SpecialtyError::InvalidCharacters);
    }
    Ok(Specialty(input.to_string()))
}

/// Validator in host-prompt form: `None` when valid, else the message to show.
pub fn validation_message(input: &str) -> Option<String> {
    validate(input).err().map(|err| err.to_string())
}
