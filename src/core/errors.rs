use thiserror::Error;

/// Result type for circuit commands and validators
pub type CircuitResult<T> = std::result::Result<T, CircuitError>;

/// Expected domain failure of a command or validator.
///
/// Carries every violation that was found, not only the first one, so an editor can show
/// the full list to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct CircuitError {
    messages: Vec<String>,
}

impl CircuitError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// Whether any message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }

    /// Turn a list of collected violations into `Ok(value)` when it is empty
    pub(crate) fn check<T>(messages: Vec<String>, value: T) -> CircuitResult<T> {
        if messages.is_empty() {
            Ok(value)
        } else {
            Err(Self::new(messages))
        }
    }
}

/// Errors raised while importing or exporting a circuit payload
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The text was not valid JSON or did not match the circuit schema
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    /// Version, shape or integrity violations, all of them
    #[error("Invalid payload: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
