use crate::{AppError, AppResult};

/// Text value that must contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Validates `value`, naming `field` in the rejection message.
    pub fn new(field: &str, value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} must not be blank")));
        }

        Ok(Self(value))
    }

    /// Returns the validated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
