//! 値オブジェクト
//!
//! 識別子やテキストは全て生成時に検証され、生成後は不変です。

use std::fmt;

use super::error::ValueObjectError;

const MAX_ID_LEN: usize = 64;
const MAX_VOTER_ID_LEN: usize = 128;
const MAX_QUESTION_LEN: usize = 500;
const MAX_OPTION_TEXT_LEN: usize = 200;

/// Length of a poll short code
pub const SHORT_CODE_LEN: usize = 6;

fn validate_identifier(field: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > MAX_ID_LEN {
        return Err(ValueObjectError::TooLong {
            field,
            max: MAX_ID_LEN,
        });
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValueObjectError::InvalidFormat(field));
    }
    Ok(())
}

fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValueObjectError::TooLong { field, max });
    }
    Ok(())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                validate_identifier($field, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// Stable internal identifier of a poll
    PollId,
    "pollId"
);
identifier!(
    /// Stable identifier of a poll option
    OptionId,
    "optionId"
);
identifier!(
    /// Server-assigned identifier of one live connection
    ConnectionId,
    "connectionId"
);

/// Opaque, client-generated voter token
///
/// Trusted as-is; only its shape is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterId(String);

impl VoterId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("voterId", &value, MAX_VOTER_ID_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VoterId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human-entered poll code
///
/// Case-insensitive: stored and compared in upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValueObjectError::Empty("shortCode"));
        }
        if normalized.len() != SHORT_CODE_LEN || !normalized.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ValueObjectError::InvalidFormat("shortCode"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Poll question (trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionText(String);

impl QuestionText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim().to_string();
        validate_text("question", &trimmed, MAX_QUESTION_LEN)?;
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display text of an option (trimmed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionText(String);

impl OptionText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim().to_string();
        validate_text("option", &trimmed, MAX_OPTION_TEXT_LEN)?;
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
