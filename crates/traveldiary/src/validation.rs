//! Title and description validation.
//!
//! Emptiness is checked on the trimmed text; length limits apply to the raw
//! input and count Unicode scalar values.

use crate::error::{Error, Field, Result};

/// Maximum title length.
pub const TITLE_MAX_CHARS: usize = 25;

/// Maximum description length when creating an entry.
pub const DESCRIPTION_MAX_CHARS_CREATE: usize = 200;

/// Maximum description length when editing an existing entry.
pub const DESCRIPTION_MAX_CHARS_EDIT: usize = 250;

/// Length ceilings applied by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    /// Maximum title length in characters.
    pub title_max: usize,
    /// Maximum description length in characters.
    pub description_max: usize,
}

impl TextLimits {
    /// Limits used when composing a new entry.
    pub const CREATE: Self = Self {
        title_max: TITLE_MAX_CHARS,
        description_max: DESCRIPTION_MAX_CHARS_CREATE,
    };

    /// Limits used when editing an existing entry.
    pub const EDIT: Self = Self {
        title_max: TITLE_MAX_CHARS,
        description_max: DESCRIPTION_MAX_CHARS_EDIT,
    };
}

/// Validate a title/description pair.
///
/// # Errors
///
/// Returns [`Error::ValidationFailed`] naming the first offending field.
pub fn validate(title: &str, description: &str, limits: TextLimits) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation(Field::Title, "please enter a title"));
    }

    if description.trim().is_empty() {
        return Err(Error::validation(
            Field::Description,
            "please enter a description",
        ));
    }

    if title.chars().count() > limits.title_max {
        return Err(Error::validation(
            Field::Title,
            format!("should not exceed {} characters", limits.title_max),
        ));
    }

    if description.chars().count() > limits.description_max {
        return Err(Error::validation(
            Field::Description,
            format!("should not exceed {} characters", limits.description_max),
        ));
    }

    Ok(())
}
