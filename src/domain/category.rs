//! Category tags attached to expenses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{MooLahError, Result};
use crate::domain::common::Displayable;

pub const MESSAGE_CATEGORY_CONSTRAINTS: &str =
    "Category names should be alphanumeric, may contain spaces, and must not be blank";

/// Validated, immutable category tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let trimmed = name.as_ref().trim();
        if !Self::is_valid_name(trimmed) {
            return Err(MooLahError::InvalidInput(format!(
                "`{}`: {}",
                name.as_ref(),
                MESSAGE_CATEGORY_CONSTRAINTS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_valid_name(candidate: &str) -> bool {
        let trimmed = candidate.trim();
        !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_alphanumeric() || ch == ' ')
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used for vocabulary checks.
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.0.eq_ignore_ascii_case(candidate.trim())
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("[{}]", self.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = MooLahError;

    fn try_from(value: String) -> Result<Self> {
        Category::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}
