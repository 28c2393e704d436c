//! Validated inputs for the agent settings dialogs.
//!
//! Each form keeps raw user input and only produces a typed value from
//! `submit()` once every rule holds.

mod app;
mod instruction;
mod resource;

pub use app::{AppForm, ConnectorType, NewApp};
pub use instruction::{InstructionForm, NewInstruction};
pub use resource::{FileType, NewResource, ResourceForm};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("At least one file must be selected")]
    NoFiles,
}

/// Trims `value` and checks it is non-empty and within `max` characters.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(FormError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}
