use serde::{Deserialize, Serialize};

use super::{required_text, FormError};

pub const TITLE_MAX: usize = 40;
pub const DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstruction {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct InstructionForm {
    pub title: String,
    pub description: String,
}

impl InstructionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_save(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.submit().map(|_| ())
    }

    pub fn submit(&self) -> Result<NewInstruction, FormError> {
        Ok(NewInstruction {
            title: required_text("Title", &self.title, TITLE_MAX)?,
            description: required_text("Description", &self.description, DESCRIPTION_MAX)?,
        })
    }
}
