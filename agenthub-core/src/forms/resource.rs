use serde::{Deserialize, Serialize};

use super::{required_text, FormError};

pub const NAME_MAX: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Excel,
    Word,
    Pdf,
    Images,
    Text,
    Powerpoint,
}

impl FileType {
    pub fn all() -> &'static [FileType] {
        &[
            FileType::Excel,
            FileType::Word,
            FileType::Pdf,
            FileType::Images,
            FileType::Text,
            FileType::Powerpoint,
        ]
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Excel => &["xlsx", "xls"],
            FileType::Word => &["docx", "doc"],
            FileType::Pdf => &["pdf"],
            FileType::Images => &["jpg", "jpeg", "png", "gif"],
            FileType::Text => &["txt", "csv"],
            FileType::Powerpoint => &["pptx", "ppt"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Excel => "Excel files (.xlsx, .xls)",
            FileType::Word => "Word documents (.docx, .doc)",
            FileType::Pdf => "PDF documents (.pdf)",
            FileType::Images => "Images (.jpg, .png, .gif)",
            FileType::Text => "Text files (.txt, .csv)",
            FileType::Powerpoint => "PowerPoint (.pptx, .ppt)",
        }
    }

    pub fn checked_by_default(&self) -> bool {
        matches!(
            self,
            FileType::Excel | FileType::Word | FileType::Pdf | FileType::Text
        )
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self.extensions().contains(&ext.to_lowercase().as_str()),
            None => false,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Excel => write!(f, "excel"),
            FileType::Word => write!(f, "word"),
            FileType::Pdf => write!(f, "pdf"),
            FileType::Images => write!(f, "images"),
            FileType::Text => write!(f, "text"),
            FileType::Powerpoint => write!(f, "powerpoint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub name: String,
    pub folder: String,
    pub files: Vec<String>,
    pub file_types: Vec<FileType>,
}

#[derive(Debug, Clone)]
pub struct ResourceForm {
    pub name: String,
    pub folder: String,
    files: Vec<String>,
    checked: Vec<FileType>,
}

impl Default for ResourceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            folder: String::new(),
            files: Vec::new(),
            checked: FileType::all()
                .iter()
                .copied()
                .filter(FileType::checked_by_default)
                .collect(),
        }
    }
}

impl ResourceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_checked(&self, file_type: FileType) -> bool {
        self.checked.contains(&file_type)
    }

    pub fn set_checked(&mut self, file_type: FileType, checked: bool) {
        if checked {
            if !self.checked.contains(&file_type) {
                self.checked.push(file_type);
                self.checked
                    .sort_by_key(|t| FileType::all().iter().position(|a| a == t));
            }
        } else {
            self.checked.retain(|t| *t != file_type);
        }
    }

    pub fn toggle(&mut self, file_type: FileType) {
        let checked = self.is_checked(file_type);
        self.set_checked(file_type, !checked);
    }

    /// Adds the files whose extension matches a checked type and returns how
    /// many were accepted.
    pub fn add_files<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.files.len();
        for name in names {
            let name = name.into();
            if self.checked.iter().any(|t| t.matches(&name)) {
                self.files.push(name);
            }
        }
        self.files.len() - before
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f != name);
        self.files.len() != before
    }

    pub fn can_save(&self) -> bool {
        !self.name.trim().is_empty() && !self.files.is_empty()
    }

    pub fn submit(&self) -> Result<NewResource, FormError> {
        let name = required_text("Name", &self.name, NAME_MAX)?;
        if self.files.is_empty() {
            return Err(FormError::NoFiles);
        }

        Ok(NewResource {
            name,
            folder: self.folder.trim().to_string(),
            files: self.files.clone(),
            file_types: self.checked.clone(),
        })
    }
}
